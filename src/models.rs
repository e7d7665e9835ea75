use serde::Serialize;

/// One normalized funding-rate observation for a symbol on one exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRate {
    pub exchange: &'static str,
    pub symbol: String,
    pub rate: f64,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_funding_time: Option<u64>,
}

/// What an extractor pulls out of a raw exchange response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateReading {
    pub rate: f64,
    pub next_funding_time: Option<u64>,
}

/// Exchange pair whose funding rates differ by more than the threshold.
/// Buy on the lower-rate exchange, sell on the higher.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageOpportunity {
    pub symbol: String,
    pub buy_exchange: &'static str,
    pub sell_exchange: &'static str,
    pub rate_difference: f64,
    pub timestamp: u64,
}

/// Highest/lowest rate for one symbol across exchanges.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadSummary {
    pub symbol: String,
    pub spread: f64,
    pub highest_rate: f64,
    pub highest_exchange: &'static str,
    pub lowest_rate: f64,
    pub lowest_exchange: &'static str,
    pub exchange_count: usize,
}

/// Current wall-clock time in unix milliseconds.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
