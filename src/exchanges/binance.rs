use super::{ExchangeDescriptor, HttpMethod, Numeric};
use crate::models::RateReading;
use serde::Deserialize;
use serde_json::Value;

pub const ID: &str = "binance";
const BASE_URL: &str = "https://fapi.binance.com";

/// 24h ticker statistics for every USDⓈ-M perpetual.
pub const TICKER_24H_ENDPOINT: &str = "/fapi/v1/ticker/24hr";

/// The raw JSON shape Binance sends back from premiumIndex
#[derive(Debug, Deserialize)]
struct PremiumIndexResponse {
    #[serde(rename = "lastFundingRate")]
    last_funding_rate: Option<Numeric>,

    #[serde(rename = "nextFundingTime")]
    next_funding_time: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
struct Ticker24h {
    symbol: String,

    #[serde(rename = "quoteVolume")]
    quote_volume: Numeric,
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: ID,
        display_name: "Binance",
        base_url: BASE_URL.to_string(),
        funding_rate_endpoint: "/fapi/v1/premiumIndex",
        symbol_param: Some("symbol"),
        extra_query: &[],
        symbol_format: format_symbol,
        method: HttpMethod::Get,
        headers: &[],
        body: None,
        extract,
    }
}

/// Binance lists perpetuals under the canonical symbol.
fn format_symbol(symbol: &str) -> String {
    symbol.to_string()
}

fn extract(raw: &Value, _venue_symbol: &str) -> Option<RateReading> {
    let response = PremiumIndexResponse::deserialize(raw).ok()?;
    let rate = response.last_funding_rate?.as_rate()?;

    Some(RateReading {
        rate,
        next_funding_time: response.next_funding_time.and_then(|t| t.as_millis()),
    })
}

/// USDT perpetual symbols ranked by 24h quote volume, highest first.
/// Entries that fail to parse are skipped rather than failing the list.
pub fn rank_by_quote_volume(raw: &Value, limit: usize) -> Vec<String> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    let mut tickers: Vec<(String, f64)> = entries
        .iter()
        .filter_map(|entry| Ticker24h::deserialize(entry).ok())
        .filter(|t| t.symbol.ends_with("USDT"))
        .filter_map(|t| Some((t.symbol, t.quote_volume.as_rate()?)))
        .collect();

    tickers.sort_by(|a, b| b.1.total_cmp(&a.1));
    tickers.into_iter().take(limit).map(|(s, _)| s).collect()
}
