use super::{ExchangeDescriptor, HttpMethod, Numeric, base_asset};
use crate::models::RateReading;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://www.okx.com";

#[derive(Debug, Deserialize)]
struct FundingRateResponse {
    #[serde(default)]
    data: Vec<FundingRateEntry>,
}

#[derive(Debug, Deserialize)]
struct FundingRateEntry {
    #[serde(rename = "fundingRate")]
    funding_rate: Option<Numeric>,

    #[serde(rename = "nextFundingTime")]
    next_funding_time: Option<Numeric>,
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: "okx",
        display_name: "OKX",
        base_url: BASE_URL.to_string(),
        funding_rate_endpoint: "/api/v5/public/funding-rate",
        symbol_param: Some("instId"),
        extra_query: &[],
        symbol_format: format_symbol,
        method: HttpMethod::Get,
        headers: &[],
        body: None,
        extract,
    }
}

/// BTCUSDT -> BTC-USDT-SWAP
fn format_symbol(symbol: &str) -> String {
    format!("{}-USDT-SWAP", base_asset(symbol))
}

fn extract(raw: &Value, _venue_symbol: &str) -> Option<RateReading> {
    let response = FundingRateResponse::deserialize(raw).ok()?;
    let entry = response.data.into_iter().next()?;
    let rate = entry.funding_rate?.as_rate()?;

    Some(RateReading {
        rate,
        next_funding_time: entry.next_funding_time.and_then(|t| t.as_millis()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_swap_instrument() {
        assert_eq!(descriptor().format_symbol("BTCUSDT"), "BTC-USDT-SWAP");
        assert_eq!(descriptor().format_symbol("ETHUSDT"), "ETH-USDT-SWAP");
    }

    #[test]
    fn extracts_first_data_entry() {
        let raw = json!({
            "code": "0",
            "msg": "",
            "data": [{
                "instId": "BTC-USDT-SWAP",
                "fundingRate": "-0.0000275",
                "nextFundingTime": "1733961600000"
            }]
        });

        let reading = extract(&raw, "BTC-USDT-SWAP").unwrap();
        assert_eq!(reading.rate, -0.0000275);
        assert_eq!(reading.next_funding_time, Some(1_733_961_600_000));
    }

    #[test]
    fn empty_or_absent_data_is_unavailable() {
        assert!(extract(&json!({ "code": "51001", "data": [] }), "X").is_none());
        assert!(extract(&json!({ "code": "0" }), "X").is_none());
        assert!(extract(&json!({ "data": [{ "instId": "X" }] }), "X").is_none());
    }
}
