use super::{ExchangeDescriptor, HttpMethod, Numeric};
use crate::models::RateReading;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://api.bybit.com";

#[derive(Debug, Deserialize)]
struct FundingHistoryResponse {
    #[serde(rename = "retCode")]
    ret_code: i64,
    result: Option<FundingHistoryResult>,
}

#[derive(Debug, Deserialize)]
struct FundingHistoryResult {
    #[serde(default)]
    list: Vec<FundingHistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct FundingHistoryEntry {
    #[serde(rename = "fundingRate")]
    funding_rate: Option<Numeric>,

    #[serde(rename = "fundingRateTimestamp")]
    funding_rate_timestamp: Option<Numeric>,
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: "bybit",
        display_name: "Bybit",
        base_url: BASE_URL.to_string(),
        funding_rate_endpoint: "/v5/market/funding/history",
        symbol_param: Some("symbol"),
        extra_query: &[("category", "linear"), ("limit", "1")],
        symbol_format: format_symbol,
        method: HttpMethod::Get,
        headers: &[],
        body: None,
        extract,
    }
}

fn format_symbol(symbol: &str) -> String {
    symbol.to_string()
}

fn extract(raw: &Value, _venue_symbol: &str) -> Option<RateReading> {
    let response = FundingHistoryResponse::deserialize(raw).ok()?;

    // Bybit signals errors via retCode, not just HTTP status
    if response.ret_code != 0 {
        return None;
    }

    let entry = response.result?.list.into_iter().next()?;
    let rate = entry.funding_rate?.as_rate()?;

    Some(RateReading {
        rate,
        next_funding_time: entry.funding_rate_timestamp.and_then(|t| t.as_millis()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn symbol_is_unchanged() {
        assert_eq!(descriptor().format_symbol("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn extracts_latest_history_entry() {
        let raw = json!({
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "category": "linear",
                "list": [{
                    "symbol": "BTCUSDT",
                    "fundingRate": "0.0001",
                    "fundingRateTimestamp": "1733932800000"
                }]
            }
        });

        let reading = extract(&raw, "BTCUSDT").unwrap();
        assert_eq!(reading.rate, 0.0001);
        assert_eq!(reading.next_funding_time, Some(1_733_932_800_000));
    }

    #[test]
    fn non_zero_ret_code_is_unavailable() {
        let raw = json!({
            "retCode": 10001,
            "retMsg": "params error",
            "result": { "list": [{ "fundingRate": "0.0001" }] }
        });
        assert!(extract(&raw, "BTCUSDT").is_none());
    }

    #[test]
    fn empty_list_or_missing_result_is_unavailable() {
        assert!(extract(&json!({ "retCode": 0, "result": { "list": [] } }), "X").is_none());
        assert!(extract(&json!({ "retCode": 0, "result": {} }), "X").is_none());
        assert!(extract(&json!({ "retCode": 0 }), "X").is_none());
        assert!(extract(&json!({ "result": { "list": [] } }), "X").is_none());
    }
}
