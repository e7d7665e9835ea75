use super::{ExchangeDescriptor, HttpMethod, Numeric, base_asset};
use crate::models::RateReading;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://api.backpack.exchange";

#[derive(Debug, Deserialize)]
struct FundingRateEntry {
    #[serde(rename = "fundingRate")]
    funding_rate: Option<Numeric>,

    #[serde(rename = "intervalEndTimestamp")]
    interval_end_timestamp: Option<String>,
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: "backpack",
        display_name: "Backpack",
        base_url: BASE_URL.to_string(),
        funding_rate_endpoint: "/api/v1/fundingRates",
        symbol_param: Some("symbol"),
        extra_query: &[("limit", "1")],
        symbol_format: format_symbol,
        method: HttpMethod::Get,
        headers: &[],
        body: None,
        extract,
    }
}

/// Backpack perps settle in USDC: BTCUSDT -> BTC_USDC_PERP
fn format_symbol(symbol: &str) -> String {
    format!("{}_USDC_PERP", base_asset(symbol))
}

fn extract(raw: &Value, _venue_symbol: &str) -> Option<RateReading> {
    let entries = Vec::<FundingRateEntry>::deserialize(raw).ok()?;
    let entry = entries.into_iter().next()?;
    let rate = entry.funding_rate?.as_rate()?;

    Some(RateReading {
        rate,
        next_funding_time: entry
            .interval_end_timestamp
            .as_deref()
            .and_then(parse_timestamp),
    })
}

/// Backpack sends ISO-8601 without an offset; treat those as UTC.
fn parse_timestamp(value: &str) -> Option<u64> {
    let millis = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.timestamp_millis(),
        Err(_) => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()?
            .and_utc()
            .timestamp_millis(),
    };
    u64::try_from(millis).ok()
}
