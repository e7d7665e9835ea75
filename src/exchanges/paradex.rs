use super::{ExchangeDescriptor, HttpMethod, Numeric, base_asset};
use crate::models::RateReading;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://api.prod.paradex.trade";

#[derive(Debug, Deserialize)]
struct FundingDataResponse {
    #[serde(default)]
    results: Vec<FundingData>,
}

#[derive(Debug, Deserialize)]
struct FundingData {
    funding_rate: Option<Numeric>,
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: "paradex",
        display_name: "Paradex",
        base_url: BASE_URL.to_string(),
        funding_rate_endpoint: "/v1/funding/data",
        symbol_param: Some("market"),
        extra_query: &[("page_size", "1")],
        symbol_format: format_symbol,
        method: HttpMethod::Get,
        headers: &[],
        body: None,
        extract,
    }
}

/// BTCUSDT -> BTC-USD-PERP
fn format_symbol(symbol: &str) -> String {
    format!("{}-USD-PERP", base_asset(symbol))
}

/// Paradex doesn't publish a next funding time; funding accrues continuously.
fn extract(raw: &Value, _venue_symbol: &str) -> Option<RateReading> {
    let response = FundingDataResponse::deserialize(raw).ok()?;
    let entry = response.results.into_iter().next()?;

    Some(RateReading {
        rate: entry.funding_rate?.as_rate()?,
        next_funding_time: None,
    })
}
