use super::{ExchangeDescriptor, HttpMethod, Numeric};
use crate::models::RateReading;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://api.bitget.com";
const SUCCESS_CODE: &str = "00000";

/// Bitget settles USDT-M funding every 8 hours.
const FUNDING_INTERVAL_MS: u64 = 8 * 60 * 60 * 1000;

#[derive(Debug, Deserialize)]
struct CurrentFundRateResponse {
    code: String,
    data: Option<CurrentFundRate>,

    #[serde(rename = "requestTime")]
    request_time: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
struct CurrentFundRate {
    #[serde(rename = "fundingRate")]
    funding_rate: Option<Numeric>,
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: "bitget",
        display_name: "Bitget",
        base_url: BASE_URL.to_string(),
        funding_rate_endpoint: "/api/mix/v1/market/current-fundRate",
        symbol_param: Some("symbol"),
        extra_query: &[],
        symbol_format: format_symbol,
        method: HttpMethod::Get,
        headers: &[],
        body: None,
        extract,
    }
}

/// BTCUSDT -> BTCUSDT_UMCBL
fn format_symbol(symbol: &str) -> String {
    format!("{symbol}_UMCBL")
}

fn extract(raw: &Value, _venue_symbol: &str) -> Option<RateReading> {
    let response = CurrentFundRateResponse::deserialize(raw).ok()?;
    if response.code != SUCCESS_CODE {
        return None;
    }

    let rate = response.data?.funding_rate?.as_rate()?;
    let next_funding_time = response
        .request_time
        .and_then(|t| t.as_millis())
        .and_then(|t| t.checked_add(FUNDING_INTERVAL_MS));

    Some(RateReading {
        rate,
        next_funding_time,
    })
}
