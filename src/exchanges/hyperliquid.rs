use super::{ExchangeDescriptor, HttpMethod, Numeric, base_asset};
use crate::models::RateReading;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://api.hyperliquid.xyz";

/// Venue key for Hyperliquid's own perp inside the predictedFundings payload.
/// The same payload also carries Binance and Bybit predictions.
const VENUE: &str = "HlPerp";

#[derive(Debug, Deserialize)]
struct VenueFunding {
    #[serde(rename = "fundingRate")]
    funding_rate: Option<Numeric>,

    #[serde(rename = "nextFundingTime")]
    next_funding_time: Option<Numeric>,
}

pub fn descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor {
        id: "hyperliquid",
        display_name: "Hyperliquid",
        base_url: BASE_URL.to_string(),
        funding_rate_endpoint: "/info",
        symbol_param: None,
        extra_query: &[],
        symbol_format: format_symbol,
        method: HttpMethod::Post,
        headers: &[("Content-Type", "application/json")],
        body: Some(r#"{"type":"predictedFundings"}"#),
        extract,
    }
}

/// Hyperliquid names markets by coin: BTCUSDT -> BTC
fn format_symbol(symbol: &str) -> String {
    base_asset(symbol).to_string()
}

/// Response is `[[coin, [[venue, {fundingRate, nextFundingTime}], ...]], ...]`.
/// Only the requested coin and venue need to be well-formed.
fn extract(raw: &Value, coin: &str) -> Option<RateReading> {
    let venues = find_entry(raw.as_array()?, coin)?.as_array()?;
    let funding = VenueFunding::deserialize(find_entry(venues, VENUE)?).ok()?;

    Some(RateReading {
        rate: funding.funding_rate?.as_rate()?,
        next_funding_time: funding.next_funding_time.and_then(|t| t.as_millis()),
    })
}

/// Value of the first `[name, value]` pair whose name matches.
fn find_entry<'a>(pairs: &'a [Value], name: &str) -> Option<&'a Value> {
    pairs.iter().find_map(|pair| match pair.as_array()?.as_slice() {
        [key, value] if key.as_str() == Some(name) => Some(value),
        _ => None,
    })
}
