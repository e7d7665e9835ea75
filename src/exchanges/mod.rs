use crate::errors::ExchangeError;
use crate::models::RateReading;
use serde::Deserialize;
use serde_json::Value;

pub mod backpack;
pub mod binance;
pub mod bitget;
pub mod bybit;
pub mod hyperliquid;
pub mod okx;
pub mod paradex;
pub mod registry;

pub use registry::ExchangeRegistry;

/// Maps a canonical symbol such as "BTCUSDT" to the exchange's own format.
pub type SymbolFormat = fn(&str) -> String;

/// Pulls a funding rate out of a raw response body. The second argument is
/// the exchange-formatted symbol that was requested.
pub type Extractor = fn(&Value, &str) -> Option<RateReading>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Connection metadata for one exchange's funding-rate endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    pub base_url: String,
    pub funding_rate_endpoint: &'static str,
    /// Query parameter carrying the formatted symbol. `None` for POST APIs
    /// that return every market at once.
    pub symbol_param: Option<&'static str>,
    pub extra_query: &'static [(&'static str, &'static str)],
    pub symbol_format: SymbolFormat,
    pub method: HttpMethod,
    pub headers: &'static [(&'static str, &'static str)],
    pub body: Option<&'static str>,
    pub extract: Extractor,
}

impl ExchangeDescriptor {
    pub fn format_symbol(&self, symbol: &str) -> String {
        (self.symbol_format)(symbol)
    }

    /// Full request URL for the given exchange-formatted symbol.
    pub fn request_url(&self, venue_symbol: &str) -> Result<reqwest::Url, ExchangeError> {
        let raw = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.funding_rate_endpoint
        );
        let mut url =
            reqwest::Url::parse(&raw).map_err(|e| ExchangeError::InvalidUrl(e.to_string()))?;

        if self.symbol_param.is_some() || !self.extra_query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let Some(param) = self.symbol_param {
                pairs.append_pair(param, venue_symbol);
            }
            for (key, value) in self.extra_query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Same exchange, different host. Used to point at mirrors or mock servers.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// "BTCUSDT" -> "BTC". Symbols without the USDT suffix pass through.
pub(crate) fn base_asset(symbol: &str) -> &str {
    symbol.strip_suffix("USDT").unwrap_or(symbol)
}

/// Exchanges disagree on whether numbers are JSON numbers or strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Finite rate value, or `None` for anything unparseable.
    pub(crate) fn as_rate(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Non-negative unix milliseconds that fit in a `u64`.
    pub(crate) fn as_millis(&self) -> Option<u64> {
        match self {
            // `as` would saturate anything past u64::MAX
            Numeric::Number(n) if *n >= 0.0 && *n < u64::MAX as f64 => Some(*n as u64),
            Numeric::Number(_) => None,
            Numeric::Text(s) => s.trim().parse::<u64>().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_asset_strips_usdt_suffix_only() {
        assert_eq!(base_asset("BTCUSDT"), "BTC");
        assert_eq!(base_asset("1000PEPEUSDT"), "1000PEPE");
        assert_eq!(base_asset("BTCUSDC"), "BTCUSDC");
    }

    #[test]
    fn numeric_accepts_strings_and_numbers() {
        let text: Numeric = serde_json::from_value(json!("0.0001")).unwrap();
        let number: Numeric = serde_json::from_value(json!(-0.00025)).unwrap();
        assert_eq!(text.as_rate(), Some(0.0001));
        assert_eq!(number.as_rate(), Some(-0.00025));

        let millis: Numeric = serde_json::from_value(json!("1733961600000")).unwrap();
        assert_eq!(millis.as_millis(), Some(1_733_961_600_000));
    }

    #[test]
    fn numeric_rejects_garbage_and_non_finite() {
        let empty: Numeric = serde_json::from_value(json!("")).unwrap();
        let nan: Numeric = serde_json::from_value(json!("NaN")).unwrap();
        let inf: Numeric = serde_json::from_value(json!("inf")).unwrap();
        assert_eq!(empty.as_rate(), None);
        assert_eq!(nan.as_rate(), None);
        assert_eq!(inf.as_rate(), None);

        let negative: Numeric = serde_json::from_value(json!(-5)).unwrap();
        assert_eq!(negative.as_millis(), None);
    }

    #[test]
    fn millis_out_of_range_is_rejected() {
        let huge: Numeric = serde_json::from_value(json!(1e30)).unwrap();
        assert_eq!(huge.as_millis(), None);

        let too_long: Numeric = serde_json::from_value(json!("18446744073709551616")).unwrap();
        assert_eq!(too_long.as_millis(), None);

        let max: Numeric = serde_json::from_value(json!("18446744073709551615")).unwrap();
        assert_eq!(max.as_millis(), Some(u64::MAX));
    }

    #[test]
    fn request_url_appends_symbol_and_fixed_query() {
        let bybit = bybit::descriptor();
        let url = bybit.request_url("BTCUSDT").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.bybit.com/v5/market/funding/history?symbol=BTCUSDT&category=linear&limit=1"
        );
    }

    #[test]
    fn request_url_without_params_has_no_query() {
        let hyperliquid = hyperliquid::descriptor().with_base_url("http://127.0.0.1:9000/");
        let url = hyperliquid.request_url("BTC").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/info");
    }

    #[test]
    fn request_url_rejects_bad_base() {
        let binance = binance::descriptor().with_base_url("not a url");
        assert!(matches!(
            binance.request_url("BTCUSDT"),
            Err(ExchangeError::InvalidUrl(_))
        ));
    }
}
