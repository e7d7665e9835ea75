use crate::errors::ConfigError;
use std::env;
use std::time::Duration;

const DEFAULT_FALLBACK_SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT"];

#[derive(Debug, Clone)]
pub struct Config {
    pub api_port: u16,
    /// Fixed symbol universe for the refresher. Empty means discover the
    /// top symbols by volume instead.
    pub symbols: Vec<String>,
    pub top_symbols: usize,
    pub fallback_symbols: Vec<String>,
    pub refresh_interval: Duration,
    /// Exchange ids to query. Empty means every supported exchange.
    pub exchanges: Vec<String>,
    /// `(exchange id, base url)` overrides, e.g. to use a regional mirror.
    pub base_urls: Vec<(String, String)>,
    pub http: HttpConfig,
}

/// Outbound client settings shared by every exchange call.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub proxy: Option<ProxyConfig>,
    /// Log every outbound request and response body at debug level.
    /// Failures are logged either way.
    pub log_http: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            proxy: None,
            log_http: true,
        }
    }
}

#[derive(Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

// keep credentials out of logs
impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let symbols = var("SYMBOLS")
            .map(|s| split_list(&s, str::to_uppercase))
            .unwrap_or_default();

        let exchanges = var("EXCHANGES")
            .map(|s| split_list(&s, str::to_lowercase))
            .unwrap_or_default();

        let base_urls = match var("EXCHANGE_BASE_URLS") {
            Some(raw) => parse_base_urls(&raw)?,
            None => Vec::new(),
        };

        let api_port = parse_or("API_PORT", var("API_PORT"), 3000u16, "a port number (1-65535)")?;
        let top_symbols = parse_or("TOP_SYMBOLS", var("TOP_SYMBOLS"), 10usize, "a count")?;
        let refresh_secs = parse_or(
            "REFRESH_INTERVAL_SECS",
            var("REFRESH_INTERVAL_SECS"),
            30u64,
            "a number of seconds",
        )?;
        let timeout_secs = parse_or(
            "REQUEST_TIMEOUT_SECS",
            var("REQUEST_TIMEOUT_SECS"),
            30u64,
            "a number of seconds",
        )?;

        if refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REFRESH_INTERVAL_SECS",
                expected: "greater than zero",
                value: refresh_secs.to_string(),
            });
        }

        let log_http = parse_or("LOG_HTTP", var("LOG_HTTP"), true, "true or false")?;

        let proxy = match var("PROXY_HOST") {
            Some(host) => Some(ProxyConfig {
                host: host.trim().to_string(),
                port: parse_or("PROXY_PORT", var("PROXY_PORT"), 1337u16, "a port number")?,
                username: var("PROXY_USERNAME"),
                password: var("PROXY_PASSWORD"),
            }),
            None => None,
        };

        Ok(Self {
            api_port,
            symbols,
            top_symbols,
            fallback_symbols: DEFAULT_FALLBACK_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            refresh_interval: Duration::from_secs(refresh_secs),
            exchanges,
            base_urls,
            http: HttpConfig {
                request_timeout: Duration::from_secs(timeout_secs),
                proxy,
                log_http,
            },
        })
    }
}

fn split_list(raw: &str, normalize: fn(&str) -> String) -> Vec<String> {
    raw.split(',')
        .map(|s| normalize(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// "okx=https://aws.okx.com,binance=https://fapi.binance.com"
fn parse_base_urls(raw: &str) -> Result<Vec<(String, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((id, url)) if !id.trim().is_empty() && !url.trim().is_empty() => {
                Ok((id.trim().to_lowercase(), url.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidValue {
                key: "EXCHANGE_BASE_URLS",
                expected: "comma-separated id=url pairs",
                value: entry.to_string(),
            }),
        })
        .collect()
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue {
                key,
                expected,
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_port, 3000);
        assert!(config.symbols.is_empty());
        assert_eq!(config.top_symbols, 10);
        assert_eq!(config.fallback_symbols, vec!["BTCUSDT", "ETHUSDT"]);
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.http.request_timeout, Duration::from_secs(30));
        assert!(config.http.proxy.is_none());
        assert!(config.exchanges.is_empty());
        assert!(config.base_urls.is_empty());
        assert!(config.http.log_http);
    }

    #[test]
    fn parses_base_url_overrides() {
        let config = config_from(&[
            ("EXCHANGE_BASE_URLS", "OKX=https://aws.okx.com, binance = http://localhost:8080"),
            ("LOG_HTTP", "false"),
        ])
        .unwrap();
        assert_eq!(
            config.base_urls,
            vec![
                ("okx".to_string(), "https://aws.okx.com".to_string()),
                ("binance".to_string(), "http://localhost:8080".to_string()),
            ]
        );
        assert!(!config.http.log_http);

        let err = config_from(&[("EXCHANGE_BASE_URLS", "okx")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "EXCHANGE_BASE_URLS", .. }));
    }

    #[test]
    fn parses_lists_and_normalizes_case() {
        let config = config_from(&[
            ("SYMBOLS", " btcusdt, ethusdt ,,solusdt"),
            ("EXCHANGES", "Binance,OKX"),
        ])
        .unwrap();
        assert_eq!(config.symbols, vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
        assert_eq!(config.exchanges, vec!["binance", "okx"]);
    }

    #[test]
    fn proxy_only_when_host_set() {
        let config = config_from(&[("PROXY_USERNAME", "alice")]).unwrap();
        assert!(config.http.proxy.is_none());

        let config = config_from(&[
            ("PROXY_HOST", "proxy.internal"),
            ("PROXY_USERNAME", "alice"),
            ("PROXY_PASSWORD", "s3cret"),
        ])
        .unwrap();
        let proxy = config.http.proxy.unwrap();
        assert_eq!(proxy.url(), "http://proxy.internal:1337");
        assert_eq!(proxy.username.as_deref(), Some("alice"));
        assert!(!format!("{proxy:?}").contains("s3cret"));
    }

    #[test]
    fn rejects_invalid_numbers() {
        let err = config_from(&[("API_PORT", "99999")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "API_PORT", .. }));

        let err = config_from(&[("REFRESH_INTERVAL_SECS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "REFRESH_INTERVAL_SECS", .. }
        ));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("API_PORT", "  "), ("SYMBOLS", "")]).unwrap();
        assert_eq!(config.api_port, 3000);
        assert!(config.symbols.is_empty());
    }
}
