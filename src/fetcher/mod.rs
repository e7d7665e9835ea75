pub mod observer;

use crate::config::HttpConfig;
use crate::errors::{ConfigError, ExchangeError};
use crate::exchanges::{ExchangeDescriptor, HttpMethod, binance};
use crate::models::{FundingRate, now_ms};
use async_trait::async_trait;
pub use observer::{HttpObserver, TracingObserver};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

const ERROR_BODY_CHARS: usize = 200;

/// Anything that can produce one exchange's funding rate for a symbol.
/// `None` means the exchange has nothing usable this pass.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self, exchange: &ExchangeDescriptor, symbol: &str)
    -> Option<FundingRate>;
}

/// Live fetcher: one HTTP call per exchange, bounded by the client timeout.
pub struct RateFetcher {
    client: reqwest::Client,
    observer: Arc<dyn HttpObserver>,
}

impl RateFetcher {
    pub fn new(config: &HttpConfig, observer: Arc<dyn HttpObserver>) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder().timeout(config.request_timeout);

        if let Some(proxy_config) = &config.proxy {
            let mut proxy = reqwest::Proxy::all(proxy_config.url()).map_err(ConfigError::Proxy)?;
            if let Some(username) = &proxy_config.username {
                proxy = proxy.basic_auth(username, proxy_config.password.as_deref().unwrap_or(""));
            }
            tracing::info!("Routing exchange requests through proxy {}", proxy_config.url());
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(ConfigError::HttpClient)?;
        Ok(Self { client, observer })
    }

    /// Issues the descriptor's request and decodes the body as JSON.
    async fn request(
        &self,
        exchange: &ExchangeDescriptor,
        venue_symbol: &str,
    ) -> Result<Value, ExchangeError> {
        let url = exchange.request_url(venue_symbol)?;

        let mut request = match exchange.method {
            HttpMethod::Get => self.client.get(url.clone()),
            HttpMethod::Post => self.client.post(url.clone()),
        };
        for (name, value) in exchange.headers {
            request = request.header(*name, *value);
        }
        if let Some(body) = exchange.body {
            request = request.body(body);
        }

        self.observer.on_request(
            exchange.display_name,
            exchange.method.as_str(),
            url.as_str(),
            exchange.body,
        );
        self.execute(exchange.display_name, request).await
    }

    async fn execute(
        &self,
        label: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, ExchangeError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        self.observer.on_response(label, status.as_u16(), &body);

        if !status.is_success() {
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                body: observer::truncate(&body, ERROR_BODY_CHARS),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// USDT perpetuals ranked by Binance 24h quote volume.
    pub async fn top_symbols_by_volume(
        &self,
        binance_base_url: &str,
        limit: usize,
    ) -> Result<Vec<String>, ExchangeError> {
        let url = format!(
            "{}{}",
            binance_base_url.trim_end_matches('/'),
            binance::TICKER_24H_ENDPOINT
        );

        self.observer.on_request("Binance", "GET", &url, None);
        let raw = self.execute("Binance", self.client.get(&url)).await?;

        let symbols = binance::rank_by_quote_volume(&raw, limit);
        if symbols.is_empty() {
            return Err(ExchangeError::UnexpectedData(
                "no USDT tickers in 24hr response".to_string(),
            ));
        }
        Ok(symbols)
    }
}

fn record_outcome(exchange: &ExchangeDescriptor, outcome: &'static str) {
    metrics::counter!(
        "funding_fetch_total",
        "exchange" => exchange.id,
        "outcome" => outcome
    )
    .increment(1);
}

#[async_trait]
impl RateSource for RateFetcher {
    /// Fetches, extracts and stamps one exchange's rate. Every failure mode
    /// is logged and folded into `None` so sibling exchanges are unaffected.
    async fn fetch_rate(
        &self,
        exchange: &ExchangeDescriptor,
        symbol: &str,
    ) -> Option<FundingRate> {
        let venue_symbol = exchange.format_symbol(symbol);
        let started = Instant::now();

        let result = self.request(exchange, &venue_symbol).await;
        metrics::histogram!("funding_fetch_duration_seconds", "exchange" => exchange.id)
            .record(started.elapsed().as_secs_f64());

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                self.observer.on_error(exchange.display_name, &e);
                record_outcome(exchange, "error");
                return None;
            }
        };

        let Some(reading) = (exchange.extract)(&raw, &venue_symbol) else {
            tracing::warn!(
                "[{}] no funding rate available for {}",
                exchange.display_name,
                venue_symbol
            );
            record_outcome(exchange, "unavailable");
            return None;
        };

        record_outcome(exchange, "ok");
        tracing::debug!(
            "[{}] {} funding rate: {:.4}%",
            exchange.display_name,
            symbol,
            reading.rate * 100.0
        );

        Some(FundingRate {
            exchange: exchange.display_name,
            symbol: symbol.to_string(),
            rate: reading.rate,
            timestamp: now_ms(),
            next_funding_time: reading.next_funding_time,
        })
    }
}
