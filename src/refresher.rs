use crate::aggregator::collect_rates;
use crate::analysis::{format_rate, spread_summaries};
use crate::exchanges::ExchangeRegistry;
use crate::fetcher::{RateFetcher, RateSource};
use crate::models::now_ms;
use crate::snapshot::{RateStore, SymbolSnapshot};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Supplies the symbols each refresh pass covers.
#[async_trait]
pub trait SymbolSource: Send + Sync {
    async fn symbols(&self) -> Vec<String>;
}

pub struct FixedSymbols(pub Vec<String>);

#[async_trait]
impl SymbolSource for FixedSymbols {
    async fn symbols(&self) -> Vec<String> {
        self.0.clone()
    }
}

/// Top USDT perpetuals by Binance volume, re-ranked every pass.
pub struct TopVolumeSymbols {
    fetcher: Arc<RateFetcher>,
    base_url: String,
    limit: usize,
    fallback: Vec<String>,
}

impl TopVolumeSymbols {
    pub fn new(
        fetcher: Arc<RateFetcher>,
        base_url: impl Into<String>,
        limit: usize,
        fallback: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            limit,
            fallback,
        }
    }
}

#[async_trait]
impl SymbolSource for TopVolumeSymbols {
    async fn symbols(&self) -> Vec<String> {
        match self
            .fetcher
            .top_symbols_by_volume(&self.base_url, self.limit)
            .await
        {
            Ok(symbols) => symbols,
            Err(e) => {
                tracing::warn!(
                    "Symbol discovery failed ({e}), falling back to {:?}",
                    self.fallback
                );
                self.fallback.clone()
            }
        }
    }
}

/// Periodically aggregates every symbol in the universe into the store.
pub struct Refresher {
    registry: Arc<ExchangeRegistry>,
    source: Arc<dyn RateSource>,
    symbols: Arc<dyn SymbolSource>,
    store: RateStore,
    interval: Duration,
}

impl Refresher {
    pub fn new(
        registry: Arc<ExchangeRegistry>,
        source: Arc<dyn RateSource>,
        symbols: Arc<dyn SymbolSource>,
        store: RateStore,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            source,
            symbols,
            store,
            interval,
        }
    }

    /// One full pass. Symbols are walked in order; exchanges per symbol run
    /// concurrently inside the aggregator.
    pub async fn refresh_once(&self) {
        let symbols = self.symbols.symbols().await;
        self.store.retain_symbols(&symbols);

        for symbol in &symbols {
            let rates = collect_rates(self.source.as_ref(), &self.registry, symbol).await;
            if rates.is_empty() {
                tracing::warn!("{symbol}: no exchange returned a funding rate");
                self.store.remove(symbol);
            } else {
                self.store.update(SymbolSnapshot::new(symbol.clone(), rates));
            }
        }

        self.store.mark_refreshed(now_ms());
        self.log_top_spreads();
    }

    fn log_top_spreads(&self) {
        let summaries = spread_summaries(&self.store.all_rates());
        tracing::info!("=== TOP FUNDING SPREADS ===");
        for summary in summaries.iter().take(5) {
            tracing::info!(
                "{}: spread={} high={} ({}) low={} ({})",
                summary.symbol,
                format_rate(summary.spread),
                format_rate(summary.highest_rate),
                summary.highest_exchange,
                format_rate(summary.lowest_rate),
                summary.lowest_exchange
            );
        }
    }

    /// Runs passes forever on a fixed interval. A slow pass delays the next
    /// tick instead of stacking passes.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.refresh_once().await;
            }
        })
    }
}
