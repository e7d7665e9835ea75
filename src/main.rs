mod aggregator;
mod analysis;
mod api;
mod config;
mod errors;
mod exchanges;
mod fetcher;
mod models;
mod refresher;
mod snapshot;

use api::{ApiServer, AppState};
use config::Config;
use exchanges::{ExchangeRegistry, binance};
use fetcher::{RateFetcher, RateSource, TracingObserver};
use refresher::{FixedSymbols, Refresher, SymbolSource, TopVolumeSymbols};
use snapshot::RateStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    let registry = Arc::new(ExchangeRegistry::select(&config.exchanges, &config.base_urls)?);
    let store = RateStore::new();

    tracing::info!(
        "fundspread starting: {} exchanges, refresh every {:?}, port {}",
        registry.len(),
        config.refresh_interval,
        config.api_port
    );

    let observer = Arc::new(TracingObserver::new(config.http.log_http));
    let fetcher = Arc::new(RateFetcher::new(&config.http, observer)?);

    // ── 1. Pick the symbol universe ───────────────────────────────
    let symbols: Arc<dyn SymbolSource> = if config.symbols.is_empty() {
        tracing::info!("Tracking top {} symbols by volume", config.top_symbols);
        Arc::new(TopVolumeSymbols::new(
            fetcher.clone(),
            registry
                .get(binance::ID)
                .map(|ex| ex.base_url.clone())
                .unwrap_or_else(|| binance::descriptor().base_url),
            config.top_symbols,
            config.fallback_symbols.clone(),
        ))
    } else {
        tracing::info!("Tracking symbols: {:?}", config.symbols);
        Arc::new(FixedSymbols(config.symbols.clone()))
    };

    // ── 2. Spawn the periodic refresh loop ────────────────────────
    let source: Arc<dyn RateSource> = fetcher;
    Refresher::new(
        registry.clone(),
        source.clone(),
        symbols,
        store.clone(),
        config.refresh_interval,
    )
    .spawn();

    // ── 3. Serve the API until Ctrl+C ─────────────────────────────
    let state = AppState {
        registry,
        source,
        store,
    };
    ApiServer::new(state).run(config.api_port).await
}
