pub mod handlers;
pub mod models;
pub mod router;

use crate::exchanges::ExchangeRegistry;
use crate::fetcher::RateSource;
use crate::snapshot::RateStore;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared handler state. Live endpoints go through `source`; the overview
/// reads `store`.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ExchangeRegistry>,
    pub source: Arc<dyn RateSource>,
    pub store: RateStore,
}

pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Binds the server to the given port and serves until Ctrl+C.
    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        // installs the global metrics recorder, so only once per process
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let app = router::build(self.state)
            .route(
                "/metrics",
                get(move || {
                    let handle = metric_handle.clone();
                    async move { handle.render() }
                }),
            )
            .layer(prometheus_layer);

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("API server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
