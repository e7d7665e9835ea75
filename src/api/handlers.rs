use super::AppState;
use super::models::{
    ArbitrageResponse, OverviewQuery, OverviewResponse, SymbolOverview, SymbolQuery,
};
use crate::aggregator::collect_rates;
use crate::analysis::{max_spread, spread_summaries, summarize, symbol_opportunities};
use crate::errors::ApiError;
use crate::models::FundingRate;
use axum::{
    extract::{Query, State},
    response::Json,
};

const DEFAULT_TOP_SPREADS: usize = 5;

/// Trimmed, upper-cased symbol or the 400 error.
fn require_symbol(query: &SymbolQuery) -> Result<String, ApiError> {
    query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .ok_or(ApiError::MissingSymbol)
}

/// GET /health - simple liveness check
pub async fn health() -> &'static str {
    "OK"
}

/// GET /api/funding-rate?symbol=BTCUSDT - live rates from every exchange
pub async fn get_funding_rates(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<Vec<FundingRate>>, ApiError> {
    let symbol = require_symbol(&query)?;
    let rates = collect_rates(state.source.as_ref(), &state.registry, &symbol).await;
    Ok(Json(rates))
}

/// GET /api/arbitrage?symbol=BTCUSDT - live rates plus ranked pairs
pub async fn get_arbitrage(
    State(state): State<AppState>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<ArbitrageResponse>, ApiError> {
    let symbol = require_symbol(&query)?;
    let rates = collect_rates(state.source.as_ref(), &state.registry, &symbol).await;

    Ok(Json(ArbitrageResponse {
        max_spread: max_spread(&rates, &symbol),
        summary: summarize(&rates, &symbol),
        opportunities: symbol_opportunities(&rates, &symbol),
        symbol,
        rates,
    }))
}

/// GET /api/overview - whatever the last background refresh collected
pub async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Json<OverviewResponse> {
    let snapshots = state.store.all();
    let all_rates: Vec<FundingRate> = snapshots.iter().flat_map(|s| s.rates.clone()).collect();

    let mut top_spreads = spread_summaries(&all_rates);
    top_spreads.truncate(query.limit.unwrap_or(DEFAULT_TOP_SPREADS));

    let symbols = snapshots
        .into_iter()
        .map(|snapshot| SymbolOverview {
            max_spread: max_spread(&snapshot.rates, &snapshot.symbol),
            opportunities: symbol_opportunities(&snapshot.rates, &snapshot.symbol),
            symbol: snapshot.symbol,
            rates: snapshot.rates,
        })
        .collect();

    Json(OverviewResponse {
        updated_ms: state.store.last_refreshed(),
        top_spreads,
        symbols,
    })
}
