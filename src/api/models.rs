use crate::models::{ArbitrageOpportunity, FundingRate, SpreadSummary};
use serde::{Deserialize, Serialize};

/// `?symbol=` on the live endpoints
#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    pub symbol: Option<String>,
}

/// `?limit=` on GET /api/overview
#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    pub limit: Option<usize>,
}

/// Response for GET /api/arbitrage
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArbitrageResponse {
    pub symbol: String,
    pub max_spread: f64,
    pub summary: Option<SpreadSummary>,
    pub opportunities: Vec<ArbitrageOpportunity>,
    pub rates: Vec<FundingRate>,
}

/// One row of the overview table
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolOverview {
    pub symbol: String,
    pub max_spread: f64,
    pub rates: Vec<FundingRate>,
    pub opportunities: Vec<ArbitrageOpportunity>,
}

/// Response for GET /api/overview
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub updated_ms: Option<u64>,
    pub top_spreads: Vec<SpreadSummary>,
    pub symbols: Vec<SymbolOverview>,
}
