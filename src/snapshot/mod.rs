pub mod store;

use crate::models::{FundingRate, now_ms};
use serde::Serialize;
pub use store::RateStore;

/// Rates gathered for one symbol by a single aggregation pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub rates: Vec<FundingRate>,
    pub updated_ms: u64,
}

impl SymbolSnapshot {
    pub fn new(symbol: impl Into<String>, rates: Vec<FundingRate>) -> Self {
        Self {
            symbol: symbol.into(),
            rates,
            updated_ms: now_ms(),
        }
    }
}
