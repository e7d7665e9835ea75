use super::SymbolSnapshot;
use crate::models::FundingRate;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Latest snapshot per symbol. Only the most recent pass is kept.
#[derive(Clone, Default)]
pub struct RateStore {
    inner: Arc<DashMap<String, SymbolSnapshot>>,
    // 0 until the first refresh completes
    last_refresh_ms: Arc<AtomicU64>,
}

impl RateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot for its symbol
    pub fn update(&self, snapshot: SymbolSnapshot) {
        self.inner.insert(snapshot.symbol.clone(), snapshot);
    }

    pub fn remove(&self, symbol: &str) {
        self.inner.remove(symbol);
    }

    /// Drops snapshots for symbols outside the current universe
    pub fn retain_symbols(&self, symbols: &[String]) {
        self.inner.retain(|symbol, _| symbols.contains(symbol));
    }

    /// All snapshots, sorted by symbol
    pub fn all(&self) -> Vec<SymbolSnapshot> {
        let mut snapshots: Vec<_> = self.inner.iter().map(|r| r.value().clone()).collect();
        snapshots.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        snapshots
    }

    /// Every stored rate across all symbols
    pub fn all_rates(&self) -> Vec<FundingRate> {
        self.all().into_iter().flat_map(|s| s.rates).collect()
    }

    pub fn mark_refreshed(&self, at_ms: u64) {
        self.last_refresh_ms.store(at_ms, Ordering::Relaxed);
    }

    pub fn last_refreshed(&self) -> Option<u64> {
        match self.last_refresh_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(ms),
        }
    }
}
