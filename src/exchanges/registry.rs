use super::{ExchangeDescriptor, backpack, binance, bitget, bybit, hyperliquid, okx, paradex};
use crate::errors::ConfigError;

/// Immutable lookup table of the exchanges a pass will query.
#[derive(Debug, Clone)]
pub struct ExchangeRegistry {
    exchanges: Vec<ExchangeDescriptor>,
}

impl ExchangeRegistry {
    pub fn new(exchanges: Vec<ExchangeDescriptor>) -> Self {
        Self { exchanges }
    }

    /// Every supported exchange, in dashboard column order.
    pub fn all() -> Self {
        Self::new(vec![
            binance::descriptor(),
            okx::descriptor(),
            bybit::descriptor(),
            bitget::descriptor(),
            backpack::descriptor(),
            hyperliquid::descriptor(),
            paradex::descriptor(),
        ])
    }

    /// Narrows the full registry to the given ids (empty keeps all) and
    /// repoints any exchange listed in `base_urls`.
    pub fn select(ids: &[String], base_urls: &[(String, String)]) -> Result<Self, ConfigError> {
        let all = Self::all();

        let unknown = ids
            .iter()
            .chain(base_urls.iter().map(|(id, _)| id))
            .find(|id| all.get(id).is_none());
        if let Some(unknown) = unknown {
            return Err(ConfigError::UnknownExchange(unknown.clone()));
        }

        let exchanges: Vec<_> = all
            .exchanges
            .into_iter()
            .filter(|ex| ids.is_empty() || ids.iter().any(|id| id == ex.id))
            .map(|ex| match base_urls.iter().find(|(id, _)| id == ex.id) {
                Some((_, url)) => ex.with_base_url(url.clone()),
                None => ex,
            })
            .collect();

        if exchanges.is_empty() {
            return Err(ConfigError::NoExchanges);
        }
        Ok(Self::new(exchanges))
    }

    pub fn get(&self, id: &str) -> Option<&ExchangeDescriptor> {
        self.exchanges.iter().find(|ex| ex.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeDescriptor> {
        self.exchanges.iter()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_has_seven_unique_exchanges() {
        let registry = ExchangeRegistry::all();
        assert_eq!(registry.len(), 7);

        let mut ids: Vec<_> = registry.iter().map(|ex| ex.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn symbol_formats_for_btcusdt() {
        let registry = ExchangeRegistry::all();
        let expected = [
            ("binance", "BTCUSDT"),
            ("okx", "BTC-USDT-SWAP"),
            ("bybit", "BTCUSDT"),
            ("bitget", "BTCUSDT_UMCBL"),
            ("backpack", "BTC_USDC_PERP"),
            ("hyperliquid", "BTC"),
            ("paradex", "BTC-USD-PERP"),
        ];

        for (id, formatted) in expected {
            let ex = registry.get(id).unwrap();
            assert_eq!(ex.format_symbol("BTCUSDT"), formatted, "{id}");
            // pure: same input, same output
            assert_eq!(ex.format_symbol("BTCUSDT"), ex.format_symbol("BTCUSDT"));
        }
    }

    #[test]
    fn select_keeps_registry_order() {
        let ids = vec!["paradex".to_string(), "binance".to_string()];
        let registry = ExchangeRegistry::select(&ids, &[]).unwrap();
        let names: Vec<_> = registry.iter().map(|ex| ex.display_name).collect();
        assert_eq!(names, vec!["Binance", "Paradex"]);
    }

    #[test]
    fn select_empty_means_all() {
        assert_eq!(ExchangeRegistry::select(&[], &[]).unwrap().len(), 7);
    }

    #[test]
    fn select_rejects_unknown_id() {
        let ids = vec!["binance".to_string(), "mtgox".to_string()];
        let err = ExchangeRegistry::select(&ids, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownExchange(id) if id == "mtgox"));
    }

    #[test]
    fn select_applies_base_url_overrides() {
        let overrides = vec![("okx".to_string(), "https://aws.okx.com".to_string())];
        let registry = ExchangeRegistry::select(&[], &overrides).unwrap();
        assert_eq!(registry.get("okx").unwrap().base_url, "https://aws.okx.com");
        assert_eq!(registry.get("binance").unwrap().base_url, "https://fapi.binance.com");

        let bad = vec![("kraken".to_string(), "https://example.com".to_string())];
        assert!(ExchangeRegistry::select(&[], &bad).is_err());
    }

    #[test]
    fn get_unknown_is_none() {
        assert!(ExchangeRegistry::all().get("ftx").is_none());
    }
}
