use crate::exchanges::ExchangeRegistry;
use crate::fetcher::RateSource;
use crate::models::FundingRate;
use futures_util::future::join_all;

/// Queries every registered exchange for `symbol` concurrently and keeps
/// whatever succeeded, in registry order. Never fails: if nothing answers,
/// the result is empty.
pub async fn collect_rates(
    source: &dyn RateSource,
    registry: &ExchangeRegistry,
    symbol: &str,
) -> Vec<FundingRate> {
    let fetches = registry
        .iter()
        .map(|exchange| source.fetch_rate(exchange, symbol));

    let rates: Vec<FundingRate> = join_all(fetches).await.into_iter().flatten().collect();

    tracing::info!(
        "{symbol}: {}/{} exchanges reported a funding rate",
        rates.len(),
        registry.len()
    );
    rates
}
