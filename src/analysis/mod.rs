use crate::models::{ArbitrageOpportunity, FundingRate, SpreadSummary, now_ms};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Minimum rate difference (0.01%) for a pair to count as an opportunity.
pub const ARBITRAGE_THRESHOLD: f64 = 0.0001;

/// Highest minus lowest rate for `symbol`; 0 with fewer than two rates.
pub fn max_spread(rates: &[FundingRate], symbol: &str) -> f64 {
    summarize(rates, symbol).map_or(0.0, |s| s.spread)
}

/// Highest/lowest rate for `symbol`, or `None` with fewer than two rates.
/// On equal rates the first exchange seen wins.
pub fn summarize(rates: &[FundingRate], symbol: &str) -> Option<SpreadSummary> {
    let mut matching = rates.iter().filter(|r| r.symbol == symbol);
    let first = matching.next()?;

    let (mut highest, mut lowest, mut count) = (first, first, 1usize);
    for rate in matching {
        if rate.rate > highest.rate {
            highest = rate;
        }
        if rate.rate < lowest.rate {
            lowest = rate;
        }
        count += 1;
    }

    if count < 2 {
        return None;
    }

    Some(SpreadSummary {
        symbol: symbol.to_string(),
        spread: highest.rate - lowest.rate,
        highest_rate: highest.rate,
        highest_exchange: highest.exchange,
        lowest_rate: lowest.rate,
        lowest_exchange: lowest.exchange,
        exchange_count: count,
    })
}

/// One summary per symbol that has at least two rates, widest spread first.
pub fn spread_summaries(rates: &[FundingRate]) -> Vec<SpreadSummary> {
    let mut symbols: Vec<&str> = Vec::new();
    for rate in rates {
        if !symbols.contains(&rate.symbol.as_str()) {
            symbols.push(&rate.symbol);
        }
    }

    let mut summaries: Vec<SpreadSummary> = symbols
        .into_iter()
        .filter_map(|symbol| summarize(rates, symbol))
        .collect();
    summaries.sort_by_key(|s| Reverse(OrderedFloat(s.spread)));
    summaries
}

/// Every unordered pair of entries whose rates differ by more than
/// [`ARBITRAGE_THRESHOLD`], largest difference first. Pairs are not grouped
/// by symbol; callers wanting one symbol filter first.
pub fn find_arbitrage_opportunities(rates: &[FundingRate]) -> Vec<ArbitrageOpportunity> {
    let timestamp = now_ms();
    let mut opportunities = Vec::new();

    for (i, a) in rates.iter().enumerate() {
        for b in &rates[i + 1..] {
            let rate_difference = (a.rate - b.rate).abs();
            if rate_difference <= ARBITRAGE_THRESHOLD {
                continue;
            }

            // pay funding where it's low, collect where it's high
            let (buy, sell) = if a.rate < b.rate { (a, b) } else { (b, a) };

            opportunities.push(ArbitrageOpportunity {
                symbol: a.symbol.clone(),
                buy_exchange: buy.exchange,
                sell_exchange: sell.exchange,
                rate_difference,
                timestamp,
            });
        }
    }

    // stable: equal differences keep pair order
    opportunities.sort_by_key(|o| Reverse(OrderedFloat(o.rate_difference)));
    opportunities
}

/// [`find_arbitrage_opportunities`] restricted to one symbol.
pub fn symbol_opportunities(rates: &[FundingRate], symbol: &str) -> Vec<ArbitrageOpportunity> {
    let scoped: Vec<FundingRate> = rates
        .iter()
        .filter(|r| r.symbol == symbol)
        .cloned()
        .collect();
    find_arbitrage_opportunities(&scoped)
}

/// Formats a fractional rate as a percentage, e.g. 0.0001 -> "0.0100%".
pub fn format_rate(rate: f64) -> String {
    format!("{:.4}%", rate * 100.0)
}
