//! Multi-symbol time alignment.
//!
//! Given bars for several symbols, align them to the union of their dates.
//! Missing bars become void bars (every field `NaN`); nothing is forward-filled
//! here.

use super::provider::{FetchResult, RawBar};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Bars for several symbols on a common, ascending date axis.
#[derive(Debug)]
pub struct AlignedBars {
    pub dates: Vec<NaiveDate>,
    /// Symbols in the order they were supplied.
    pub symbols: Vec<String>,
    /// One bar per date for every symbol.
    pub bars: HashMap<String, Vec<RawBar>>,
}

impl AlignedBars {
    /// Values of one bar field for `symbol`, aligned to `dates`.
    pub fn field(&self, symbol: &str, get: impl Fn(&RawBar) -> f64) -> Vec<f64> {
        match self.bars.get(symbol) {
            Some(bars) => bars.iter().map(get).collect(),
            None => vec![f64::NAN; self.dates.len()],
        }
    }
}

/// Align fetched symbols to a common timeline.
///
/// For each date in the union of all symbols' dates, each symbol either has a
/// real bar or gets a void bar. A later fetch of an already-seen symbol
/// replaces the earlier one.
pub fn align_symbols(results: Vec<FetchResult>) -> AlignedBars {
    let all_dates: BTreeSet<NaiveDate> = results
        .iter()
        .flat_map(|r| r.bars.iter().map(|b| b.date))
        .collect();
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    let mut symbols: Vec<String> = Vec::with_capacity(results.len());
    let mut aligned: HashMap<String, Vec<RawBar>> = HashMap::new();

    for result in results {
        let by_date: HashMap<NaiveDate, &RawBar> =
            result.bars.iter().map(|b| (b.date, b)).collect();

        let aligned_bars: Vec<RawBar> = dates
            .iter()
            .map(|date| {
                by_date
                    .get(date)
                    .map(|b| (*b).clone())
                    .unwrap_or_else(|| void_bar(*date))
            })
            .collect();

        if !symbols.contains(&result.symbol) {
            symbols.push(result.symbol.clone());
        }
        aligned.insert(result.symbol, aligned_bars);
    }

    AlignedBars {
        dates,
        symbols,
        bars: aligned,
    }
}

/// A bar with every field missing.
fn void_bar(date: NaiveDate) -> RawBar {
    RawBar::flat(date, f64::NAN)
}
