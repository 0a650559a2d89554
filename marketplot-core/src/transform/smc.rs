//! Fair value gaps and order blocks on daily candles.
//!
//! Bullish fair value gap at `i` (for `1 <= i < n-1`):
//!   low[i+1] > high[i-1] and close[i] > open[i]; zone = [high[i-1], low[i+1]]
//!
//! Order block at `i` (for `1 <= i < n-2`):
//!   close[i] < open[i], close[i+1] > open[i+1], close[i+2] > open[i+1];
//!   zone = [low[i], high[i]]
//!
//! Comparisons with a missing price are false, so gaps never produce zones.

use crate::domain::Ohlc;
use chrono::NaiveDate;

/// A price band anchored at one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub index: usize,
    pub date: NaiveDate,
    pub bottom: f64,
    pub top: f64,
}

pub fn fair_value_gaps(c: &Ohlc) -> Vec<Zone> {
    let n = c.len();
    if n < 3 {
        return Vec::new();
    }
    (1..n - 1)
        .filter(|&i| c.low[i + 1] > c.high[i - 1] && c.close[i] > c.open[i])
        .map(|i| Zone {
            index: i,
            date: c.dates[i],
            bottom: c.high[i - 1],
            top: c.low[i + 1],
        })
        .collect()
}

pub fn order_blocks(c: &Ohlc) -> Vec<Zone> {
    let n = c.len();
    if n < 4 {
        return Vec::new();
    }
    (1..n - 2)
        .filter(|&i| {
            c.close[i] < c.open[i]
                && c.close[i + 1] > c.open[i + 1]
                && c.close[i + 2] > c.open[i + 1]
        })
        .map(|i| Zone {
            index: i,
            date: c.dates[i],
            bottom: c.low[i],
            top: c.high[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::day;

    /// Candles from (open, high, low, close) tuples.
    fn candles(rows: &[(f64, f64, f64, f64)]) -> Ohlc {
        Ohlc::new(
            (0..rows.len() as i64).map(day).collect(),
            rows.iter().map(|r| r.0).collect(),
            rows.iter().map(|r| r.1).collect(),
            rows.iter().map(|r| r.2).collect(),
            rows.iter().map(|r| r.3).collect(),
        )
        .unwrap()
    }

    #[test]
    fn detects_bullish_gap() {
        let c = candles(&[
            (10.0, 11.0, 9.0, 10.5),
            (10.5, 14.0, 10.4, 13.8), // impulse candle
            (13.8, 15.0, 12.0, 14.5), // low above the first high
        ]);
        assert_eq!(
            fair_value_gaps(&c),
            vec![Zone {
                index: 1,
                date: day(1),
                bottom: 11.0,
                top: 12.0
            }]
        );
    }

    #[test]
    fn bearish_impulse_is_not_a_gap() {
        let c = candles(&[
            (10.0, 11.0, 9.0, 10.5),
            (13.8, 14.0, 10.4, 10.6),
            (13.8, 15.0, 12.0, 14.5),
        ]);
        assert!(fair_value_gaps(&c).is_empty());
    }

    #[test]
    fn detects_order_block_before_reversal() {
        let c = candles(&[
            (10.0, 10.5, 9.5, 10.0),
            (10.0, 10.2, 8.8, 9.0),  // down candle
            (9.0, 10.0, 8.9, 9.8),   // up candle
            (9.8, 11.0, 9.7, 10.9),  // closes above the prior open
            (10.9, 11.0, 10.0, 10.2),
        ]);
        let obs = order_blocks(&c);
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].index, 1);
        assert_eq!((obs[0].bottom, obs[0].top), (8.8, 10.2));
    }

    #[test]
    fn short_inputs_yield_nothing() {
        let c = candles(&[(1.0, 2.0, 0.5, 1.5), (1.5, 2.5, 1.0, 2.0)]);
        assert!(fair_value_gaps(&c).is_empty());
        assert!(order_blocks(&c).is_empty());
    }
}
