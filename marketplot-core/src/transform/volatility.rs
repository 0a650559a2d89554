//! Rolling volatility of daily returns.
//!
//! vol[t] = stddev(pct_change[t-w+1..=t]) * sqrt(252) * 100
//!
//! Sample stddev (divide by N-1). Prices are forward-filled before returns
//! are taken, so a closed session counts as a 0% return and keeps the window
//! going. Only leading gaps stay missing; with no leading gap the first
//! defined value is at index `w` (the first return is always missing).

use super::TransformError;
use crate::domain::SeriesTable;

pub const TRADING_DAYS: f64 = 252.0;

/// `x[t] / x[t-1] - 1`; the first element is `NaN`.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i] / values[i - 1] - 1.0;
    }
    out
}

/// Sample standard deviation over a trailing window of `window` values.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window < 2 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (window - 1) as f64;
        result[i] = variance.sqrt();
    }
    result
}

/// Annualized rolling volatility in percent, for every column of `table`.
///
/// Each column is forward-filled first, so one missing close in a column does
/// not blank the windows that span it.
pub fn rolling_volatility(
    table: &SeriesTable,
    window: usize,
) -> Result<SeriesTable, TransformError> {
    if window < 2 {
        return Err(TransformError::InvalidParameter(format!(
            "volatility window must be >= 2, got {window}"
        )));
    }
    let scale = TRADING_DAYS.sqrt() * 100.0;
    Ok(table.forward_fill().map_columns(|col| {
        rolling_std(&pct_change(col), window)
            .into_iter()
            .map(|s| s * scale)
            .collect()
    }))
}
