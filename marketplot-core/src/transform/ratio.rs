//! Ratios and cross-column averages.

use super::TransformError;
use crate::domain::SeriesTable;

pub const SATS_PER_BTC: f64 = 100_000_000.0;

/// `numerator / denominator`, element-wise.
pub fn ratio(
    table: &SeriesTable,
    numerator: &str,
    denominator: &str,
) -> Result<Vec<f64>, TransformError> {
    let a = table.require(numerator)?;
    let b = table.require(denominator)?;
    Ok(a.iter().zip(b).map(|(x, y)| x / y).collect())
}

/// Mean across `columns` for each row, skipping missing cells.
///
/// A row where every named column is missing is `NaN`.
pub fn row_mean<S: AsRef<str>>(
    table: &SeriesTable,
    columns: &[S],
) -> Result<Vec<f64>, TransformError> {
    if columns.is_empty() {
        return Err(TransformError::InvalidParameter(
            "row mean over no columns".into(),
        ));
    }
    let cols: Vec<&[f64]> = columns
        .iter()
        .map(|c| table.require(c.as_ref()))
        .collect::<Result<_, _>>()?;

    Ok((0..table.len())
        .map(|i| {
            let (sum, n) = cols
                .iter()
                .map(|c| c[i])
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if n == 0 {
                f64::NAN
            } else {
                sum / n as f64
            }
        })
        .collect())
}

/// `(a + b) / 2`; missing if either side is.
pub fn pair_mean(table: &SeriesTable, a: &str, b: &str) -> Result<Vec<f64>, TransformError> {
    let x = table.require(a)?;
    let y = table.require(b)?;
    Ok(x.iter().zip(y).map(|(p, q)| (p + q) / 2.0).collect())
}

/// Price in satoshis of something costing `usd` when one bitcoin costs `btc_usd`.
pub fn to_sats(usd: f64, btc_usd: f64) -> f64 {
    usd / btc_usd * SATS_PER_BTC
}
