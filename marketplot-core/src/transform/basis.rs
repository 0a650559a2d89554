//! Annualized futures basis.
//!
//! basis = ((futures / spot) - 1) * (365 / days_to_expiry) * 100
//!
//! `days_to_expiry` is calendar days from the row's date to expiry; zero (the
//! expiry day itself) counts as one day.

use super::TransformError;
use crate::domain::SeriesTable;
use chrono::NaiveDate;

/// Calendar days from `date` to `expiry`, with 0 replaced by 1.
pub fn days_to_expiry(date: NaiveDate, expiry: NaiveDate) -> i64 {
    match (expiry - date).num_days() {
        0 => 1,
        d => d,
    }
}

/// Annualized basis of `futures` over `spot` for each row, in percent.
pub fn annualized_basis(
    table: &SeriesTable,
    futures: &str,
    spot: &str,
    expiry: NaiveDate,
) -> Result<Vec<f64>, TransformError> {
    let fut = table.require(futures)?;
    let spt = table.require(spot)?;
    Ok(table
        .dates()
        .iter()
        .zip(fut.iter().zip(spt))
        .map(|(date, (f, s))| {
            let days = days_to_expiry(*date, expiry) as f64;
            (f / s - 1.0) * (365.0 / days) * 100.0
        })
        .collect())
}
