//! Synthetic paths: straight-line floors and scenario projections.

use super::TransformError;
use crate::domain::SeriesTable;
use chrono::{Duration, NaiveDate};

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// `start + (end - start) * i / n` for `i` in `0..n`; never quite reaches `end`.
pub fn linear_path(n: usize, start: f64, end: f64) -> Vec<f64> {
    (0..n)
        .map(|i| start + (end - start) * (i as f64 / n as f64))
        .collect()
}

/// A scenario for one column: multipliers of the last real value, reached in
/// equal-length linear legs.
///
/// `[2.2, 1.584]` climbs to 2.2× over the first half of the horizon and
/// falls to 1.584× over the second.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPath {
    pub waypoints: Vec<f64>,
}

impl ProjectionPath {
    pub fn new(waypoints: Vec<f64>) -> Self {
        Self { waypoints }
    }

    /// Straight line to `multiplier` × the last value.
    pub fn linear(multiplier: f64) -> Self {
        Self::new(vec![multiplier])
    }

    /// `days` projected values starting from `last`.
    ///
    /// Every leg is a [`linspace`] that includes both ends, so each leg starts
    /// by repeating the previous leg's end.
    pub fn values(&self, last: f64, days: usize) -> Vec<f64> {
        let legs = self.waypoints.len();
        if legs == 0 {
            return vec![last; days];
        }

        let leg_days = (days / legs).max(1);
        let mut out = Vec::with_capacity(days);
        let mut from = last;
        for (k, m) in self.waypoints.iter().enumerate() {
            let remaining = days.saturating_sub(out.len());
            let len = if k + 1 == legs {
                remaining
            } else {
                leg_days.min(remaining)
            };
            let to = last * m;
            out.extend(linspace(from, to, len));
            from = to;
        }
        out
    }
}

/// Extend `table` day by day through `target`, following one path per column.
///
/// Every column needs a path and a non-missing last value. A table already
/// reaching `target` is returned unchanged.
pub fn extend_to(
    table: &SeriesTable,
    target: NaiveDate,
    paths: &[(&str, ProjectionPath)],
) -> Result<SeriesTable, TransformError> {
    let last_date = table.last_date().ok_or(TransformError::EmptyTable)?;
    if last_date >= target {
        return Ok(table.clone());
    }
    let days = (target - last_date).num_days() as usize;

    let mut projected: Vec<Vec<f64>> = Vec::with_capacity(table.columns().len());
    for (name, col) in table.iter_columns() {
        let path = paths
            .iter()
            .find(|(c, _)| *c == name)
            .map(|(_, p)| p)
            .ok_or_else(|| {
                TransformError::InvalidParameter(format!("no projection path for '{name}'"))
            })?;
        let last = col.last().copied().unwrap_or(f64::NAN);
        if last.is_nan() {
            return Err(TransformError::InvalidBase {
                column: name.to_string(),
                value: last,
            });
        }
        projected.push(path.values(last, days));
    }

    let dates: Vec<NaiveDate> = (1..=days as i64)
        .map(|d| last_date + Duration::days(d))
        .collect();
    let rows: Vec<Vec<f64>> = (0..days)
        .map(|i| projected.iter().map(|col| col[i]).collect())
        .collect();

    Ok(table.clone().append_rows(dates, rows)?)
}
