//! SeriesTable: dates × named series of `f64` values.
//!
//! The table is column-major: one `Vec<f64>` per series, all the same length as
//! the date axis. Missing observations are `NaN`; nothing in this module fills
//! them implicitly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("dates must be strictly increasing ({prev} is followed by {next})")]
    UnorderedDates { prev: NaiveDate, next: NaiveDate },

    #[error("column '{column}' has {actual} values for {expected} dates")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("missing series '{0}'")]
    MissingSeries(String),
}

/// Which rows `drop_missing` removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRule {
    /// Drop a row if any column is missing.
    Any,
    /// Drop a row only when every column is missing.
    All,
}

/// A gap-tolerant table of daily series keyed by calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl SeriesTable {
    /// Build a table, validating the date order and column lengths.
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, TableError> {
        check_dates(&dates)?;

        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, col) in columns {
            if col.len() != dates.len() {
                return Err(TableError::LengthMismatch {
                    column: name,
                    expected: dates.len(),
                    actual: col.len(),
                });
            }
            if names.contains(&name) {
                return Err(TableError::DuplicateColumn(name));
            }
            names.push(name);
            values.push(col);
        }

        Ok(Self {
            dates,
            columns: names,
            values,
        })
    }

    /// A table with the given columns and no rows.
    pub fn empty<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            dates: Vec::new(),
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            values: vec![Vec::new(); columns.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_slice())
    }

    /// Like [`column`](Self::column) but a missing series is an error.
    pub fn require(&self, name: &str) -> Result<&[f64], TableError> {
        self.column(name)
            .ok_or_else(|| TableError::MissingSeries(name.to_string()))
    }

    /// Values of every column at row `i`, in column order.
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.values.iter().map(|col| col[i]).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Last value of a column, which may be `NaN`.
    pub fn last_value(&self, name: &str) -> Option<f64> {
        self.column(name).and_then(|c| c.last().copied())
    }

    /// Iterate `(name, values)` pairs in column order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .zip(self.values.iter())
            .map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// `(date, value)` pairs for one column, `NaN` included.
    pub fn points(&self, name: &str) -> Result<Vec<(NaiveDate, f64)>, TableError> {
        let col = self.require(name)?;
        Ok(self.dates.iter().copied().zip(col.iter().copied()).collect())
    }

    /// Value on `date`, or on the closest earlier date that has a value.
    pub fn value_at_or_before(&self, name: &str, date: NaiveDate) -> Option<f64> {
        let col = self.column(name)?;
        let end = self.dates.partition_point(|d| *d <= date);
        col[..end].iter().rev().copied().find(|v| !v.is_nan())
    }

    /// Value on exactly `date`.
    pub fn value_on(&self, name: &str, date: NaiveDate) -> Option<f64> {
        let col = self.column(name)?;
        let idx = self.dates.binary_search(&date).ok()?;
        Some(col[idx])
    }

    /// Keep only the named columns, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, TableError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            columns.push((name.to_string(), self.require(name)?.to_vec()));
        }
        Self::new(self.dates.clone(), columns)
    }

    /// Add a column, or replace an existing one with the same name.
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Result<Self, TableError> {
        if values.len() != self.dates.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter().position(|c| c == name) {
            Some(i) => self.values[i] = values,
            None => {
                self.columns.push(name.to_string());
                self.values.push(values);
            }
        }
        Ok(self)
    }

    /// Rename a column in place.
    pub fn rename(mut self, from: &str, to: &str) -> Result<Self, TableError> {
        if from != to && self.has_column(to) {
            return Err(TableError::DuplicateColumn(to.to_string()));
        }
        let i = self
            .columns
            .iter()
            .position(|c| c == from)
            .ok_or_else(|| TableError::MissingSeries(from.to_string()))?;
        self.columns[i] = to.to_string();
        Ok(self)
    }

    /// Apply `f` to every value of every column.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            dates: self.dates.clone(),
            columns: self.columns.clone(),
            values: self
                .values
                .iter()
                .map(|col| col.iter().map(|v| f(*v)).collect())
                .collect(),
        }
    }

    /// Apply `f` to each column as a whole (rolling windows, shifts, ...).
    pub fn map_columns(&self, f: impl Fn(&[f64]) -> Vec<f64>) -> Self {
        Self {
            dates: self.dates.clone(),
            columns: self.columns.clone(),
            values: self.values.iter().map(|col| f(col.as_slice())).collect(),
        }
    }

    /// Keep the rows whose index satisfies `keep`.
    fn filter_rows(&self, keep: impl Fn(usize) -> bool) -> Self {
        let idx: Vec<usize> = (0..self.len()).filter(|i| keep(*i)).collect();
        Self {
            dates: idx.iter().map(|&i| self.dates[i]).collect(),
            columns: self.columns.clone(),
            values: self
                .values
                .iter()
                .map(|col| idx.iter().map(|&i| col[i]).collect())
                .collect(),
        }
    }

    /// Drop rows with missing values according to `rule`.
    pub fn drop_missing(&self, rule: DropRule) -> Self {
        self.filter_rows(|i| {
            let mut cells = self.values.iter().map(|col| col[i].is_nan());
            match rule {
                DropRule::Any => !cells.any(|missing| missing),
                DropRule::All => !cells.all(|missing| missing) || self.values.is_empty(),
            }
        })
    }

    /// Drop rows where any of the named columns is missing.
    pub fn drop_missing_in<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, TableError> {
        let cols: Vec<&[f64]> = names
            .iter()
            .map(|n| self.require(n.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(self.filter_rows(|i| cols.iter().all(|c| !c[i].is_nan())))
    }

    /// Carry the last observed value forward over gaps. Leading gaps stay `NaN`.
    pub fn forward_fill(&self) -> Self {
        self.map_columns(|col| {
            let mut last = f64::NAN;
            col.iter()
                .map(|v| {
                    if !v.is_nan() {
                        last = *v;
                    }
                    last
                })
                .collect()
        })
    }

    /// Rows dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        self.filter_rows(|i| self.dates[i] >= start)
    }

    /// Rows dated on or before `end`.
    pub fn until(&self, end: NaiveDate) -> Self {
        self.filter_rows(|i| self.dates[i] <= end)
    }

    /// Rows after the first `n`.
    pub fn skip_rows(&self, n: usize) -> Self {
        self.filter_rows(|i| i >= n)
    }

    /// Union the date axes of two tables; cells absent on either side become `NaN`.
    ///
    /// Column names must not collide.
    pub fn outer_join(&self, other: &SeriesTable) -> Result<Self, TableError> {
        if let Some(dup) = other.columns.iter().find(|c| self.has_column(c)) {
            return Err(TableError::DuplicateColumn(dup.clone()));
        }

        let dates: Vec<NaiveDate> = self
            .dates
            .iter()
            .chain(other.dates.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns = Vec::with_capacity(self.columns.len() + other.columns.len());
        for table in [self, other] {
            for (name, col) in table.iter_columns() {
                columns.push((name.to_string(), reindex(&table.dates, col, &dates)));
            }
        }
        Self::new(dates, columns)
    }

    /// Append rows dated after the last row. Columns must match.
    pub fn append_rows(
        mut self,
        dates: Vec<NaiveDate>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        let mut all = self.dates.clone();
        all.extend(dates.iter().copied());
        check_dates(&all)?;
        for (date, row) in dates.into_iter().zip(rows) {
            if row.len() != self.columns.len() {
                return Err(TableError::LengthMismatch {
                    column: format!("row {date}"),
                    expected: self.columns.len(),
                    actual: row.len(),
                });
            }
            self.dates.push(date);
            for (col, v) in self.values.iter_mut().zip(row) {
                col.push(v);
            }
        }
        Ok(self)
    }
}

/// Map `values` (aligned to `from`) onto the `to` axis, `NaN` where absent.
fn reindex(from: &[NaiveDate], values: &[f64], to: &[NaiveDate]) -> Vec<f64> {
    to.iter()
        .map(|d| match from.binary_search(d) {
            Ok(i) => values[i],
            Err(_) => f64::NAN,
        })
        .collect()
}

fn check_dates(dates: &[NaiveDate]) -> Result<(), TableError> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(TableError::UnorderedDates {
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cols: &[(&str, &[f64])]) -> SeriesTable {
        let n = cols.first().map(|c| c.1.len()).unwrap_or(0);
        SeriesTable::new(
            (0..n as i64).map(day).collect(),
            cols.iter()
                .map(|(name, v)| (name.to_string(), v.to_vec()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_unordered_dates() {
        let err = SeriesTable::new(vec![day(1), day(0)], vec![]).unwrap_err();
        assert!(matches!(err, TableError::UnorderedDates { .. }));

        let err = SeriesTable::new(vec![day(0), day(0)], vec![]).unwrap_err();
        assert!(matches!(err, TableError::UnorderedDates { .. }));
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = SeriesTable::new(vec![day(0), day(1)], vec![("A".into(), vec![1.0])])
            .unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                column: "A".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn forward_fill_keeps_leading_gap() {
        let t = table(&[("A", &[f64::NAN, 1.0, f64::NAN, f64::NAN, 4.0])]);
        let filled = t.forward_fill();
        let a = filled.column("A").unwrap();
        assert!(a[0].is_nan());
        assert_eq!(&a[1..], &[1.0, 1.0, 1.0, 4.0]);
    }

    #[test]
    fn drop_missing_any_vs_all() {
        let t = table(&[
            ("A", &[1.0, f64::NAN, f64::NAN, 4.0]),
            ("B", &[1.0, 2.0, f64::NAN, 4.0]),
        ]);
        assert_eq!(t.drop_missing(DropRule::Any).len(), 2);
        assert_eq!(t.drop_missing(DropRule::All).len(), 3);
    }

    #[test]
    fn outer_join_unions_dates() {
        let a = SeriesTable::new(vec![day(0), day(2)], vec![("A".into(), vec![1.0, 3.0])])
            .unwrap();
        let b = SeriesTable::new(vec![day(1), day(2)], vec![("B".into(), vec![20.0, 30.0])])
            .unwrap();

        let joined = a.outer_join(&b).unwrap();
        assert_eq!(joined.dates(), &[day(0), day(1), day(2)]);
        let col_a = joined.column("A").unwrap();
        assert!(col_a[1].is_nan());
        let col_b = joined.column("B").unwrap();
        assert!(col_b[0].is_nan());
        assert_eq!(col_b[2], 30.0);
    }

    #[test]
    fn outer_join_rejects_name_collision() {
        let a = table(&[("A", &[1.0])]);
        assert_eq!(
            a.outer_join(&a).unwrap_err(),
            TableError::DuplicateColumn("A".into())
        );
    }

    #[test]
    fn value_at_or_before_skips_gaps() {
        let t = table(&[("A", &[5.0, 6.0, f64::NAN, f64::NAN])]);
        assert_eq!(t.value_at_or_before("A", day(3)), Some(6.0));
        assert_eq!(t.value_at_or_before("A", day(0)), Some(5.0));
        assert_eq!(t.value_at_or_before("A", day(-1)), None);
    }

    #[test]
    fn select_preserves_request_order() {
        let t = table(&[("A", &[1.0]), ("B", &[2.0])]);
        let s = t.select(&["B", "A"]).unwrap();
        assert_eq!(s.columns(), &["B".to_string(), "A".to_string()]);
        assert_eq!(
            t.select(&["C"]).unwrap_err(),
            TableError::MissingSeries("C".into())
        );
    }

    #[test]
    fn append_rows_must_extend_the_axis() {
        let t = table(&[("A", &[1.0, 2.0])]);
        let extended = t
            .clone()
            .append_rows(vec![day(2)], vec![vec![3.0]])
            .unwrap();
        assert_eq!(extended.column("A").unwrap(), &[1.0, 2.0, 3.0]);

        assert!(t.append_rows(vec![day(1)], vec![vec![9.0]]).is_err());
    }
}
