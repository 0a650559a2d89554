//! RawFrame: the un-normalized response of a download.
//!
//! Columns are addressed either by a single label (`"Close"`) or by a pair of
//! labels (`("Close", "SPY")` or `("SPY", "Close")`). Which level holds the
//! field and which holds the symbol is not recorded here; working that out is
//! the job of [`shape`](super::shape).

use super::align::AlignedBars;
use super::provider::{DataError, RawBar};
use crate::domain::PriceField;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;

/// Address of one raw column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKey {
    Flat(String),
    Pair(String, String),
}

impl ColumnKey {
    pub fn flat(label: impl Into<String>) -> Self {
        ColumnKey::Flat(label.into())
    }

    pub fn pair(outer: impl Into<String>, inner: impl Into<String>) -> Self {
        ColumnKey::Pair(outer.into(), inner.into())
    }

    /// Number of label levels.
    pub fn depth(&self) -> usize {
        match self {
            ColumnKey::Flat(_) => 1,
            ColumnKey::Pair(..) => 2,
        }
    }

    /// Label at `level` (0 = outer).
    pub fn level(&self, level: usize) -> Option<&str> {
        match (self, level) {
            (ColumnKey::Flat(a), 0) => Some(a),
            (ColumnKey::Pair(a, _), 0) => Some(a),
            (ColumnKey::Pair(_, b), 1) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Flat(a) => f.write_str(a),
            ColumnKey::Pair(a, b) => write!(f, "{a}/{b}"),
        }
    }
}

/// How a multi-symbol download lays out its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameLayout {
    /// One level of field labels. Only valid for a single symbol.
    Flat,
    /// `(field, symbol)` pairs, fields outermost.
    #[default]
    FieldMajor,
    /// `(symbol, field)` pairs, symbols outermost.
    SeriesMajor,
}

/// Dates × keyed columns, exactly as the source produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    dates: Vec<NaiveDate>,
    keys: Vec<ColumnKey>,
    values: Vec<Vec<f64>>,
}

impl RawFrame {
    /// Build a frame. Dates must be strictly increasing, every column as long
    /// as the date axis, keys unique and all of the same depth.
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<(ColumnKey, Vec<f64>)>,
    ) -> Result<Self, DataError> {
        if let Some(pair) = dates.windows(2).find(|p| p[1] <= p[0]) {
            return Err(DataError::InvalidFrame(format!(
                "dates not strictly increasing at {}",
                pair[1]
            )));
        }

        let mut keys = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (key, col) in columns {
            if col.len() != dates.len() {
                return Err(DataError::InvalidFrame(format!(
                    "column {key} has {} values for {} dates",
                    col.len(),
                    dates.len()
                )));
            }
            if keys.contains(&key) {
                return Err(DataError::InvalidFrame(format!("duplicate column {key}")));
            }
            if let Some(first) = keys.first() {
                if ColumnKey::depth(first) != key.depth() {
                    return Err(DataError::InvalidFrame(
                        "frame mixes flat and paired column labels".into(),
                    ));
                }
            }
            keys.push(key);
            values.push(col);
        }

        Ok(Self {
            dates,
            keys,
            values,
        })
    }

    /// Assemble aligned per-symbol bars into the given layout.
    pub fn from_aligned(aligned: &AlignedBars, layout: FrameLayout) -> Result<Self, DataError> {
        let mut columns = Vec::new();
        match layout {
            FrameLayout::Flat => {
                let [symbol] = aligned.symbols.as_slice() else {
                    return Err(DataError::InvalidFrame(format!(
                        "flat layout needs exactly one symbol, got {}",
                        aligned.symbols.len()
                    )));
                };
                for field in PriceField::ALL {
                    columns.push((
                        ColumnKey::flat(field.label()),
                        aligned.field(symbol, |b| bar_field(b, field)),
                    ));
                }
            }
            FrameLayout::FieldMajor => {
                for field in PriceField::ALL {
                    for symbol in &aligned.symbols {
                        columns.push((
                            ColumnKey::pair(field.label(), symbol.as_str()),
                            aligned.field(symbol, |b| bar_field(b, field)),
                        ));
                    }
                }
            }
            FrameLayout::SeriesMajor => {
                for symbol in &aligned.symbols {
                    for field in PriceField::ALL {
                        columns.push((
                            ColumnKey::pair(symbol.as_str(), field.label()),
                            aligned.field(symbol, |b| bar_field(b, field)),
                        ));
                    }
                }
            }
        }
        Self::new(aligned.dates.clone(), columns)
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

    pub fn keys(&self) -> &[ColumnKey] {
        &self.keys
    }

    /// Label depth of the frame; 0 when it has no columns.
    pub fn depth(&self) -> usize {
        self.keys.first().map(ColumnKey::depth).unwrap_or(0)
    }

    pub fn column(&self, key: &ColumnKey) -> Option<&[f64]> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.values[i].as_slice())
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = (&ColumnKey, &[f64])> {
        self.keys
            .iter()
            .zip(self.values.iter())
            .map(|(k, v)| (k, v.as_slice()))
    }

    /// Distinct labels found at `level`, in first-seen order.
    pub fn level_labels(&self, level: usize) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for label in self.keys.iter().filter_map(|k| k.level(level)) {
            if !out.contains(&label) {
                out.push(label);
            }
        }
        out
    }

    /// Whether every column is entirely missing.
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().flatten().all(|v| v.is_nan())
    }

    /// Union two frames' date axes, `NaN` where a side has no row.
    pub fn outer_join(&self, other: &RawFrame) -> Result<Self, DataError> {
        let dates: Vec<NaiveDate> = self
            .dates
            .iter()
            .chain(other.dates.iter())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut columns = Vec::with_capacity(self.keys.len() + other.keys.len());
        for frame in [self, other] {
            for (key, col) in frame.iter_columns() {
                let values = dates
                    .iter()
                    .map(|d| match frame.dates.binary_search(d) {
                        Ok(i) => col[i],
                        Err(_) => f64::NAN,
                    })
                    .collect();
                columns.push((key.clone(), values));
            }
        }
        Self::new(dates, columns)
    }
}

fn bar_field(bar: &RawBar, field: PriceField) -> f64 {
    match field {
        PriceField::Open => bar.open,
        PriceField::High => bar.high,
        PriceField::Low => bar.low,
        PriceField::Close => bar.close,
        PriceField::AdjustedClose => bar.adj_close,
        PriceField::Volume => bar.volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align::align_symbols;
    use crate::data::provider::{DataSource, FetchResult};
    use crate::domain::table::day;

    fn fetched(symbol: &str, closes: &[f64]) -> FetchResult {
        FetchResult {
            symbol: symbol.into(),
            bars: closes
                .iter()
                .enumerate()
                .map(|(i, c)| RawBar::flat(day(i as i64), *c))
                .collect(),
            source: DataSource::Fixture,
        }
    }

    #[test]
    fn rejects_mixed_depths() {
        let err = RawFrame::new(
            vec![day(0)],
            vec![
                (ColumnKey::flat("Close"), vec![1.0]),
                (ColumnKey::pair("Close", "SPY"), vec![1.0]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidFrame(_)));
    }

    #[test]
    fn field_major_puts_fields_outermost() {
        let aligned = align_symbols(vec![fetched("SPY", &[1.0]), fetched("GLD", &[2.0])]);
        let frame = RawFrame::from_aligned(&aligned, FrameLayout::FieldMajor).unwrap();

        assert_eq!(frame.depth(), 2);
        assert_eq!(frame.level_labels(1), vec!["SPY", "GLD"]);
        assert!(frame.level_labels(0).contains(&"Adj Close"));
        assert_eq!(
            frame.column(&ColumnKey::pair("Close", "GLD")),
            Some(&[2.0][..])
        );
    }

    #[test]
    fn series_major_puts_symbols_outermost() {
        let aligned = align_symbols(vec![fetched("SPY", &[1.0, 2.0])]);
        let frame = RawFrame::from_aligned(&aligned, FrameLayout::SeriesMajor).unwrap();
        assert_eq!(frame.level_labels(0), vec!["SPY"]);
        assert_eq!(
            frame.column(&ColumnKey::pair("SPY", "Adj Close")),
            Some(&[1.0, 2.0][..])
        );
    }

    #[test]
    fn flat_layout_needs_one_symbol() {
        let aligned = align_symbols(vec![fetched("SPY", &[1.0]), fetched("GLD", &[2.0])]);
        assert!(RawFrame::from_aligned(&aligned, FrameLayout::Flat).is_err());
    }

    #[test]
    fn outer_join_unions_dates() {
        let a = RawFrame::new(
            vec![day(0), day(2)],
            vec![(ColumnKey::pair("Close", "A"), vec![1.0, 3.0])],
        )
        .unwrap();
        let b = RawFrame::new(
            vec![day(1)],
            vec![(ColumnKey::pair("Close", "B"), vec![2.0])],
        )
        .unwrap();

        let joined = a.outer_join(&b).unwrap();
        assert_eq!(joined.len(), 3);
        let col_b = joined.column(&ColumnKey::pair("Close", "B")).unwrap();
        assert!(col_b[0].is_nan());
        assert_eq!(col_b[1], 2.0);
    }
}
