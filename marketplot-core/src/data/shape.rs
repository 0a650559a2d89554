//! Shape normalization: collapse a raw frame to one price field per symbol.
//!
//! Downloads come back in one of several layouts. A single symbol may arrive as
//! a flat table of field columns; several symbols arrive as a two-level table
//! with either the fields or the symbols as the outer level. [`resolve`] decides
//! the layout once, and [`normalize`] uses that decision to produce a
//! [`SeriesTable`] whose columns are exactly the requested symbols.
//!
//! An unrecognized layout is a soft failure: the frame is handed back
//! untouched together with a reason, and a warning is logged.

use super::frame::{ColumnKey, RawFrame};
use super::provider::DataError;
use crate::domain::{Ohlc, PriceField, SeriesTable};
use std::fmt;
use tracing::{debug, warn};

/// The layouts normalization understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// One level, a single column holding the chosen field.
    FlatSingleField,
    /// One level, several field columns.
    FlatMultiField,
    /// Two levels, `(field, symbol)`.
    FieldMajor,
    /// Two levels, `(symbol, field)`.
    SeriesMajor,
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResponseShape::FlatSingleField => "flat (single field)",
            ResponseShape::FlatMultiField => "flat (multiple fields)",
            ResponseShape::FieldMajor => "two-level, field-major",
            ResponseShape::SeriesMajor => "two-level, series-major",
        };
        f.write_str(name)
    }
}

/// Which price field to pull out of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPreference {
    /// Adjusted close, falling back to close.
    #[default]
    PreferAdjusted,
    /// Exactly this field, no fallback.
    Exact(PriceField),
}

impl FieldPreference {
    /// Fields to try, in order.
    pub fn candidates(self) -> Vec<PriceField> {
        match self {
            FieldPreference::PreferAdjusted => vec![PriceField::AdjustedClose, PriceField::Close],
            FieldPreference::Exact(field) => vec![field],
        }
    }
}

/// The outcome of [`resolve`]: the frame's layout and the field to select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub shape: ResponseShape,
    pub field: PriceField,
    /// The label as spelled in the frame ("Adj Close" or "Adjusted Close").
    pub label: String,
}

/// Result of [`normalize`].
#[derive(Debug, Clone)]
pub enum Normalized {
    Resolved {
        table: SeriesTable,
        resolution: Resolution,
    },
    Unrecognized {
        frame: RawFrame,
        reason: String,
    },
}

impl Normalized {
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Normalized::Resolved { resolution, .. } => Some(resolution),
            Normalized::Unrecognized { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Normalized::Resolved { .. })
    }

    /// The normalized table, or the raw frame's columns under flattened
    /// `"outer/inner"` labels when the layout was not recognized.
    pub fn into_best_effort(self) -> Result<SeriesTable, DataError> {
        match self {
            Normalized::Resolved { table, .. } => Ok(table),
            Normalized::Unrecognized { frame, .. } => {
                let columns = frame
                    .iter_columns()
                    .map(|(key, col)| (key.to_string(), col.to_vec()))
                    .collect();
                SeriesTable::new(frame.dates().to_vec(), columns)
                    .map_err(|e| DataError::InvalidFrame(e.to_string()))
            }
        }
    }
}

/// Decide the layout of `frame` and which field to take from it.
///
/// For each candidate field in preference order: a two-level frame is
/// searched at level 0 (field-major) and then level 1 (series-major); a flat
/// frame is searched among its labels. The first hit wins.
pub fn resolve(frame: &RawFrame, preference: FieldPreference) -> Option<Resolution> {
    for field in preference.candidates() {
        match frame.depth() {
            2 => {
                for (level, shape) in [(0, ResponseShape::FieldMajor), (1, ResponseShape::SeriesMajor)]
                {
                    if let Some(label) = find_label(frame, level, field) {
                        return Some(Resolution { shape, field, label });
                    }
                }
            }
            1 => {
                if let Some(label) = find_label(frame, 0, field) {
                    let shape = if frame.keys().len() == 1 {
                        ResponseShape::FlatSingleField
                    } else {
                        ResponseShape::FlatMultiField
                    };
                    return Some(Resolution { shape, field, label });
                }
            }
            _ => {}
        }
    }
    None
}

fn find_label(frame: &RawFrame, level: usize, field: PriceField) -> Option<String> {
    frame
        .level_labels(level)
        .into_iter()
        .find(|l| field.matches(l))
        .map(str::to_string)
}

/// Key of `symbol`'s column under a resolution, if the frame has one.
fn column_key(resolution: &Resolution, symbol: &str) -> ColumnKey {
    match resolution.shape {
        ResponseShape::FlatSingleField | ResponseShape::FlatMultiField => {
            ColumnKey::flat(resolution.label.as_str())
        }
        ResponseShape::FieldMajor => ColumnKey::pair(resolution.label.as_str(), symbol),
        ResponseShape::SeriesMajor => ColumnKey::pair(symbol, resolution.label.as_str()),
    }
}

/// Normalize `frame` into one column per requested symbol.
///
/// An empty frame is a hard failure. An unrecognized layout is returned as
/// [`Normalized::Unrecognized`]. A requested symbol absent from a two-level
/// frame becomes an all-`NaN` column.
pub fn normalize<S: AsRef<str>>(
    frame: RawFrame,
    requested: &[S],
    preference: FieldPreference,
) -> Result<Normalized, DataError> {
    if frame.is_empty() {
        return Err(DataError::EmptyResponse {
            symbols: requested.iter().map(|s| s.as_ref().to_string()).collect(),
        });
    }

    let Some(resolution) = resolve(&frame, preference) else {
        let wanted: Vec<String> = preference
            .candidates()
            .iter()
            .map(|f| f.label().to_string())
            .collect();
        let reason = format!("no column labelled {}", wanted.join(" or "));
        warn!(%reason, columns = frame.keys().len(), "unrecognized response shape, using raw frame");
        return Ok(Normalized::Unrecognized { frame, reason });
    };

    let flat = matches!(
        resolution.shape,
        ResponseShape::FlatSingleField | ResponseShape::FlatMultiField
    );
    if flat && requested.len() != 1 {
        let reason = format!(
            "flat response cannot be attributed to {} requested symbols",
            requested.len()
        );
        warn!(%reason, "unrecognized response shape, using raw frame");
        return Ok(Normalized::Unrecognized { frame, reason });
    }

    let mut columns = Vec::with_capacity(requested.len());
    for symbol in requested {
        let symbol = symbol.as_ref();
        let values = match frame.column(&column_key(&resolution, symbol)) {
            Some(col) => col.to_vec(),
            None => {
                warn!(symbol, field = %resolution.field, "requested symbol missing from response");
                vec![f64::NAN; frame.len()]
            }
        };
        columns.push((symbol.to_string(), values));
    }

    let table = SeriesTable::new(frame.dates().to_vec(), columns)
        .map_err(|e| DataError::InvalidFrame(e.to_string()))?;
    debug!(shape = %resolution.shape, field = %resolution.field, rows = table.len(), "normalized response");

    Ok(Normalized::Resolved { table, resolution })
}

/// Pull one symbol's open/high/low/close out of a frame of any known layout.
pub fn extract_ohlc(frame: &RawFrame, symbol: &str) -> Result<Ohlc, DataError> {
    if frame.is_empty() {
        return Err(DataError::EmptyResponse {
            symbols: vec![symbol.to_string()],
        });
    }

    let take = |field: PriceField| -> Result<Vec<f64>, DataError> {
        let resolution = resolve(frame, FieldPreference::Exact(field)).ok_or_else(|| {
            DataError::InvalidFrame(format!("no {field} column for {symbol}"))
        })?;
        frame
            .column(&column_key(&resolution, symbol))
            .map(<[f64]>::to_vec)
            .ok_or_else(|| DataError::InvalidFrame(format!("no {field} column for {symbol}")))
    };

    Ohlc::new(
        frame.dates().to_vec(),
        take(PriceField::Open)?,
        take(PriceField::High)?,
        take(PriceField::Low)?,
        take(PriceField::Close)?,
    )
    .map_err(|e| DataError::InvalidFrame(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::day;

    fn frame(columns: Vec<(ColumnKey, Vec<f64>)>) -> RawFrame {
        let n = columns.first().map(|c| c.1.len()).unwrap_or(0);
        RawFrame::new((0..n as i64).map(day).collect(), columns).unwrap()
    }

    #[test]
    fn adjusted_close_wins_over_close() {
        let f = frame(vec![
            (ColumnKey::pair("Adjusted Close", "TICK"), vec![1.0, 2.0]),
            (ColumnKey::pair("Close", "TICK"), vec![9.0, 9.0]),
        ]);
        let out = normalize(f, &["TICK"], FieldPreference::PreferAdjusted).unwrap();
        let res = out.resolution().unwrap().clone();
        assert_eq!(res.field, PriceField::AdjustedClose);
        assert_eq!(res.shape, ResponseShape::FieldMajor);
        let table = out.into_best_effort().unwrap();
        assert_eq!(table.column("TICK").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn falls_back_to_close() {
        let f = frame(vec![
            (ColumnKey::pair("SPY", "Open"), vec![1.0]),
            (ColumnKey::pair("SPY", "Close"), vec![3.0]),
        ]);
        let out = normalize(f, &["SPY"], FieldPreference::PreferAdjusted).unwrap();
        assert_eq!(out.resolution().unwrap().shape, ResponseShape::SeriesMajor);
        assert_eq!(out.resolution().unwrap().field, PriceField::Close);
        assert_eq!(out.into_best_effort().unwrap().column("SPY").unwrap(), &[3.0]);
    }

    #[test]
    fn unrecognized_keeps_raw_columns() {
        let f = frame(vec![(ColumnKey::pair("Open", "SPY"), vec![1.0])]);
        let out = normalize(f, &["SPY"], FieldPreference::PreferAdjusted).unwrap();
        assert!(!out.is_resolved());
        let table = out.into_best_effort().unwrap();
        assert_eq!(table.columns(), &["Open/SPY".to_string()]);
    }

    #[test]
    fn empty_frame_is_a_hard_failure() {
        let f = RawFrame::new(vec![], vec![(ColumnKey::flat("Close"), vec![])]).unwrap();
        let err = normalize(f, &["SPY"], FieldPreference::PreferAdjusted).unwrap_err();
        assert!(matches!(err, DataError::EmptyResponse { symbols } if symbols == vec!["SPY"]));
    }

    #[test]
    fn missing_symbol_becomes_nan_column() {
        let f = frame(vec![(ColumnKey::pair("Close", "SPY"), vec![1.0])]);
        let table = normalize(f, &["SPY", "QQQ"], FieldPreference::PreferAdjusted)
            .unwrap()
            .into_best_effort()
            .unwrap();
        assert_eq!(table.columns().len(), 2);
        assert!(table.column("QQQ").unwrap()[0].is_nan());
    }

    #[test]
    fn flat_frame_with_two_symbols_is_unrecognized() {
        let f = frame(vec![(ColumnKey::flat("Close"), vec![1.0])]);
        let out = normalize(f, &["A", "B"], FieldPreference::PreferAdjusted).unwrap();
        assert!(!out.is_resolved());
    }

    #[test]
    fn exact_preference_does_not_fall_back() {
        let f = frame(vec![(ColumnKey::flat("Close"), vec![1.0])]);
        assert!(resolve(&f, FieldPreference::Exact(PriceField::Volume)).is_none());
        let res = resolve(&f, FieldPreference::Exact(PriceField::Close)).unwrap();
        assert_eq!(res.shape, ResponseShape::FlatSingleField);
    }

    #[test]
    fn extracts_ohlc_from_series_major() {
        let f = frame(vec![
            (ColumnKey::pair("BTC-USD", "Open"), vec![1.0]),
            (ColumnKey::pair("BTC-USD", "High"), vec![2.0]),
            (ColumnKey::pair("BTC-USD", "Low"), vec![0.5]),
            (ColumnKey::pair("BTC-USD", "Close"), vec![1.5]),
        ]);
        let ohlc = extract_ohlc(&f, "BTC-USD").unwrap();
        assert_eq!(ohlc.high, vec![2.0]);
        assert_eq!(ohlc.close, vec![1.5]);
        assert!(extract_ohlc(&f, "ETH-USD").is_err());
    }
}
