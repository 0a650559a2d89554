//! CSV import of yfinance-style exports.
//!
//! Three header variants are accepted:
//!
//! ```text
//! Date,Open,High,Low,Close,Adj Close,Volume        one header row (flat)
//!
//! Price,Close,Close,Open,...                      two header rows (paired),
//! Ticker,SPY,GLD,SPY,...                          optionally followed by a
//! Date,,,,...                                     "Date" marker row
//! ```
//!
//! The first column is always the date; anything after the first ten
//! characters (a time or zone suffix) is ignored. Empty cells are missing.

use super::acquire::{FrameRequest, FrameSource};
use super::frame::{ColumnKey, RawFrame};
use super::provider::DataError;
use super::snapshot::file_stem;
use chrono::NaiveDate;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse a yfinance-style CSV into a raw frame.
pub fn parse_csv<R: Read>(reader: R) -> Result<RawFrame, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut headers: Vec<Vec<String>> = Vec::new();
    let mut dates = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| DataError::CsvError(format!("line {}: {e}", line + 1)))?;
        let first = record.get(0).unwrap_or("");

        match parse_date(first) {
            Some(date) => {
                let values = record
                    .iter()
                    .skip(1)
                    .map(parse_cell)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|cell| {
                        DataError::CsvError(format!("line {}: bad number '{cell}'", line + 1))
                    })?;
                dates.push(date);
                rows.push(values);
            }
            None if dates.is_empty() => {
                // "Date,,,," marker between the label rows and the data.
                let marker = first == "Date" && record.iter().skip(1).all(str::is_empty);
                if !marker {
                    headers.push(record.iter().skip(1).map(str::to_string).collect());
                }
            }
            None => {
                return Err(DataError::CsvError(format!(
                    "line {}: expected a date, found '{first}'",
                    line + 1
                )))
            }
        }
    }

    let keys: Vec<ColumnKey> = match headers.as_slice() {
        [labels] => labels.iter().map(|l| ColumnKey::flat(l.as_str())).collect(),
        [outer, inner] if outer.len() == inner.len() => outer
            .iter()
            .zip(inner)
            .map(|(a, b)| ColumnKey::pair(a.as_str(), b.as_str()))
            .collect(),
        _ => {
            return Err(DataError::CsvError(format!(
                "expected one or two header rows, found {}",
                headers.len()
            )))
        }
    };

    let mut columns: Vec<(ColumnKey, Vec<f64>)> =
        keys.into_iter().map(|k| (k, Vec::with_capacity(rows.len()))).collect();
    for (row, date) in rows.iter().zip(&dates) {
        if row.len() > columns.len() {
            return Err(DataError::CsvError(format!(
                "row {date} has {} values for {} columns",
                row.len(),
                columns.len()
            )));
        }
        for (j, (_, col)) in columns.iter_mut().enumerate() {
            col.push(row.get(j).copied().unwrap_or(f64::NAN));
        }
    }

    RawFrame::new(dates, columns)
}

/// Parse a CSV file.
pub fn read_csv(path: &Path) -> Result<RawFrame, DataError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::CsvError(format!("{}: {e}", path.display())))?;
    let frame = parse_csv(file)?;
    debug!(path = %path.display(), rows = frame.len(), "read csv");
    Ok(frame)
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let head = cell.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn parse_cell(cell: &str) -> Result<f64, String> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|_| cell.to_string())
}

/// A [`FrameSource`] reading `{dir}/{tag}.csv`.
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", file_stem(tag)))
    }
}

impl FrameSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn download(&self, request: &FrameRequest) -> Result<RawFrame, DataError> {
        read_csv(&self.path_for(&request.tag))
    }
}
