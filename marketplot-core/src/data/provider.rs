//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over per-symbol data sources (Yahoo Finance
//! today) so the acquisition layer can be exercised with mocks in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily OHLCV bar from a data provider. Missing values are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
}

impl RawBar {
    /// A bar whose fields are all the same price (tests, fixtures).
    pub fn flat(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            open: price,
            high: price,
            low: price,
            close: price,
            adj_close: price,
            volume: 0.0,
        }
    }
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no rows returned for [{}]", .symbols.join(", "))]
    EmptyResponse { symbols: Vec<String> },

    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    #[error("csv import error: {0}")]
    CsvError(String),

    #[error("snapshot error: {0}")]
    SnapshotError(String),

    #[error("no snapshot for '{tag}' in {dir}")]
    NoSnapshot { tag: String, dir: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Snapshot,
    Fixture,
}

/// The span of history a request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchWindow {
    /// Inclusive calendar range.
    Range { start: NaiveDate, end: NaiveDate },
    /// From `start` through today.
    Since { start: NaiveDate },
    /// The trailing `days` calendar days, ending today.
    Lookback { days: i64 },
}

impl FetchWindow {
    pub fn range(start: NaiveDate, end: NaiveDate) -> Self {
        FetchWindow::Range { start, end }
    }

    pub fn since(start: NaiveDate) -> Self {
        FetchWindow::Since { start }
    }

    pub fn lookback_days(days: i64) -> Self {
        FetchWindow::Lookback { days }
    }

    /// Concrete `(start, end)` as seen from `today`.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            FetchWindow::Range { start, end } => (start, end),
            FetchWindow::Since { start } => (start, today),
            FetchWindow::Lookback { days } => (today - chrono::Duration::days(days), today),
        }
    }
}

/// Trait for per-symbol data providers.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over an inclusive date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}
