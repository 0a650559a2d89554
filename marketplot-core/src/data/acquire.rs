//! Data acquisition: turn a named request into a raw frame, then a table.
//!
//! [`FrameSource`] is the seam between chart sets and wherever the numbers come
//! from: a live provider, a CSV export, or a recorded snapshot.

use super::align::align_symbols;
use super::frame::{FrameLayout, RawFrame};
use super::provider::{DataError, DataProvider, FetchWindow};
use super::shape::{normalize, FieldPreference};
use super::snapshot::SnapshotStore;
use crate::domain::SeriesTable;
use chrono::NaiveDate;
use tracing::{info, warn};

/// One download: a stable tag, the symbols and the window.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRequest {
    /// Stable name of the request within its chart set; used as a file stem.
    pub tag: String,
    pub symbols: Vec<String>,
    pub window: FetchWindow,
    pub layout: FrameLayout,
}

impl FrameRequest {
    pub fn new<S: AsRef<str>>(tag: impl Into<String>, symbols: &[S], window: FetchWindow) -> Self {
        Self {
            tag: tag.into(),
            symbols: symbols.iter().map(|s| s.as_ref().to_string()).collect(),
            window,
            layout: FrameLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: FrameLayout) -> Self {
        self.layout = layout;
        self
    }

    /// The single-symbol request `acquire_each` issues for `symbol`.
    fn for_symbol(&self, symbol: &str) -> Self {
        Self {
            tag: format!("{}-{symbol}", self.tag),
            symbols: vec![symbol.to_string()],
            window: self.window,
            layout: FrameLayout::Flat,
        }
    }
}

/// Anything that can answer a [`FrameRequest`].
pub trait FrameSource {
    fn name(&self) -> &str;

    /// The raw frame for `request`. May be empty; [`acquire`] decides whether
    /// that is an error.
    fn download(&self, request: &FrameRequest) -> Result<RawFrame, DataError>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn download(&self, request: &FrameRequest) -> Result<RawFrame, DataError> {
        (**self).download(request)
    }
}

/// Download `request`, failing on an empty response.
pub fn acquire(source: &dyn FrameSource, request: &FrameRequest) -> Result<RawFrame, DataError> {
    let frame = source.download(request)?;
    if frame.is_empty() {
        return Err(DataError::EmptyResponse {
            symbols: request.symbols.clone(),
        });
    }
    info!(tag = %request.tag, source = source.name(), rows = frame.len(), "acquired frame");
    Ok(frame)
}

/// Download and normalize `request` into one column per requested symbol.
pub fn acquire_table(
    source: &dyn FrameSource,
    request: &FrameRequest,
    preference: FieldPreference,
) -> Result<SeriesTable, DataError> {
    let frame = acquire(source, request)?;
    normalize(frame, &request.symbols, preference)?.into_best_effort()
}

/// Download each symbol of `request` separately and outer-join the results.
///
/// Symbols that come back empty or unknown are skipped with a warning; the
/// call fails only when every symbol is skipped.
pub fn acquire_each(
    source: &dyn FrameSource,
    request: &FrameRequest,
    preference: FieldPreference,
) -> Result<SeriesTable, DataError> {
    let mut joined: Option<SeriesTable> = None;

    for symbol in &request.symbols {
        let single = request.for_symbol(symbol);
        let table = match acquire_table(source, &single, preference) {
            Ok(table) => table,
            Err(e @ (DataError::EmptyResponse { .. } | DataError::SymbolNotFound { .. })) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol");
                continue;
            }
            Err(e) => return Err(e),
        };
        if table.drop_missing(crate::domain::DropRule::All).is_empty() {
            warn!(symbol = %symbol, "skipping symbol with no observations");
            continue;
        }

        joined = Some(match joined {
            None => table,
            Some(acc) => acc
                .outer_join(&table)
                .map_err(|e| DataError::InvalidFrame(e.to_string()))?,
        });
    }

    joined.ok_or_else(|| DataError::EmptyResponse {
        symbols: request.symbols.clone(),
    })
}

/// A [`FrameSource`] backed by a per-symbol [`DataProvider`].
pub struct ProviderSource<P> {
    provider: P,
    today: NaiveDate,
}

impl<P: DataProvider> ProviderSource<P> {
    /// `today` anchors `Since` and `Lookback` windows.
    pub fn new(provider: P, today: NaiveDate) -> Self {
        Self { provider, today }
    }
}

impl<P: DataProvider> FrameSource for ProviderSource<P> {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn download(&self, request: &FrameRequest) -> Result<RawFrame, DataError> {
        let (start, end) = request.window.resolve(self.today);
        let mut results = Vec::with_capacity(request.symbols.len());

        for symbol in &request.symbols {
            match self.provider.fetch(symbol, start, end) {
                Ok(result) => results.push(result),
                Err(DataError::SymbolNotFound { symbol }) => {
                    warn!(symbol = %symbol, provider = self.provider.name(), "symbol not found, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        if results.iter().all(|r| r.bars.is_empty()) {
            return RawFrame::new(Vec::new(), Vec::new());
        }

        let aligned = align_symbols(results);
        let layout = match request.layout {
            FrameLayout::Flat if aligned.symbols.len() != 1 => FrameLayout::FieldMajor,
            layout => layout,
        };
        RawFrame::from_aligned(&aligned, layout)
    }
}

/// Decorator that records every frame its inner source downloads.
pub struct RecordingSource<S> {
    inner: S,
    store: SnapshotStore,
}

impl<S: FrameSource> RecordingSource<S> {
    pub fn new(inner: S, store: SnapshotStore) -> Self {
        Self { inner, store }
    }
}

impl<S: FrameSource> FrameSource for RecordingSource<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn download(&self, request: &FrameRequest) -> Result<RawFrame, DataError> {
        let frame = self.inner.download(request)?;
        if !frame.is_empty() {
            self.store.write(&request.tag, &request.symbols, &frame)?;
        }
        Ok(frame)
    }
}
