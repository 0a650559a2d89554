//! Data acquisition, shape normalization and snapshots

pub mod acquire;
pub mod align;
pub mod csv_import;
pub mod frame;
pub mod provider;
pub mod shape;
pub mod snapshot;
pub mod yahoo;

pub use acquire::{
    acquire, acquire_each, acquire_table, FrameRequest, FrameSource, ProviderSource,
    RecordingSource,
};
pub use csv_import::{parse_csv, read_csv, CsvSource};
pub use frame::{ColumnKey, FrameLayout, RawFrame};
pub use provider::{DataError, DataProvider, DataSource, FetchResult, FetchWindow, RawBar};
pub use shape::{extract_ohlc, normalize, resolve, FieldPreference, Normalized, Resolution, ResponseShape};
pub use snapshot::{ReplaySource, SnapshotMeta, SnapshotStore};
pub use yahoo::{YahooConfig, YahooProvider};
