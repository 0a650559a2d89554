//! Raw-frame snapshots in Parquet.
//!
//! Layout: `{dir}/{tag}.parquet` plus a `{tag}.meta.json` sidecar.
//!
//! The Parquet file holds a `date` column and one `f64` column per raw key;
//! paired keys are stored as `outer::inner`. The sidecar carries the request's
//! symbols and a blake3 hash of the values, checked on every read.
//! Writes are atomic (write to `.tmp`, rename into place).

use super::acquire::{FrameRequest, FrameSource};
use super::frame::{ColumnKey, RawFrame};
use super::provider::DataError;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const KEY_SEPARATOR: &str = "::";

/// Metadata sidecar for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub tag: String,
    pub symbols: Vec<String>,
    pub rows: usize,
    pub columns: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub data_hash: String,
    pub recorded_at: chrono::NaiveDateTime,
}

/// A directory of recorded frames.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn frame_path(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{}.parquet", file_stem(tag)))
    }

    fn meta_path(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{}.meta.json", file_stem(tag)))
    }

    /// Record `frame` under `tag`, replacing any earlier recording.
    pub fn write(
        &self,
        tag: &str,
        symbols: &[String],
        frame: &RawFrame,
    ) -> Result<SnapshotMeta, DataError> {
        let (Some(start_date), Some(end_date)) =
            (frame.dates().first().copied(), frame.dates().last().copied())
        else {
            return Err(DataError::SnapshotError(format!("refusing to record empty frame '{tag}'")));
        };

        fs::create_dir_all(&self.dir)
            .map_err(|e| DataError::SnapshotError(format!("failed to create dir: {e}")))?;

        let mut df = frame_to_dataframe(frame)?;
        let path = self.frame_path(tag);
        let tmp_path = path.with_extension("parquet.tmp");
        write_parquet(&mut df, &tmp_path)?;
        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DataError::SnapshotError(format!("atomic rename failed: {e}"))
        })?;

        let meta = SnapshotMeta {
            tag: tag.to_string(),
            symbols: symbols.to_vec(),
            rows: frame.len(),
            columns: frame.keys().len(),
            start_date,
            end_date,
            data_hash: frame_hash(frame),
            recorded_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::SnapshotError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(tag), meta_json)
            .map_err(|e| DataError::SnapshotError(format!("meta write: {e}")))?;

        info!(tag, rows = meta.rows, path = %path.display(), "recorded snapshot");
        Ok(meta)
    }

    /// Sidecar for `tag`, if one was recorded.
    pub fn meta(&self, tag: &str) -> Option<SnapshotMeta> {
        let content = fs::read_to_string(self.meta_path(tag)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Load the frame recorded under `tag`, verifying it against its sidecar.
    pub fn read(&self, tag: &str) -> Result<RawFrame, DataError> {
        let path = self.frame_path(tag);
        if !path.exists() {
            return Err(DataError::NoSnapshot {
                tag: tag.to_string(),
                dir: self.dir.display().to_string(),
            });
        }

        let file = fs::File::open(&path)
            .map_err(|e| DataError::SnapshotError(format!("open: {e}")))?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| DataError::SnapshotError(format!("read: {e}")))?;
        let frame = dataframe_to_frame(&df)?;

        if let Some(meta) = self.meta(tag) {
            let hash = frame_hash(&frame);
            if hash != meta.data_hash {
                return Err(DataError::SnapshotError(format!(
                    "hash mismatch for '{tag}': sidecar {} vs data {hash}",
                    meta.data_hash
                )));
            }
        }

        debug!(tag, rows = frame.len(), "loaded snapshot");
        Ok(frame)
    }
}

/// A [`FrameSource`] that replays recorded snapshots.
pub struct ReplaySource {
    store: SnapshotStore,
}

impl ReplaySource {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }
}

impl FrameSource for ReplaySource {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn download(&self, request: &FrameRequest) -> Result<RawFrame, DataError> {
        self.store.read(&request.tag)
    }
}

/// File-system-safe stem for a request tag (`^VIX`, `GC=F`, ...).
pub fn file_stem(tag: &str) -> String {
    tag.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// blake3 over dates, keys and the bit patterns of every value.
fn frame_hash(frame: &RawFrame) -> String {
    let mut hasher = blake3::Hasher::new();
    for date in frame.dates() {
        hasher.update(date.to_string().as_bytes());
    }
    for (key, col) in frame.iter_columns() {
        hasher.update(storage_name(key).as_bytes());
        for v in col {
            // Every NaN hashes alike; Parquet does not preserve payloads.
            let bits = if v.is_nan() { f64::NAN.to_bits() } else { v.to_bits() };
            hasher.update(&bits.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

fn storage_name(key: &ColumnKey) -> String {
    match key {
        ColumnKey::Flat(a) => a.clone(),
        ColumnKey::Pair(a, b) => format!("{a}{KEY_SEPARATOR}{b}"),
    }
}

fn key_from_storage(name: &str) -> ColumnKey {
    match name.split_once(KEY_SEPARATOR) {
        Some((a, b)) => ColumnKey::pair(a, b),
        None => ColumnKey::flat(name),
    }
}

// ── Parquet I/O helpers ─────────────────────────────────────────────

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn frame_to_dataframe(frame: &RawFrame) -> Result<DataFrame, DataError> {
    let days: Vec<i32> = frame
        .dates()
        .iter()
        .map(|d| (*d - epoch()).num_days() as i32)
        .collect();

    let mut columns = Vec::with_capacity(frame.keys().len() + 1);
    columns.push(
        Column::new("date".into(), days)
            .cast(&DataType::Date)
            .map_err(|e| DataError::SnapshotError(format!("date cast: {e}")))?,
    );
    for (key, col) in frame.iter_columns() {
        columns.push(Column::new(storage_name(key).as_str().into(), col.to_vec()));
    }

    DataFrame::new(columns).map_err(|e| DataError::SnapshotError(format!("dataframe creation: {e}")))
}

fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), DataError> {
    let file =
        fs::File::create(path).map_err(|e| DataError::SnapshotError(format!("create file: {e}")))?;
    ParquetWriter::new(file)
        .finish(df)
        .map_err(|e| DataError::SnapshotError(format!("write parquet: {e}")))?;
    Ok(())
}

fn dataframe_to_frame(df: &DataFrame) -> Result<RawFrame, DataError> {
    let map_err = |e: PolarsError| DataError::SnapshotError(format!("column read: {e}"));

    let date_ca = df
        .column("date")
        .map_err(map_err)?
        .date()
        .map_err(|e| DataError::SnapshotError(format!("date column type: {e}")))?;

    let mut dates = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let days = date_ca
            .get(i)
            .ok_or_else(|| DataError::SnapshotError(format!("null date at row {i}")))?;
        dates.push(epoch() + chrono::Duration::days(days as i64));
    }

    let mut columns = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == "date" {
            continue;
        }
        let ca = column
            .f64()
            .map_err(|e| DataError::SnapshotError(format!("{name} column type: {e}")))?;
        let values: Vec<f64> = (0..df.height())
            .map(|i| ca.get(i).unwrap_or(f64::NAN))
            .collect();
        columns.push((key_from_storage(name), values));
    }

    RawFrame::new(dates, columns)
}
