//! Recording and replaying raw frames through the Parquet snapshot store.

use chrono::NaiveDate;
use marketplot_core::data::{
    acquire_table, ColumnKey, DataError, FetchWindow, FieldPreference, FrameRequest, FrameSource,
    RawFrame, RecordingSource, ReplaySource, SnapshotStore,
};
use std::cell::Cell;

fn sample_frame() -> RawFrame {
    let d = |day| NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
    RawFrame::new(
        vec![d(10), d(11), d(12)],
        vec![
            (ColumnKey::pair("Close", "BTC-USD"), vec![97_000.0, f64::NAN, 91_500.5]),
            (ColumnKey::pair("Close", "^VIX"), vec![15.2, 16.0, 22.7]),
            (ColumnKey::pair("Volume", "BTC-USD"), vec![1.0e10, 2.0e10, 3.5e10]),
        ],
    )
    .unwrap()
}

/// Counts downloads so tests can tell replays from fetches.
struct FixedSource {
    frame: RawFrame,
    calls: Cell<usize>,
}

impl FrameSource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn download(&self, _request: &FrameRequest) -> Result<RawFrame, DataError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.frame.clone())
    }
}

fn request() -> FrameRequest {
    FrameRequest::new(
        "deep-main",
        &["BTC-USD", "^VIX"],
        FetchWindow::range(
            NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 12).unwrap(),
        ),
    )
}

fn same_values(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
}

#[test]
fn write_and_read_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let frame = sample_frame();

    let meta = store
        .write("deep-main", &["BTC-USD".into(), "^VIX".into()], &frame)
        .unwrap();
    assert_eq!(meta.rows, 3);
    assert_eq!(meta.columns, 3);

    let loaded = store.read("deep-main").unwrap();
    assert_eq!(loaded.dates(), frame.dates());
    assert_eq!(loaded.keys(), frame.keys());
    for (key, col) in frame.iter_columns() {
        assert!(same_values(loaded.column(key).unwrap(), col), "column {key}");
    }
    assert_eq!(store.meta("deep-main").unwrap().symbols, vec!["BTC-USD", "^VIX"]);
}

#[test]
fn missing_snapshot_is_reported_by_tag() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    assert!(matches!(
        store.read("nothing-here"),
        Err(DataError::NoSnapshot { tag, .. }) if tag == "nothing-here"
    ));
}

#[test]
fn tampered_sidecar_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    store.write("t", &["BTC-USD".into()], &sample_frame()).unwrap();

    let meta_path = dir.path().join("t.meta.json");
    let mut meta: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&meta_path).unwrap()).unwrap();
    meta["data_hash"] = serde_json::Value::String("0000".into());
    std::fs::write(&meta_path, meta.to_string()).unwrap();

    assert!(matches!(store.read("t"), Err(DataError::SnapshotError(_))));
}

#[test]
fn recorded_frames_replay_offline() {
    let dir = tempfile::tempdir().unwrap();
    let live = FixedSource {
        frame: sample_frame(),
        calls: Cell::new(0),
    };
    let recorder = RecordingSource::new(live, SnapshotStore::new(dir.path()));

    let recorded = acquire_table(&recorder, &request(), FieldPreference::PreferAdjusted).unwrap();

    let replay = ReplaySource::new(SnapshotStore::new(dir.path()));
    let replayed = acquire_table(&replay, &request(), FieldPreference::PreferAdjusted).unwrap();

    assert_eq!(recorded.columns(), replayed.columns());
    assert!(same_values(
        recorded.column("^VIX").unwrap(),
        replayed.column("^VIX").unwrap()
    ));
    assert!(dir.path().join("deep-main.parquet").exists());
}
