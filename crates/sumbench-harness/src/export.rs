//! Persistence: one timestamped JSON snapshot per run.

use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};
use crate::report::BenchmarkReport;

/// Second-granularity timestamp embedded in every output filename.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time as `YYYYMMDD_HHMMSS`.
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `benchmark_<timestamp>.json`
pub fn snapshot_file_name(timestamp: &str) -> String {
    format!("benchmark_{timestamp}.json")
}

/// Recover the run timestamp from a snapshot path.
///
/// ```
/// use sumbench_harness::export::timestamp_from_path;
/// use std::path::Path;
///
/// let ts = timestamp_from_path(Path::new("results/json/benchmark_20250101_120000.json"));
/// assert_eq!(ts.as_deref(), Some("20250101_120000"));
/// assert_eq!(timestamp_from_path(Path::new("notes.json")), None);
/// ```
pub fn timestamp_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let ts = stem.strip_prefix("benchmark_")?;
    NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok()?;
    Some(ts.to_string())
}

/// Serialize a report as pretty-printed JSON.
pub fn to_json(report: &BenchmarkReport) -> HarnessResult<String> {
    serde_json::to_string_pretty(report).map_err(HarnessError::from)
}

/// Write `report` to `<json_dir>/benchmark_<timestamp>.json`.
///
/// The directory is created when missing. An existing file with the same
/// name is never overwritten.
pub fn save_report(
    report: &BenchmarkReport,
    json_dir: &Path,
    timestamp: &str,
) -> HarnessResult<PathBuf> {
    std::fs::create_dir_all(json_dir).map_err(|e| {
        HarnessError::Io(format!("Failed to create {}: {}", json_dir.display(), e))
    })?;

    let path = json_dir.join(snapshot_file_name(timestamp));
    let json = to_json(report)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| HarnessError::Io(format!("Failed to create {}: {}", path.display(), e)))?;
    file.write_all(json.as_bytes())
        .and_then(|()| file.write_all(b"\n"))
        .map_err(|e| HarnessError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(path)
}

/// Read a snapshot back.
pub fn load_report(path: &Path) -> HarnessResult<BenchmarkReport> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| HarnessError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&source).map_err(HarnessError::from)
}
