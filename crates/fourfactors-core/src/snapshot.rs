// Snapshot file naming, writing and discovery under `<data_dir>/processed`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::schema::TeamFactorRecord;

pub const PROCESSED_DIR: &str = "processed";
pub const FILE_PREFIX: &str = "nba_team_factors_";
pub const CURRENT_SUFFIX: &str = "current";

/// Date stamp format used in snapshot file names.
pub const STAMP_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error writing {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// The three files produced by one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub current_csv: PathBuf,
    pub dated_csv: PathBuf,
    pub dated_json: PathBuf,
}

impl SnapshotPaths {
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [
            self.current_csv.as_path(),
            self.dated_csv.as_path(),
            self.dated_json.as_path(),
        ]
        .into_iter()
    }
}

pub fn processed_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(PROCESSED_DIR)
}

pub fn current_path(proc_dir: &Path) -> PathBuf {
    proc_dir.join(format!("{FILE_PREFIX}{CURRENT_SUFFIX}.csv"))
}

pub fn stamp_for(date: NaiveDate) -> String {
    date.format(STAMP_FORMAT).to_string()
}

pub fn snapshot_paths(proc_dir: &Path, date: NaiveDate) -> SnapshotPaths {
    let stamp = stamp_for(date);
    SnapshotPaths {
        current_csv: current_path(proc_dir),
        dated_csv: proc_dir.join(format!("{FILE_PREFIX}{stamp}.csv")),
        dated_json: proc_dir.join(format!("{FILE_PREFIX}{stamp}.json")),
    }
}

// ---------------------------------------------------------------------------
// Stamps and discovery
// ---------------------------------------------------------------------------

/// Text between the last `_` and the first following `.` of a file name,
/// e.g. `20251105` for `nba_team_factors_20251105.csv`.
pub fn stamp_of(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let tail = name.rsplit('_').next()?;
    tail.split('.').next()
}

/// Parse an eight-digit `YYYYMMDD` stamp. Anything else is `None`.
pub fn parse_stamp(stamp: &str) -> Option<NaiveDate> {
    if stamp.len() != 8 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = stamp[0..4].parse().ok()?;
    let month = stamp[4..6].parse().ok()?;
    let day = stamp[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// True for `nba_team_factors_<digit>...csv`.
fn is_dated_csv(name: &str) -> bool {
    name.strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(".csv"))
        .is_some_and(|stem| stem.starts_with(|c: char| c.is_ascii_digit()))
}

/// The dated CSV snapshot with the greatest file name. Zero-padded stamps make
/// lexicographic order chronological. A missing directory yields `None`.
pub fn latest_snapshot(proc_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let entries = match fs::read_dir(proc_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut best: Option<String> = None;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if is_dated_csv(&name) && best.as_deref().map_or(true, |b| name.as_str() > b) {
            best = Some(name);
        }
    }
    Ok(best.map(|name| proc_dir.join(name)))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Write the current CSV, dated CSV and dated JSON for `date`, creating the
/// processed directory if needed. Records are written in the order given.
pub fn write_snapshot(
    data_dir: &Path,
    date: NaiveDate,
    records: &[TeamFactorRecord],
) -> Result<SnapshotPaths, SnapshotError> {
    let proc_dir = processed_dir(data_dir);
    fs::create_dir_all(&proc_dir).map_err(|e| SnapshotError::Io {
        path: proc_dir.display().to_string(),
        source: e,
    })?;

    let paths = snapshot_paths(&proc_dir, date);
    write_csv(&paths.current_csv, records)?;
    write_csv(&paths.dated_csv, records)?;
    write_json(&paths.dated_json, records)?;

    info!(
        "wrote {} rows to {} (+ current csv and json)",
        records.len(),
        paths.dated_csv.display()
    );
    Ok(paths)
}

fn write_csv(path: &Path, records: &[TeamFactorRecord]) -> Result<(), SnapshotError> {
    let csv_err = |e: csv::Error| SnapshotError::Csv {
        path: path.display().to_string(),
        source: e,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if records.is_empty() {
        writer
            .write_record(crate::schema::OUTPUT_COLUMNS)
            .map_err(csv_err)?;
    }
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_json(path: &Path, records: &[TeamFactorRecord]) -> Result<(), SnapshotError> {
    let text = serde_json::to_string_pretty(records).map_err(|e| SnapshotError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    fs::write(path, text + "\n").map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })
}
