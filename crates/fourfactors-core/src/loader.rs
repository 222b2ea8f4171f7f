// Snapshot loader: pick the current (or newest dated) processed file, check
// its age, validate the minimal schema and hand the table back.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use crate::schema::REQUIRED_COLUMNS;
use crate::snapshot::{self, parse_stamp, stamp_of};
use crate::table::{Table, TableError};

/// Default acceptable snapshot age.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 3;

// ---------------------------------------------------------------------------
// Error and warning types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no team factors found in {dir}; run import-team-factors first")]
    NotFound { dir: PathBuf },

    #[error("missing required columns: {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("failed to list {dir}: {source}")]
    Discovery {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Read(#[from] TableError),
}

/// Advisory attached to a successful load when the data is older than the
/// caller's threshold. Never blocks the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleDataWarning {
    pub stamp: NaiveDate,
    pub age_days: i64,
    pub max_age_days: i64,
}

impl fmt::Display for StaleDataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NBA team factors are {} days old (>{}). Refresh recommended.",
            self.age_days, self.max_age_days
        )
    }
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// A validated processed table plus where it came from and how fresh it is.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub table: Table,
    pub path: PathBuf,
    /// Effective date of the data, when one could be determined.
    pub stamp: Option<NaiveDate>,
    pub staleness: Option<StaleDataWarning>,
}

impl LoadedSnapshot {
    pub fn is_stale(&self) -> bool {
        self.staleness.is_some()
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the newest team factors under `base_dir/processed`, judging age
/// against today's local date.
pub fn load_team_factors(base_dir: &Path, max_age_days: i64) -> Result<LoadedSnapshot, LoadError> {
    load_team_factors_as_of(base_dir, max_age_days, Local::now().date_naive())
}

/// Same as [`load_team_factors`] with an explicit "today".
pub fn load_team_factors_as_of(
    base_dir: &Path,
    max_age_days: i64,
    today: NaiveDate,
) -> Result<LoadedSnapshot, LoadError> {
    let proc_dir = snapshot::processed_dir(base_dir);
    let latest = snapshot::latest_snapshot(&proc_dir).map_err(|e| LoadError::Discovery {
        dir: proc_dir.clone(),
        source: e,
    })?;

    let current = snapshot::current_path(&proc_dir);
    let (path, stamp_source) = if current.is_file() {
        // The current file carries no date of its own; borrow the newest
        // dated snapshot's.
        (current, latest)
    } else {
        match latest {
            Some(p) => (p.clone(), Some(p)),
            None => return Err(LoadError::NotFound { dir: proc_dir }),
        }
    };

    let table = Table::from_path(&path)?;
    info!("loaded {} rows from {}", table.len(), path.display());

    let stamp = stamp_source
        .as_deref()
        .and_then(stamp_of)
        .and_then(parse_stamp);

    let staleness = stamp.and_then(|s| check_staleness(s, today, max_age_days));
    if let Some(w) = &staleness {
        warn!(
            age_days = w.age_days,
            max_age_days = w.max_age_days,
            path = %path.display(),
            "{w}"
        );
    }

    validate_columns(&table)?;

    Ok(LoadedSnapshot {
        table,
        path,
        stamp,
        staleness,
    })
}

/// Warning if `stamp` is more than `max_age_days` before `today`.
pub fn check_staleness(
    stamp: NaiveDate,
    today: NaiveDate,
    max_age_days: i64,
) -> Option<StaleDataWarning> {
    let age_days = (today - stamp).num_days();
    (age_days > max_age_days).then_some(StaleDataWarning {
        stamp,
        age_days,
        max_age_days,
    })
}

/// Ensure every required column is present (case-insensitive). The error
/// lists all missing names, sorted.
pub fn validate_columns(table: &Table) -> Result<(), LoadError> {
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(LoadError::MissingColumns { missing })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
