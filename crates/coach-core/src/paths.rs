use crate::error::{CoachError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const COACH_DIR: &str = ".coach";
pub const CONFIG_FILE: &str = ".coach/config.yaml";
pub const CREDENTIAL_FILE: &str = ".coach/api-credential";
pub const HISTORY_FILE: &str = ".coach/history-store.json";
pub const SESSION_FILE: &str = ".coach/session.json";
pub const LOCK_FILE: &str = ".coach/generate.lock";

/// ISO calendar date format used as the history key.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn coach_dir(root: &Path) -> PathBuf {
    root.join(COACH_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn credential_path(root: &Path) -> PathBuf {
    root.join(CREDENTIAL_FILE)
}

pub fn history_path(root: &Path) -> PathBuf {
    root.join(HISTORY_FILE)
}

pub fn session_path(root: &Path) -> PathBuf {
    root.join(SESSION_FILE)
}

pub fn lock_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

/// Export destination for a plan: `<dir>/plan-<date>.json`.
pub fn plan_export_path(dir: &Path, date: &str) -> PathBuf {
    dir.join(format!("plan-{date}.json"))
}

// ---------------------------------------------------------------------------
// Date keys
// ---------------------------------------------------------------------------

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| CoachError::InvalidDate(s.to_string()))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Validate that `s` is a canonical `YYYY-MM-DD` key (zero padded).
pub fn validate_date_key(s: &str) -> Result<()> {
    let date = parse_date(s)?;
    if date_key(date) != s {
        return Err(CoachError::InvalidDate(s.to_string()));
    }
    Ok(())
}
