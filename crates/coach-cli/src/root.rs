use anyhow::Context;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// Resolve the directory holding `.coach/`.
///
/// Priority:
/// 1. `--root` flag / `COACH_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.coach/`
/// 3. The user's home directory
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut dir = cwd.clone();
    loop {
        if coach_core::paths::coach_dir(&dir).is_dir() {
            return dir;
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => break,
        }
    }

    home::home_dir().unwrap_or(cwd)
}

/// Today's date key: `--today` / `COACH_TODAY` if given, else the current
/// UTC date.
pub fn resolve_today(explicit: Option<&str>) -> anyhow::Result<NaiveDate> {
    match explicit {
        Some(s) => coach_core::paths::parse_date(s).with_context(|| format!("invalid --today '{s}'")),
        None => Ok(Utc::now().date_naive()),
    }
}
