//! Guard against overlapping plan generations.
//!
//! Holding a [`GenerationLock`] means owning `.coach/generate.lock`, created
//! with exclusive-create semantics. A second acquisition while the file exists
//! is rejected with [`CoachError::GenerationInProgress`]. The file is removed
//! when the guard is dropped. A lock older than `stale_after` is assumed to
//! belong to a process that died mid-request and is taken over.

use crate::error::{CoachError, Result};
use crate::paths;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

#[derive(Debug)]
pub struct GenerationLock {
    path: PathBuf,
}

impl GenerationLock {
    pub fn acquire(root: &Path, stale_after: Duration) -> Result<Self> {
        let path = paths::lock_path(root);
        crate::io::ensure_parent(&path)?;

        match Self::create(&path) {
            Ok(lock) => Ok(lock),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !is_stale(&path, stale_after) {
                    tracing::warn!(path = %path.display(), "generation already in progress");
                    return Err(CoachError::GenerationInProgress);
                }
                tracing::warn!(path = %path.display(), "taking over stale generation lock");
                crate::io::remove_if_exists(&path)?;
                Self::create(&path).map_err(|e| match e.kind() {
                    std::io::ErrorKind::AlreadyExists => CoachError::GenerationInProgress,
                    _ => CoachError::Io(e),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn create(path: &Path) -> std::io::Result<Self> {
        let mut f = OpenOptions::new().write(true).create_new(true).open(path)?;
        writeln!(f, "{}", std::process::id())?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for GenerationLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release generation lock");
        }
    }
}

fn is_stale(path: &Path, stale_after: Duration) -> bool {
    let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(t) => t,
        // Vanished between the create attempt and now; treat as free.
        Err(_) => return true,
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age > stale_after)
        .unwrap_or(false)
}
