//! The plan generator credential, stored as a bare string in
//! `.coach/api-credential`.

use crate::error::{CoachError, Result};
use crate::paths;
use std::path::Path;

/// Return the stored credential, or `None` if none is configured.
pub fn load(root: &Path) -> Result<Option<String>> {
    let key = crate::io::read_optional(&paths::credential_path(root))?
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty());
    Ok(key)
}

/// Like [`load`], but absence is a [`CoachError::NotConfigured`].
pub fn require(root: &Path) -> Result<String> {
    load(root)?.ok_or(CoachError::NotConfigured)
}

pub fn save(root: &Path, key: &str) -> Result<()> {
    crate::io::atomic_write(&paths::credential_path(root), key.trim().as_bytes())?;
    restrict_permissions(&paths::credential_path(root))
}

/// Delete the stored credential (no-op if none exists).
pub fn clear(root: &Path) -> Result<()> {
    crate::io::remove_if_exists(&paths::credential_path(root))
}

/// Keys for the generative-language API start with `AI` (usually `AIza`).
pub fn looks_like_api_key(key: &str) -> bool {
    key.trim().starts_with("AI")
}

/// Display form: first four and last four characters.
pub fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "\u{2026}".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}\u{2026}{tail}")
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
