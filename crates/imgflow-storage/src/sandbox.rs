//! Sandboxed subfolder resolution.
//!
//! A configured subfolder must not contain `..` or start absolute. What
//! remains is cleaned down to `[A-Za-z0-9/_-]` (removing every dot, so no
//! traversal token can survive cleaning either), joined onto the upload
//! root, and verified to remain a descendant of the root. The descendant
//! check is an independent second verification on the normalized joined
//! path.

use std::path::{Component, Path, PathBuf};

use crate::{StorageError, StorageResult};

/// Normalize a path lexically: drop `.` components, resolve `..` against
/// earlier components. Returns `None` when `..` would climb past the start.
///
/// `Path::canonicalize` is unusable here: the target directory usually does
/// not exist yet at resolution time.
fn lexical_normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

/// Resolve `subfolder` against `root`, rejecting anything that would land
/// outside the root.
///
/// Pure computation; the returned directory is not created. Use
/// [`ensure_dir`] for that.
pub fn resolve(root: &Path, subfolder: &str) -> StorageResult<PathBuf> {
    let invalid = || StorageError::InvalidSubfolder(subfolder.to_string());

    if subfolder.contains("..") || subfolder.starts_with('/') || subfolder.starts_with('\\') {
        return Err(invalid());
    }

    let cleaned: String = subfolder
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-'))
        .collect();

    let root = lexical_normalize(root).ok_or_else(invalid)?;
    let target = lexical_normalize(&root.join(&cleaned)).ok_or_else(invalid)?;

    // The relative path from root to target must not start with a parent
    // marker or be absolute; strip_prefix fails in both cases.
    if target.strip_prefix(&root).is_err() {
        return Err(invalid());
    }

    Ok(target)
}

/// Create `dir` and any missing parents. Idempotent; safe when concurrent
/// requests race on the same directory.
pub async fn ensure_dir(dir: &Path) -> StorageResult<()> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}
