//! Local filesystem artifact store.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::{sandbox, StorageResult};

/// Writes and deletes upload artifacts under a fixed root directory.
///
/// All paths handed to [`write`](LocalStore::write) and
/// [`remove`](LocalStore::remove) are produced by
/// [`resolve_dir`](LocalStore::resolve_dir), so every operation stays inside
/// the root.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a configured subfolder to its sandboxed target directory.
    pub fn resolve_dir(&self, subfolder: &str) -> StorageResult<PathBuf> {
        sandbox::resolve(&self.root, subfolder)
    }

    /// Create the target directory and any missing parents. Idempotent.
    pub async fn ensure_dir(&self, dir: &Path) -> StorageResult<()> {
        sandbox::ensure_dir(dir).await
    }

    /// Write an artifact to disk, syncing before returning.
    pub async fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let start = std::time::Instant::now();

        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Artifact written"
        );

        Ok(())
    }

    /// Delete an artifact. Missing files are not an error.
    pub async fn remove(&self, path: &Path) -> StorageResult<()> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(path).await?;

        tracing::info!(path = %path.display(), "Artifact deleted");

        Ok(())
    }
}
