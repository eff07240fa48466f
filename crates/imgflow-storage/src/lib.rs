//! Imgflow Storage Library
//!
//! This crate owns every filesystem concern of the upload pipeline: sandboxed
//! resolution of configured subfolders against the upload root, idempotent
//! directory creation, and artifact writes/deletes.
//!
//! # Path safety
//!
//! Subfolders come from configuration, not from end-user request data, but
//! they are treated as untrusted all the same. [`sandbox::resolve`] is the
//! sole authority on whether a subfolder is acceptable; no other component
//! joins user-influenced strings onto the root.

pub mod local;
pub mod sandbox;

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid upload subfolder: {0:?}")]
    InvalidSubfolder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

// Re-export commonly used types
pub use local::LocalStore;
pub use sandbox::{ensure_dir, resolve};
