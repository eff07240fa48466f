//! Imgflow Upload Library
//!
//! Accepts named file fields from an already-parsed request, validates and
//! transforms each file (resize + re-encode), and persists the results under
//! a sandboxed root directory.
//!
//! Multipart parsing, HTTP routing, and response serialization stay with the
//! caller; this crate consumes a `field → files` mapping and returns saved
//! filenames per field or a single precise error with a status/message
//! mapping.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use imgflow::{IncomingFile, Uploader, UploaderOptions};
//!
//! # async fn example() -> Result<(), imgflow::UploadError> {
//! let uploader = Uploader::new(
//!     UploaderOptions::new("/var/lib/app/uploads").field("avatar", "avatars"),
//! );
//!
//! let mut files = HashMap::new();
//! files.insert(
//!     "avatar".to_string(),
//!     vec![IncomingFile::new("image/png", std::fs::read("in.png").unwrap())],
//! );
//!
//! let results = uploader.process(&files).await?;
//! println!("saved as {:?}", results["avatar"]);
//! # Ok(())
//! # }
//! ```

pub mod options;
pub mod orchestrator;
pub mod types;

// Re-export commonly used types
pub use imgflow_core::{
    ErrorOverride, ErrorResponse, FieldConfig, FieldSpec, Fit, ImageFormat, OutputSpec,
    ResizeSpec, UploadError,
};
pub use imgflow_processing::{plan, CodecError, ImageCodec, ImageRsCodec, TransformPlan};
pub use imgflow_storage::LocalStore;
pub use options::UploaderOptions;
pub use orchestrator::Uploader;
pub use types::{FieldValue, IncomingFile};
