//! Imgflow Core Library
//!
//! This crate provides the shared types used across all imgflow components:
//! field configuration, image format tokens, and the unified error type with
//! its caller-visible status/message mapping.

pub mod config;
pub mod error;
pub mod format;

// Re-export commonly used types
pub use config::{FieldConfig, FieldSpec, Fit, OutputSpec, ResizeSpec};
pub use error::{ErrorOverride, ErrorResponse, UploadError};
pub use format::ImageFormat;
