//! Error types module
//!
//! All upload failures are unified under the [`UploadError`] enum. Each kind
//! carries a canonical caller-visible message and status; callers may
//! override either through an [`ErrorOverride`] produced by an injected
//! mapping strategy.

use serde::Serialize;

/// Unified error for the upload pipeline.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload subfolder {0:?} escapes the upload root")]
    InvalidSubfolder(String),

    #[error("file limit exceeded for field {field}")]
    LimitExceeded { field: String },

    #[error("field {field} only accepts images, got {mimetype}")]
    InvalidType { field: String, mimetype: String },

    #[error("unreadable or corrupt image data")]
    InvalidImage,

    #[error("image encode failed: {0}")]
    Codec(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Canonical client-facing message for the error kind.
    ///
    /// These may differ from the internal `Display` text, which is meant
    /// for logs.
    pub fn client_message(&self) -> String {
        match self {
            UploadError::LimitExceeded { field } => {
                format!("{} uchun fayl limiti oshdi.", field)
            }
            UploadError::InvalidType { .. } => "Faqat rasm yuborish mumkin.".to_string(),
            UploadError::InvalidImage => "Yaroqsiz rasm fayl.".to_string(),
            UploadError::InvalidSubfolder(_) => "Upload papka yo'li noto'g'ri.".to_string(),
            UploadError::Codec(_) | UploadError::Io(_) => "Upload xatoligi.".to_string(),
        }
    }
}

/// Partial response mapping returned by a caller-supplied error strategy.
/// Absent parts fall back to the canonical defaults.
#[derive(Debug, Clone, Default)]
pub struct ErrorOverride {
    pub status: Option<u16>,
    pub message: Option<String>,
}

/// Caller-visible response for a failed upload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
}

impl ErrorResponse {
    /// Build the response for an error, applying an optional override.
    ///
    /// Unoverridden status defaults to 400; an empty override message falls
    /// back to the canonical per-kind message.
    pub fn from_error(err: &UploadError, mapped: Option<ErrorOverride>) -> Self {
        let mapped = mapped.unwrap_or_default();
        let message = match mapped.message {
            Some(m) if !m.is_empty() => m,
            _ => err.client_message(),
        };
        ErrorResponse {
            status: mapped.status.unwrap_or(400),
            message,
        }
    }
}
