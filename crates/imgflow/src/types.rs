//! Request-facing data types.

use bytes::Bytes;
use serde::Serialize;

/// One file from an already-parsed multipart request. Read-only to the
/// pipeline.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// Declared mimetype, e.g. `image/png`. Must start with `image/` to be
    /// accepted; the actual format is detected from the bytes.
    pub mimetype: String,
    /// Raw file contents.
    pub buffer: Bytes,
}

impl IncomingFile {
    pub fn new(mimetype: impl Into<String>, buffer: impl Into<Bytes>) -> Self {
        IncomingFile {
            mimetype: mimetype.into(),
            buffer: buffer.into(),
        }
    }
}

/// Saved filenames for one field: a single name when the field's
/// `max_count` is 1, an ordered list otherwise (even when only one file was
/// submitted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            FieldValue::Single(name) => Some(name),
            FieldValue::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            FieldValue::Single(_) => None,
            FieldValue::Many(names) => Some(names),
        }
    }
}
