//! Codec seam: format probing and plan execution.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use imgflow_core::ImageFormat;

use crate::planner::TransformPlan;

/// Codec operation errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unrecognized image data")]
    UnknownFormat,

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("unsupported output format: {0}")]
    UnsupportedOutput(ImageFormat),

    #[error("image encode failed: {0}")]
    Encode(String),
}

/// Image codec: detects source formats and executes transform plans.
///
/// The orchestrator only builds plans; all pixel work lives behind this
/// trait so it can be swapped for another implementation or a test double.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// Detect the source format from magic bytes.
    ///
    /// Fails with [`CodecError::UnknownFormat`] when the data is not a
    /// recognizable image.
    async fn probe(&self, data: &[u8]) -> Result<ImageFormat, CodecError>;

    /// Decode, apply the plan's resize, and re-encode in the plan's format.
    async fn encode(&self, data: &[u8], plan: &TransformPlan) -> Result<Bytes, CodecError>;
}
