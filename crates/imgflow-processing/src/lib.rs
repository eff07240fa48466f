//! Imgflow Processing Library
//!
//! This crate turns declarative per-field transform configuration into a
//! concrete [`TransformPlan`] and provides the codec seam that carries the
//! plan out: format probing, decoding, resizing, and re-encoding.

pub mod codec;
pub mod image_codec;
pub mod planner;

// Re-export commonly used types
pub use codec::{CodecError, ImageCodec};
pub use image_codec::ImageRsCodec;
pub use planner::{plan, ResizePlan, TransformPlan};
