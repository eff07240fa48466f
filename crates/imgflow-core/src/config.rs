//! Per-field upload configuration.
//!
//! Callers configure each field either as a bare directory string or as a
//! structured form with limits and transform options. `FieldConfig` is the
//! as-written shape; `FieldSpec` is the canonical shape every other
//! component consumes, produced once by [`FieldConfig::normalize`].

use serde::{Deserialize, Serialize};

use crate::format::ImageFormat;

/// Resize fit policy: how source dimensions map to the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Crop to fill the exact box, centered.
    Cover,
    /// Letterbox into the exact box, preserving aspect ratio.
    Contain,
    /// Preserve aspect ratio, bound both dimensions by the box.
    Inside,
    /// Preserve aspect ratio, cover the box without cropping.
    Outside,
    /// Stretch to the exact box, ignoring aspect ratio.
    Fill,
}

/// Resize options as written in configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Defaults to `Cover` when both dimensions are set, `Inside` otherwise.
    pub fit: Option<Fit>,
    /// Defaults to true: never upscale past the original size.
    pub without_enlargement: Option<bool>,
}

/// Output encoding options as written in configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Target format; defaults to the detected source format.
    pub format: Option<ImageFormat>,
    /// Lossy quality (jpeg/webp/avif). Codec default applies when unset.
    pub quality: Option<u8>,
    /// PNG compression level (0-9). Codec default applies when unset.
    pub compression_level: Option<u8>,
}

/// A field configuration as supplied by the caller: either a bare directory
/// string or the structured form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldConfig {
    Dir(String),
    Full {
        dir: String,
        max_count: Option<usize>,
        #[serde(default)]
        resize: Option<ResizeSpec>,
        #[serde(default)]
        output: Option<OutputSpec>,
    },
}

impl FieldConfig {
    /// Normalize into the canonical [`FieldSpec`], applying defaults.
    ///
    /// No path validation happens here; the sandbox is the sole authority
    /// on whether `dir` is acceptable.
    pub fn normalize(&self) -> FieldSpec {
        match self {
            FieldConfig::Dir(dir) => FieldSpec {
                dir: dir.clone(),
                max_count: 1,
                resize: None,
                output: None,
            },
            FieldConfig::Full {
                dir,
                max_count,
                resize,
                output,
            } => FieldSpec {
                dir: dir.clone(),
                max_count: max_count.unwrap_or(1),
                resize: resize.clone(),
                output: output.clone(),
            },
        }
    }
}

impl From<&str> for FieldConfig {
    fn from(dir: &str) -> Self {
        FieldConfig::Dir(dir.to_string())
    }
}

impl From<String> for FieldConfig {
    fn from(dir: String) -> Self {
        FieldConfig::Dir(dir)
    }
}

/// Canonical per-field configuration. Immutable after normalization.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub dir: String,
    pub max_count: usize,
    pub resize: Option<ResizeSpec>,
    pub output: Option<OutputSpec>,
}
