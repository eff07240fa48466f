//! Transform plan construction.
//!
//! The planner derives the final output format, resize geometry, and encode
//! parameters from configuration plus the file's detected source format. It
//! performs no I/O and cannot fail: format detection happens earlier in the
//! codec probe, and encode parameters for formats the codec cannot handle
//! are simply left empty for the codec to reject.

use imgflow_core::{Fit, ImageFormat, OutputSpec, ResizeSpec};

/// Resolved resize geometry for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Fit,
    pub without_enlargement: bool,
}

/// Resolved transform parameters for a single file. Immutable once computed.
#[derive(Debug, Clone)]
pub struct TransformPlan {
    pub format: ImageFormat,
    pub resize: Option<ResizePlan>,
    pub quality: Option<u8>,
    pub compression_level: Option<u8>,
}

/// Build the transform plan for one file.
///
/// The output format defaults to the detected source format, never to a
/// fixed format: absent explicit configuration a png stays a png. Numeric
/// encode parameters pass through only when configured and only for formats
/// they apply to; the codec's own defaults cover the rest.
pub fn plan(
    source: ImageFormat,
    resize: Option<&ResizeSpec>,
    output: Option<&OutputSpec>,
) -> TransformPlan {
    let format = output.and_then(|o| o.format).unwrap_or(source);

    // Resize only when at least one dimension is configured. Both
    // dimensions default to a centered crop; a single dimension bounds the
    // image while preserving aspect ratio.
    let resize = resize.and_then(|r| {
        if r.width.is_none() && r.height.is_none() {
            return None;
        }
        let fit = r.fit.unwrap_or(if r.width.is_some() && r.height.is_some() {
            Fit::Cover
        } else {
            Fit::Inside
        });
        Some(ResizePlan {
            width: r.width,
            height: r.height,
            fit,
            without_enlargement: r.without_enlargement.unwrap_or(true),
        })
    });

    let quality = output
        .and_then(|o| o.quality)
        .filter(|_| format.supports_quality());
    let compression_level = output
        .and_then(|o| o.compression_level)
        .filter(|_| format.supports_compression_level());

    tracing::debug!(
        source = %source,
        format = %format,
        resized = resize.is_some(),
        "Transform plan built"
    );

    TransformPlan {
        format,
        resize,
        quality,
        compression_level,
    }
}
