//! Default codec backed by the `image` crate (plus `webp` for lossy WebP).

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use imgflow_core::{Fit, ImageFormat};

use crate::codec::{CodecError, ImageCodec};
use crate::planner::{ResizePlan, TransformPlan};

/// Codec implementation using the `image` crate.
///
/// Encodes jpeg, png, webp, gif, bmp, and tiff. Avif output is rejected
/// with [`CodecError::UnsupportedOutput`].
#[derive(Debug, Clone, Default)]
pub struct ImageRsCodec;

impl ImageRsCodec {
    pub fn new() -> Self {
        ImageRsCodec
    }
}

#[async_trait]
impl ImageCodec for ImageRsCodec {
    async fn probe(&self, data: &[u8]) -> Result<ImageFormat, CodecError> {
        let detected = image::guess_format(data).map_err(|_| CodecError::UnknownFormat)?;
        match detected {
            image::ImageFormat::Jpeg => Ok(ImageFormat::Jpeg),
            image::ImageFormat::Png => Ok(ImageFormat::Png),
            image::ImageFormat::WebP => Ok(ImageFormat::WebP),
            image::ImageFormat::Avif => Ok(ImageFormat::Avif),
            image::ImageFormat::Gif => Ok(ImageFormat::Gif),
            image::ImageFormat::Bmp => Ok(ImageFormat::Bmp),
            image::ImageFormat::Tiff => Ok(ImageFormat::Tiff),
            _ => Err(CodecError::UnknownFormat),
        }
    }

    async fn encode(&self, data: &[u8], plan: &TransformPlan) -> Result<Bytes, CodecError> {
        let data = data.to_vec();
        let plan = plan.clone();
        // Decode and encode are CPU-bound; run off the async pool.
        tokio::task::spawn_blocking(move || encode_sync(&data, &plan))
            .await
            .map_err(|e| CodecError::Encode(e.to_string()))?
    }
}

fn encode_sync(data: &[u8], plan: &TransformPlan) -> Result<Bytes, CodecError> {
    let img = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    let img = match plan.resize {
        Some(resize) => apply_resize(img, resize),
        None => img,
    };

    match plan.format {
        ImageFormat::Jpeg => encode_jpeg(&img, plan.quality),
        ImageFormat::Png => encode_png(img, plan.compression_level),
        ImageFormat::WebP => encode_webp(&img, plan.quality),
        ImageFormat::Gif => encode_with(&img, image::ImageFormat::Gif),
        ImageFormat::Bmp => encode_with(&img, image::ImageFormat::Bmp),
        ImageFormat::Tiff => encode_with(&img, image::ImageFormat::Tiff),
        ImageFormat::Avif => Err(CodecError::UnsupportedOutput(plan.format)),
    }
}

/// Resolve the target box, deriving a missing dimension from the source
/// aspect ratio.
fn target_box(orig_w: u32, orig_h: u32, width: Option<u32>, height: Option<u32>) -> (u32, u32) {
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let h = (w as f32 * orig_h as f32 / orig_w as f32).round() as u32;
            (w, h.max(1))
        }
        (None, Some(h)) => {
            let w = (h as f32 * orig_w as f32 / orig_h as f32).round() as u32;
            (w.max(1), h)
        }
        (None, None) => (orig_w, orig_h),
    }
}

/// Pick a filter by downscale ratio; heavier shrinks tolerate cheaper
/// filters.
fn select_filter(orig_w: u32, orig_h: u32, new_w: u32, new_h: u32) -> FilterType {
    let max_ratio = (orig_w as f32 / new_w as f32).max(orig_h as f32 / new_h as f32);
    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

fn apply_resize(img: DynamicImage, plan: ResizePlan) -> DynamicImage {
    let (orig_w, orig_h) = img.dimensions();
    let (target_w, target_h) = target_box(orig_w, orig_h, plan.width, plan.height);

    if plan.without_enlargement && target_w >= orig_w && target_h >= orig_h {
        return img;
    }

    let filter = select_filter(orig_w, orig_h, target_w, target_h);

    match plan.fit {
        Fit::Cover => img.resize_to_fill(target_w, target_h, filter),
        Fit::Inside => img.resize(target_w, target_h, filter),
        Fit::Fill => img.resize_exact(target_w, target_h, filter),
        Fit::Outside => {
            let scale =
                (target_w as f32 / orig_w as f32).max(target_h as f32 / orig_h as f32);
            let w = ((orig_w as f32 * scale).round() as u32).max(target_w);
            let h = ((orig_h as f32 * scale).round() as u32).max(target_h);
            img.resize_exact(w, h, filter)
        }
        Fit::Contain => letterbox(&img, target_w, target_h, filter),
    }
}

/// Scale inside the box and center on a white canvas of the exact box size.
fn letterbox(img: &DynamicImage, target_w: u32, target_h: u32, filter: FilterType) -> DynamicImage {
    let scaled = img.resize(target_w, target_h, filter);
    let (scaled_w, scaled_h) = scaled.dimensions();

    let background = Rgba([255u8, 255u8, 255u8, 255u8]);
    let mut canvas = DynamicImage::ImageRgba8(RgbaImage::from_pixel(target_w, target_h, background));

    let x_offset = (target_w - scaled_w) / 2;
    let y_offset = (target_h - scaled_h) / 2;
    imageops::overlay(&mut canvas, &scaled, x_offset as i64, y_offset as i64);

    canvas
}

fn encode_jpeg(img: &DynamicImage, quality: Option<u8>) -> Result<Bytes, CodecError> {
    // Jpeg has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buffer = Vec::new();

    match quality {
        Some(q) => {
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), q);
            rgb.write_with_encoder(encoder)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
        None => {
            rgb.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Jpeg)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
    }

    Ok(Bytes::from(buffer))
}

fn encode_png(img: DynamicImage, compression_level: Option<u8>) -> Result<Bytes, CodecError> {
    let mut buffer = Vec::new();

    match compression_level {
        Some(level) => {
            // zlib-style 0-9 levels mapped onto the encoder's presets.
            let compression = match level {
                0..=3 => CompressionType::Fast,
                4..=6 => CompressionType::Default,
                _ => CompressionType::Best,
            };
            let encoder = PngEncoder::new_with_quality(
                Cursor::new(&mut buffer),
                compression,
                PngFilterType::Adaptive,
            );
            img.write_with_encoder(encoder)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
        None => {
            img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
        }
    }

    Ok(Bytes::from(buffer))
}

fn encode_webp(img: &DynamicImage, quality: Option<u8>) -> Result<Bytes, CodecError> {
    match quality {
        Some(q) => {
            // The image crate's webp encoder is lossless only; lossy
            // quality-controlled output goes through the webp crate.
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            let encoder = webp::Encoder::from_image(&rgba)
                .map_err(|e| CodecError::Encode(e.to_string()))?;
            let encoded = encoder.encode(q as f32);
            Ok(Bytes::copy_from_slice(&encoded))
        }
        None => encode_with(img, image::ImageFormat::WebP),
    }
}

fn encode_with(img: &DynamicImage, format: image::ImageFormat) -> Result<Bytes, CodecError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(Bytes::from(buffer))
}
