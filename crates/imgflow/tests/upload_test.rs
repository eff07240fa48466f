//! End-to-end upload tests against a real temporary directory.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use tempfile::tempdir;

use imgflow::{
    ErrorOverride, FieldConfig, FieldValue, Fit, IncomingFile, OutputSpec, ResizeSpec,
    UploadError, Uploader, UploaderOptions,
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([12, 160, 80, 255]),
    ));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
        .unwrap();
    buffer
}

fn files(entries: &[(&str, Vec<IncomingFile>)]) -> HashMap<String, Vec<IncomingFile>> {
    entries
        .iter()
        .map(|(field, files)| (field.to_string(), files.clone()))
        .collect()
}

fn dir_entries(dir: &Path) -> Vec<String> {
    if !dir.exists() {
        return Vec::new();
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_single_field_upload() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(UploaderOptions::new(root.path()).field("avatar", "avatars"));

    let input = files(&[(
        "avatar",
        vec![IncomingFile::new("image/png", png_bytes(10, 10))],
    )]);
    let results = uploader.process(&input).await.unwrap();

    let name = results["avatar"].as_single().expect("max_count 1 is single");
    assert!(name.ends_with(".png"), "format preserved: {}", name);
    assert!(root.path().join("avatars").join(name).is_file());
}

#[tokio::test]
async fn test_non_image_mimetype_rejected() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(UploaderOptions::new(root.path()).field("avatar", "avatars"));

    let input = files(&[(
        "avatar",
        vec![IncomingFile::new("text/plain", b"hello".to_vec())],
    )]);
    let err = uploader.process(&input).await.unwrap_err();

    assert!(matches!(err, UploadError::InvalidType { .. }));
    // The directory may have been created, but it holds no new file.
    assert!(dir_entries(&root.path().join("avatars")).is_empty());
}

#[tokio::test]
async fn test_limit_exceeded_writes_nothing() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(UploaderOptions::new(root.path()).field(
        "gallery",
        FieldConfig::Full {
            dir: "gallery".to_string(),
            max_count: Some(2),
            resize: None,
            output: None,
        },
    ));

    let file = IncomingFile::new("image/png", png_bytes(4, 4));
    let input = files(&[("gallery", vec![file.clone(), file.clone(), file])]);
    let err = uploader.process(&input).await.unwrap_err();

    assert!(matches!(err, UploadError::LimitExceeded { ref field } if field == "gallery"));
    assert!(dir_entries(&root.path().join("gallery")).is_empty());
}

#[tokio::test]
async fn test_failed_second_file_rolls_back_first() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(UploaderOptions::new(root.path()).field(
        "gallery",
        FieldConfig::Full {
            dir: "gallery".to_string(),
            max_count: Some(2),
            resize: None,
            output: None,
        },
    ));

    let input = files(&[(
        "gallery",
        vec![
            IncomingFile::new("image/png", png_bytes(4, 4)),
            // Declared as an image but not decodable: fails after the first
            // file has already been written.
            IncomingFile::new("image/png", b"not image bytes".to_vec()),
        ],
    )]);
    let err = uploader.process(&input).await.unwrap_err();

    assert!(matches!(err, UploadError::InvalidImage));
    assert!(
        dir_entries(&root.path().join("gallery")).is_empty(),
        "first artifact must be rolled back"
    );
}

#[tokio::test]
async fn test_max_count_above_one_always_yields_list() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(UploaderOptions::new(root.path()).field(
        "gallery",
        FieldConfig::Full {
            dir: "gallery".to_string(),
            max_count: Some(3),
            resize: None,
            output: None,
        },
    ));

    let input = files(&[(
        "gallery",
        vec![IncomingFile::new("image/png", png_bytes(4, 4))],
    )]);
    let results = uploader.process(&input).await.unwrap();

    let names = results["gallery"].as_many().expect("max_count 3 is a list");
    assert_eq!(names.len(), 1);
}

#[tokio::test]
async fn test_fields_without_submissions_are_skipped() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(
        UploaderOptions::new(root.path())
            .field("avatar", "avatars")
            .field("cover", "covers"),
    );

    let input = files(&[(
        "cover",
        vec![IncomingFile::new("image/png", png_bytes(4, 4))],
    )]);
    let results = uploader.process(&input).await.unwrap();

    assert!(!results.contains_key("avatar"));
    assert!(results.contains_key("cover"));
}

#[tokio::test]
async fn test_resize_and_format_conversion_end_to_end() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(UploaderOptions::new(root.path()).field(
        "cover",
        FieldConfig::Full {
            dir: "covers".to_string(),
            max_count: None,
            resize: Some(ResizeSpec {
                width: Some(10),
                height: Some(10),
                fit: Some(Fit::Cover),
                without_enlargement: None,
            }),
            output: Some(OutputSpec {
                format: Some(imgflow::ImageFormat::Jpeg),
                quality: Some(80),
                compression_level: None,
            }),
        },
    ));

    let input = files(&[(
        "cover",
        vec![IncomingFile::new("image/png", png_bytes(40, 20))],
    )]);
    let results = uploader.process(&input).await.unwrap();

    let name = results["cover"].as_single().unwrap();
    assert!(name.ends_with(".jpeg"));

    let stored = std::fs::read(root.path().join("covers").join(name)).unwrap();
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!(image::guess_format(&stored).unwrap(), image::ImageFormat::Jpeg);
    assert_eq!((decoded.width(), decoded.height()), (10, 10));
}

#[tokio::test]
async fn test_custom_file_namer() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(
        UploaderOptions::new(root.path())
            .field("avatar", "avatars")
            .file_name(|field, ext| format!("{}-custom.{}", field, ext)),
    );

    let input = files(&[(
        "avatar",
        vec![IncomingFile::new("image/png", png_bytes(4, 4))],
    )]);
    let results = uploader.process(&input).await.unwrap();

    assert_eq!(results["avatar"].as_single().unwrap(), "avatar-custom.png");
    assert!(root.path().join("avatars/avatar-custom.png").is_file());
}

#[tokio::test]
async fn test_error_response_override() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(
        UploaderOptions::new(root.path())
            .field("avatar", "avatars")
            .on_error(|err| match err {
                UploadError::InvalidType { .. } => ErrorOverride {
                    status: Some(415),
                    message: None,
                },
                _ => ErrorOverride::default(),
            }),
    );

    let input = files(&[(
        "avatar",
        vec![IncomingFile::new("application/pdf", b"%PDF".to_vec())],
    )]);
    let err = uploader.process(&input).await.unwrap_err();
    let resp = uploader.error_response(&err);

    assert_eq!(resp.status, 415);
    // Message not overridden: canonical default applies.
    assert_eq!(resp.message, "Faqat rasm yuborish mumkin.");
}

#[tokio::test]
async fn test_traversal_subfolder_fails_before_any_write() {
    let root = tempdir().unwrap();
    let uploader =
        Uploader::new(UploaderOptions::new(root.path()).field("avatar", "../outside"));

    let input = files(&[(
        "avatar",
        vec![IncomingFile::new("image/png", png_bytes(4, 4))],
    )]);
    let err = uploader.process(&input).await.unwrap_err();

    assert!(matches!(err, UploadError::InvalidSubfolder(_)));
    let resp = uploader.error_response(&err);
    assert_eq!(resp.status, 400);
    assert_eq!(resp.message, "Upload papka yo'li noto'g'ri.");
}

#[tokio::test]
async fn test_earlier_field_keeps_artifacts_when_later_field_fails() {
    let root = tempdir().unwrap();
    let uploader = Uploader::new(
        UploaderOptions::new(root.path())
            .field("avatar", "avatars")
            .field("cover", "covers"),
    );

    let input = files(&[
        (
            "avatar",
            vec![IncomingFile::new("image/png", png_bytes(4, 4))],
        ),
        (
            "cover",
            vec![IncomingFile::new("image/png", b"broken".to_vec())],
        ),
    ]);
    let err = uploader.process(&input).await.unwrap_err();

    assert!(matches!(err, UploadError::InvalidImage));
    // Rollback is scoped to the failing field.
    assert_eq!(dir_entries(&root.path().join("avatars")).len(), 1);
    assert!(dir_entries(&root.path().join("covers")).is_empty());
}
