//! The per-field upload loop.
//!
//! Fields run in configuration order and files within a field in submission
//! order, strictly sequentially: whether a later file fails decides whether
//! earlier files in the same field must be rolled back, so processing order
//! must stay deterministic.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use uuid::Uuid;

use imgflow_core::{ErrorResponse, FieldSpec, UploadError};
use imgflow_processing::{CodecError, ImageCodec, ImageRsCodec};
use imgflow_storage::{LocalStore, StorageError};

use crate::options::{FileNamer, OnError, UploaderOptions};
use crate::types::{FieldValue, IncomingFile};

/// Drives validation, transformation, and persistence for every configured
/// field of a request.
///
/// A field either persists completely or leaves nothing behind: any failure
/// mid-field deletes the artifacts already written for that field before the
/// error propagates. Earlier fields that already completed keep their
/// artifacts.
pub struct Uploader {
    store: LocalStore,
    fields: Vec<(String, FieldSpec)>,
    file_name: Option<Arc<FileNamer>>,
    on_error: Option<Arc<OnError>>,
    codec: Arc<dyn ImageCodec>,
}

impl Uploader {
    /// Build an uploader with the default `image`-crate codec.
    pub fn new(options: UploaderOptions) -> Self {
        Self::with_codec(options, Arc::new(ImageRsCodec::new()))
    }

    /// Build an uploader with a custom codec implementation.
    pub fn with_codec(options: UploaderOptions, codec: Arc<dyn ImageCodec>) -> Self {
        // Normalize every field config once; nothing downstream sees the
        // raw string-or-struct shape.
        let fields = options
            .fields
            .iter()
            .map(|(name, config)| (name.clone(), config.normalize()))
            .collect();

        Uploader {
            store: LocalStore::new(options.upload_root),
            fields,
            file_name: options.file_name,
            on_error: options.on_error,
            codec,
        }
    }

    /// Process an already-parsed request: field name → submitted files.
    ///
    /// Returns the saved filename(s) per field that had submissions, or the
    /// first error. No partial mapping is ever returned; the failing field's
    /// artifacts are deleted best-effort before the error is raised.
    pub async fn process(
        &self,
        files_by_field: &HashMap<String, Vec<IncomingFile>>,
    ) -> Result<IndexMap<String, FieldValue>, UploadError> {
        let mut results = IndexMap::new();

        for (field, spec) in &self.fields {
            let files = match files_by_field.get(field) {
                Some(files) if !files.is_empty() => files,
                _ => continue,
            };

            if files.len() > spec.max_count {
                return Err(UploadError::LimitExceeded {
                    field: field.clone(),
                });
            }

            let target = self
                .store
                .resolve_dir(&spec.dir)
                .map_err(storage_error)?;
            self.store.ensure_dir(&target).await.map_err(storage_error)?;

            let mut saved = Vec::with_capacity(files.len());
            if let Err(err) = self.save_field(field, spec, files, &target, &mut saved).await {
                self.rollback(field, &target, &saved).await;
                return Err(err);
            }

            tracing::info!(field = %field, count = saved.len(), "Field saved");

            let value = if spec.max_count == 1 {
                // max_count 1 admits exactly one file; the loop above wrote it.
                FieldValue::Single(saved.swap_remove(0))
            } else {
                FieldValue::Many(saved)
            };
            results.insert(field.clone(), value);
        }

        Ok(results)
    }

    /// Map an error to its caller-visible response, honoring the configured
    /// override strategy.
    pub fn error_response(&self, err: &UploadError) -> ErrorResponse {
        let mapped = self.on_error.as_ref().map(|mapper| mapper(err));
        ErrorResponse::from_error(err, mapped)
    }

    async fn save_field(
        &self,
        field: &str,
        spec: &FieldSpec,
        files: &[IncomingFile],
        target: &Path,
        saved: &mut Vec<String>,
    ) -> Result<(), UploadError> {
        for file in files {
            if !file.mimetype.starts_with("image/") {
                return Err(UploadError::InvalidType {
                    field: field.to_string(),
                    mimetype: file.mimetype.clone(),
                });
            }

            let source = self
                .codec
                .probe(&file.buffer)
                .await
                .map_err(|_| UploadError::InvalidImage)?;
            let plan = imgflow_processing::plan(source, spec.resize.as_ref(), spec.output.as_ref());
            let encoded = self
                .codec
                .encode(&file.buffer, &plan)
                .await
                .map_err(codec_error)?;

            let ext = plan.format.extension();
            let name = match &self.file_name {
                Some(namer) => namer(field, ext),
                None => format!("{}.{}", Uuid::new_v4(), ext),
            };

            self.store
                .write(&target.join(&name), &encoded)
                .await
                .map_err(storage_error)?;
            saved.push(name);
        }

        Ok(())
    }

    /// Best-effort cleanup of a failed field's artifacts. Deletion failures
    /// are logged and swallowed so they never mask the triggering error.
    async fn rollback(&self, field: &str, target: &Path, saved: &[String]) {
        for name in saved {
            if let Err(err) = self.store.remove(&target.join(name)).await {
                tracing::warn!(
                    field = %field,
                    artifact = %name,
                    error = %err,
                    "Rollback delete failed"
                );
            }
        }
    }
}

fn storage_error(err: StorageError) -> UploadError {
    match err {
        StorageError::InvalidSubfolder(dir) => UploadError::InvalidSubfolder(dir),
        StorageError::Io(err) => UploadError::Io(err),
    }
}

fn codec_error(err: CodecError) -> UploadError {
    match err {
        // Corrupt data surfacing past the probe is still an invalid image.
        CodecError::UnknownFormat | CodecError::Decode(_) => UploadError::InvalidImage,
        CodecError::UnsupportedOutput(_) | CodecError::Encode(_) => {
            UploadError::Codec(err.to_string())
        }
    }
}
