//! Uploader configuration.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

use imgflow_core::{ErrorOverride, FieldConfig, UploadError};

/// Naming strategy: receives the field name and the final extension,
/// returns the filename to persist under.
pub type FileNamer = dyn Fn(&str, &str) -> String + Send + Sync;

/// Error-mapping strategy: may override the response status and/or message
/// for an error. Absent parts fall back to the canonical defaults.
pub type OnError = dyn Fn(&UploadError) -> ErrorOverride + Send + Sync;

/// Configuration for an [`Uploader`](crate::Uploader).
///
/// Fields are processed in the order they were added. Without a naming
/// strategy, files get `{uuid_v4}.{ext}` names; without an error strategy,
/// every failure maps to status 400 with its canonical message.
#[derive(Clone)]
pub struct UploaderOptions {
    pub(crate) upload_root: PathBuf,
    pub(crate) fields: IndexMap<String, FieldConfig>,
    pub(crate) file_name: Option<Arc<FileNamer>>,
    pub(crate) on_error: Option<Arc<OnError>>,
}

impl UploaderOptions {
    pub fn new(upload_root: impl Into<PathBuf>) -> Self {
        UploaderOptions {
            upload_root: upload_root.into(),
            fields: IndexMap::new(),
            file_name: None,
            on_error: None,
        }
    }

    /// Add a field configuration. A bare `&str` means a target directory
    /// with `max_count` 1.
    pub fn field(mut self, name: impl Into<String>, config: impl Into<FieldConfig>) -> Self {
        self.fields.insert(name.into(), config.into());
        self
    }

    /// Install a custom naming strategy.
    pub fn file_name<F>(mut self, namer: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.file_name = Some(Arc::new(namer));
        self
    }

    /// Install a custom error-mapping strategy.
    pub fn on_error<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&UploadError) -> ErrorOverride + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(mapper));
        self
    }
}
