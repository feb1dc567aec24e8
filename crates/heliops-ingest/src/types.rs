//! Types flowing through the upload pipeline.

use crate::progress::ProgressSink;
use heliops_core::constants;
use std::sync::Arc;

/// Raw file blob handed over by a form.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl RawFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// A file that passed type/size checks.
///
/// Keeps the original name for error reporting downstream.
#[derive(Debug, Clone)]
pub struct ValidatedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl From<RawFile> for ValidatedFile {
    fn from(file: RawFile) -> Self {
        Self {
            name: file.name,
            content_type: file.content_type,
            data: file.data,
        }
    }
}

/// A validated file after best-effort recompression.
///
/// Always produced: on any transcoding error this carries the original
/// bytes unchanged, so the transcoding stage can never abort a batch.
#[derive(Debug, Clone)]
pub struct TranscodedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
    /// Whether the bytes were actually re-encoded.
    pub transcoded: bool,
}

/// One form submit's worth of files.
///
/// Owned exclusively by the calling form for the duration of one submit
/// action; not persisted.
pub struct UploadBatchRequest {
    pub files: Vec<RawFile>,
    pub path_prefix: String,
    pub max_size_mb: u32,
    pub progress: Option<Arc<dyn ProgressSink>>,
}

impl UploadBatchRequest {
    pub fn new(files: Vec<RawFile>, path_prefix: impl Into<String>) -> Self {
        Self {
            files,
            path_prefix: path_prefix.into(),
            max_size_mb: constants::DEFAULT_MAX_FILE_SIZE_MB,
            progress: None,
        }
    }

    pub fn with_max_size_mb(mut self, max_size_mb: u32) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(progress);
        self
    }
}
