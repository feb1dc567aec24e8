//! Storage abstraction trait
//!
//! This module defines the ObjectStore trait that all storage backends must
//! implement, together with the metadata attached to every stored object.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use heliops_core::StorageBackend;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for heliops_core::AppError {
    fn from(err: StorageError) -> Self {
        heliops_core::AppError::Storage(err.to_string())
    }
}

/// Metadata attached to every stored object.
///
/// Always carries the original file name, the client-side timestamp of the
/// upload, and the owning tenant.
#[derive(Debug, Clone)]
pub struct ObjectMetadata {
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub tenant_id: Uuid,
}

impl ObjectMetadata {
    pub fn new(original_name: impl Into<String>, tenant_id: Uuid) -> Self {
        Self {
            original_name: original_name.into(),
            uploaded_at: Utc::now(),
            tenant_id,
        }
    }

    /// Key/value pairs as sent to the backend.
    pub fn as_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("original-name", self.original_name.clone()),
            ("uploaded-at", self.uploaded_at.to_rfc3339()),
            ("tenant-id", self.tenant_id.to_string()),
        ]
    }
}

/// Receipt returned by a successful put.
///
/// The key is the backend-internal identifier; the url is the stable,
/// resolvable download reference handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    pub key: String,
    pub url: String,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// The ingestion pipeline works against it without coupling to backend
/// details; tests substitute an in-memory implementation.
///
/// **Key format:** `{prefix}/{timestamp_ms}_{sanitized-name}`, derived by
/// the `keys` module. See the crate root documentation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object under the given key and return its receipt.
    ///
    /// The returned url is the publicly resolvable download reference.
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<PutReceipt>;

    /// Download an object by its storage key
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by its storage key.
    ///
    /// Deletion is performed by the surrounding forms when a record drops a
    /// reference; it is not part of the batch pipeline itself.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Generate a presigned/temporary URL for direct access (GET)
    ///
    /// This is useful for giving clients temporary access to objects
    /// without going through the application server.
    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_pairs() {
        let tenant_id = Uuid::new_v4();
        let metadata = ObjectMetadata::new("Panel A.jpg", tenant_id);
        let pairs = metadata.as_pairs();
        assert_eq!(pairs[0], ("original-name", "Panel A.jpg".to_string()));
        assert_eq!(pairs[2], ("tenant-id", tenant_id.to_string()));
    }
}
