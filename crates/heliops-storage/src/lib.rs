//! Heliops Storage Library
//!
//! This crate provides the object-store abstraction used by the ingestion
//! pipeline, with S3 and local-filesystem implementations.
//!
//! # Object key format
//!
//! Destination keys follow `{prefix}/{timestamp_ms}_{sanitized-name}`. The
//! timestamp component is process-wide monotonic, so two files with the same
//! sanitized name can never collide, within a batch or across batches from
//! the same client. Keys must not contain `..` or a leading `/`. Key
//! derivation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_object_store;
pub use heliops_core::StorageBackend;
pub use keys::{resolve_object_key, sanitize_object_name};
#[cfg(feature = "storage-local")]
pub use local::LocalObjectStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStore;
pub use traits::{ObjectMetadata, ObjectStore, PutReceipt, StorageError, StorageResult};
