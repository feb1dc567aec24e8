//! Heliops Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! constants shared across the Heliops ingestion components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::AppError;
pub use storage_types::StorageBackend;
