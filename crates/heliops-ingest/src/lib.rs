//! Heliops Ingest Library
//!
//! The file-ingestion pipeline: validate → transcode → resolve key → store.
//!
//! A form collects files and calls [`UploadOrchestrator::upload_batch`] with
//! a target path prefix, a size ceiling and an optional progress sink. The
//! orchestrator resolves storage-write authorization once per batch, runs
//! the validator and the best-effort image transcoder on every file, then
//! transfers the survivors sequentially to the object store, isolating
//! per-file failures. The aggregated result carries the stored download
//! references together with per-file failure records.

pub mod batch;
pub mod outcome;
pub mod progress;
pub mod transcode;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use batch::UploadOrchestrator;
pub use outcome::{aggregate, BatchError, BatchResult, UploadFailure, UploadOutcome};
pub use progress::ProgressSink;
pub use transcode::ImageTranscoder;
pub use types::{RawFile, TranscodedFile, UploadBatchRequest, ValidatedFile};
pub use validator::{FileValidator, ValidationError};
