//! Per-file outcomes and batch aggregation.

use serde::Serialize;

/// Per-file failure record surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub name: String,
    pub reason: String,
}

/// Per-file result.
///
/// Created once a file's attempt completes (success or exhaustion of that
/// file's attempt); immutable thereafter.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Stored { name: String, url: String },
    Failed(UploadFailure),
}

/// Final batch result: ordered download references for stored files plus
/// the failure records. Returned once; never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub urls: Vec<String>,
    pub failures: Vec<UploadFailure>,
}

/// Batch-fatal errors. All other outcomes are returned as data for the
/// caller to render.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Not authorized to upload to storage")]
    Denied,

    #[error("All {failed} file(s) failed to upload: {first_reason}")]
    AllTransfersFailed { failed: usize, first_reason: String },
}

impl From<BatchError> for heliops_core::AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Denied => heliops_core::AppError::Unauthorized(err.to_string()),
            BatchError::AllTransfersFailed { .. } => {
                heliops_core::AppError::Storage(err.to_string())
            }
        }
    }
}

/// Combine per-file outcomes into the batch result.
///
/// Three-way contract: if no file was valid to begin with, the failures are
/// returned as data (an empty or fully rejected selection is not an error);
/// if at least one file was valid but none stored, the batch fails with the
/// first recorded failure reason so the caller can show one actionable
/// message; otherwise the stored URLs are returned together with the
/// failure records.
pub fn aggregate(
    outcomes: Vec<UploadOutcome>,
    valid_files: usize,
) -> Result<BatchResult, BatchError> {
    let mut result = BatchResult::default();

    for outcome in outcomes {
        match outcome {
            UploadOutcome::Stored { url, .. } => result.urls.push(url),
            UploadOutcome::Failed(failure) => result.failures.push(failure),
        }
    }

    if valid_files > 0 && result.urls.is_empty() {
        return Err(BatchError::AllTransfersFailed {
            failed: result.failures.len(),
            first_reason: result
                .failures
                .first()
                .map(|f| f.reason.clone())
                .unwrap_or_default(),
        });
    }

    Ok(result)
}
