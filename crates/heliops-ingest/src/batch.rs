//! Upload orchestration: authorize → validate → transcode → store.
//!
//! One batch is a single logical thread of control: authorization is
//! resolved once, then files are processed one at a time with one transfer
//! in flight. Sequential transfer keeps progress reporting monotonic and
//! avoids bursting concurrent requests against storage-side rate limits,
//! at the cost of total latency scaling linearly with file count.

use crate::outcome::{aggregate, BatchError, BatchResult, UploadFailure, UploadOutcome};
use crate::transcode::ImageTranscoder;
use crate::types::{TranscodedFile, UploadBatchRequest, ValidatedFile};
use crate::validator::FileValidator;
use heliops_auth::{AuthorizationResolver, IdentityProvider};
use heliops_core::Config;
use heliops_storage::{keys, ObjectMetadata, ObjectStore};
use std::sync::Arc;

/// Sequences per-file upload work against the object store.
///
/// Collaborators are injected, never global: tests substitute an in-memory
/// store and a scripted identity.
pub struct UploadOrchestrator {
    store: Arc<dyn ObjectStore>,
    resolver: AuthorizationResolver,
    transcoder: ImageTranscoder,
    allowed_content_types: Vec<String>,
}

impl UploadOrchestrator {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        resolver: AuthorizationResolver,
        transcoder: ImageTranscoder,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            store,
            resolver,
            transcoder,
            allowed_content_types,
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn ObjectStore>) -> Self {
        Self::new(
            store,
            AuthorizationResolver::from_config(config),
            ImageTranscoder::from_config(config),
            config.allowed_content_types.clone(),
        )
    }

    /// Upload one batch of files.
    ///
    /// Raises only for the two fatal conditions: authorization denial, and
    /// "valid files present but all failed". Everything else (validation
    /// rejects, isolated transfer failures) is returned as data in the
    /// [`BatchResult`].
    ///
    /// An empty selection returns an empty result without contacting the
    /// identity provider or the object store.
    pub async fn upload_batch(
        &self,
        identity: &dyn IdentityProvider,
        request: UploadBatchRequest,
    ) -> Result<BatchResult, BatchError> {
        let UploadBatchRequest {
            files,
            path_prefix,
            max_size_mb,
            progress,
        } = request;

        let total = files.len();
        if total == 0 {
            return Ok(BatchResult::default());
        }

        tracing::info!(
            total,
            prefix = %path_prefix,
            max_size_mb,
            "Upload batch started"
        );

        // Authorization is resolved exactly once per batch; a denial fails
        // the whole batch before any byte is transferred.
        let decision = self.resolver.resolve(identity).await;
        if !decision.allowed {
            tracing::info!(user_id = %identity.user_id(), "Upload batch denied");
            return Err(BatchError::Denied);
        }
        if let Some(source) = decision.source {
            tracing::debug!(source = %source, "Storage write authorized");
        }

        let validator = FileValidator::new(self.allowed_content_types.clone(), max_size_mb);
        let mut completed = 0usize;
        let report = |completed: usize| {
            if let Some(sink) = &progress {
                sink.on_progress(completed, total);
            }
        };

        // Validation pass: rejects are recorded, never retried, and count
        // toward progress immediately since they will not transfer.
        let mut outcomes: Vec<UploadOutcome> = Vec::with_capacity(total);
        let mut valid: Vec<ValidatedFile> = Vec::new();
        for file in files {
            match validator.validate(&file) {
                Ok(()) => valid.push(file.into()),
                Err(e) => {
                    tracing::debug!(file = %file.name, reason = %e, "File rejected by validator");
                    outcomes.push(UploadOutcome::Failed(UploadFailure {
                        name: file.name,
                        reason: e.to_string(),
                    }));
                    completed += 1;
                    report(completed);
                }
            }
        }
        let valid_count = valid.len();

        // Transcoding pass. The transcoder cannot fail, but its output is
        // re-checked against the same ceiling before transfer.
        let mut ready: Vec<TranscodedFile> = Vec::with_capacity(valid.len());
        for file in valid {
            let transcoded = self.transcoder.transcode(file).await;
            match validator.validate_size(&transcoded.name, transcoded.data.len()) {
                Ok(()) => ready.push(transcoded),
                Err(e) => {
                    outcomes.push(UploadOutcome::Failed(UploadFailure {
                        name: transcoded.name,
                        reason: e.to_string(),
                    }));
                    completed += 1;
                    report(completed);
                }
            }
        }

        // Transfer pass: one file in flight at a time. A single transfer
        // failure is recorded as that file's outcome and does not abort the
        // remaining files.
        for file in ready {
            let TranscodedFile {
                name,
                content_type,
                data,
                ..
            } = file;

            let outcome = match keys::resolve_object_key(&path_prefix, &name) {
                Ok(key) => {
                    let metadata = ObjectMetadata::new(name.clone(), identity.tenant_id());
                    match self.store.put(&key, data, &content_type, &metadata).await {
                        Ok(receipt) => UploadOutcome::Stored {
                            name,
                            url: receipt.url,
                        },
                        Err(e) => {
                            tracing::warn!(file = %name, error = %e, "File transfer failed");
                            UploadOutcome::Failed(UploadFailure {
                                name,
                                reason: e.to_string(),
                            })
                        }
                    }
                }
                Err(e) => UploadOutcome::Failed(UploadFailure {
                    name,
                    reason: e.to_string(),
                }),
            };

            outcomes.push(outcome);
            completed += 1;
            report(completed);
        }

        let result = aggregate(outcomes, valid_count);
        match &result {
            Ok(batch) => tracing::info!(
                stored = batch.urls.len(),
                failed = batch.failures.len(),
                "Upload batch finished"
            ),
            Err(e) => tracing::warn!(error = %e, "Upload batch failed"),
        }
        result
    }
}
