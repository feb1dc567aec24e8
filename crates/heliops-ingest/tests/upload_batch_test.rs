//! Upload pipeline integration tests.
//!
//! Run with: `cargo test -p heliops-ingest --test upload_batch_test`

mod helpers;

use helpers::fakes::{MemoryObjectStore, RecordingProgress, ScriptedIdentity};
use helpers::fixtures::{flat_png, noise_png, pdf_bytes, small_png};
use helpers::TEST_JWT_SECRET;

use heliops_auth::AuthorizationResolver;
use heliops_core::models::UserRole;
use heliops_ingest::{
    BatchError, ImageTranscoder, RawFile, UploadBatchRequest, UploadOrchestrator,
};
use std::sync::Arc;

fn orchestrator(store: Arc<MemoryObjectStore>) -> UploadOrchestrator {
    UploadOrchestrator::new(
        store,
        AuthorizationResolver::new(
            TEST_JWT_SECRET,
            vec![UserRole::Admin, UserRole::Supervisor],
        ),
        ImageTranscoder::new(1920, 1080, 75),
        vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/gif".to_string(),
            "image/webp".to_string(),
        ],
    )
}

fn png(name: &str) -> RawFile {
    RawFile::new(name, "image/png", small_png())
}

#[tokio::test]
async fn test_invalid_files_fail_without_transfer_attempt() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::privileged();

    let files = vec![
        png("good.png"),
        RawFile::new("report.pdf", "application/pdf", pdf_bytes()),
        // Over a 1 MB ceiling even after transcoding would apply.
        RawFile::new("huge.png", "image/png", vec![0u8; 2 * 1024 * 1024]),
    ];
    let request = UploadBatchRequest::new(files, "maintenance-reports").with_max_size_mb(1);

    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await
        .unwrap();

    assert_eq!(result.urls.len(), 1);
    assert_eq!(result.failures.len(), 2);
    let failed_names: Vec<&str> = result.failures.iter().map(|f| f.name.as_str()).collect();
    assert!(failed_names.contains(&"report.pdf"));
    assert!(failed_names.contains(&"huge.png"));
    // Only the valid file ever reached the store.
    assert_eq!(store.put_attempts(), 1);
}

#[tokio::test]
async fn test_denied_batch_makes_no_transfer_attempts() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::unprivileged();

    let request = UploadBatchRequest::new(vec![png("a.png"), png("b.png")], "maintenance-reports");
    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await;

    assert!(matches!(result, Err(BatchError::Denied)));
    assert_eq!(store.put_attempts(), 0);
}

#[tokio::test]
async fn test_identical_names_resolve_to_distinct_keys() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::privileged();

    let request = UploadBatchRequest::new(
        vec![png("panel.png"), png("panel.png")],
        "maintenance-reports",
    );
    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await
        .unwrap();

    assert_eq!(result.urls.len(), 2);
    assert_ne!(result.urls[0], result.urls[1]);
    let keys = store.keys();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);
}

#[tokio::test]
async fn test_single_transfer_failure_is_isolated() {
    let store = Arc::new(MemoryObjectStore::failing_on(&["f3.png"]));
    let identity = ScriptedIdentity::privileged();
    let progress = Arc::new(RecordingProgress::new());

    let files = (1..=5).map(|i| png(&format!("f{}.png", i))).collect();
    let request = UploadBatchRequest::new(files, "maintenance-reports")
        .with_progress(progress.clone());

    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await
        .unwrap();

    assert_eq!(result.urls.len(), 4);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].name, "f3.png");
    assert!(result.failures[0].reason.contains("simulated transport error"));
    assert_eq!(store.put_attempts(), 5);

    // Progress advanced monotonically through every requested file.
    let reports = progress.reports();
    assert_eq!(reports.len(), 5);
    assert_eq!(reports.last(), Some(&(5, 5)));
    for window in reports.windows(2) {
        assert!(window[1].0 > window[0].0);
    }
}

#[tokio::test]
async fn test_empty_selection_contacts_nothing() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::privileged();

    let request = UploadBatchRequest::new(vec![], "maintenance-reports");
    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await
        .unwrap();

    assert!(result.urls.is_empty());
    assert!(result.failures.is_empty());
    assert_eq!(identity.consultations(), 0);
    assert_eq!(store.put_attempts(), 0);
}

#[tokio::test]
async fn test_all_invalid_files_return_data_not_error() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::privileged();

    let files = vec![
        RawFile::new("a.pdf", "application/pdf", pdf_bytes()),
        RawFile::new("b.txt", "text/plain", b"notes".to_vec()),
    ];
    let request = UploadBatchRequest::new(files, "maintenance-reports");

    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await
        .unwrap();

    assert!(result.urls.is_empty());
    assert_eq!(result.failures.len(), 2);
    assert_eq!(store.put_attempts(), 0);
}

#[tokio::test]
async fn test_all_valid_files_failing_raises_batch_error() {
    let store = Arc::new(MemoryObjectStore::failing_on(&["a.png", "b.png"]));
    let identity = ScriptedIdentity::privileged();

    let request = UploadBatchRequest::new(vec![png("a.png"), png("b.png")], "maintenance-reports");
    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await;

    match result {
        Err(BatchError::AllTransfersFailed {
            failed,
            first_reason,
        }) => {
            assert_eq!(failed, 2);
            assert!(first_reason.contains("simulated transport error"));
        }
        other => panic!("expected AllTransfersFailed, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_stored_objects_carry_metadata_and_resolved_keys() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::privileged();

    let request = UploadBatchRequest::new(
        vec![RawFile::new("Panel A Front.PNG", "image/png", flat_png())],
        "plants/helios-1/reports",
    );
    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await
        .unwrap();
    assert_eq!(result.urls.len(), 1);

    let keys = store.keys();
    assert_eq!(keys.len(), 1);
    let key = &keys[0];
    assert!(key.starts_with("plants/helios-1/reports/"));
    assert!(key.ends_with("_panel_a_front.png"));

    let object = store.object(key).unwrap();
    assert_eq!(object.original_name, "Panel A Front.PNG");
    assert_eq!(object.tenant_id, identity.tenant_id());
    assert_eq!(object.content_type, "image/png");
}

#[tokio::test]
async fn test_oversized_dimensions_are_transcoded_before_transfer() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::privileged();

    let original = noise_png(2400, 1350);
    let original_len = original.len();
    let request = UploadBatchRequest::new(
        vec![RawFile::new("site-overview.png", "image/png", original)],
        "maintenance-reports",
    );

    let result = orchestrator(store.clone())
        .upload_batch(&identity, request)
        .await
        .unwrap();
    assert_eq!(result.urls.len(), 1);

    let keys = store.keys();
    let object = store.object(&keys[0]).unwrap();
    assert_eq!(object.content_type, "image/jpeg");
    assert!(object.data.len() < original_len);
}

#[tokio::test]
async fn test_progress_counts_validation_rejects() {
    let store = Arc::new(MemoryObjectStore::new());
    let identity = ScriptedIdentity::privileged();
    let progress = Arc::new(RecordingProgress::new());

    let files = vec![
        RawFile::new("bad.pdf", "application/pdf", pdf_bytes()),
        png("ok.png"),
    ];
    let request =
        UploadBatchRequest::new(files, "maintenance-reports").with_progress(progress.clone());

    orchestrator(store)
        .upload_batch(&identity, request)
        .await
        .unwrap();

    assert_eq!(progress.reports(), vec![(1, 2), (2, 2)]);
}
