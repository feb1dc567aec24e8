//! In-memory fakes for the pipeline's collaborators.

use async_trait::async_trait;
use heliops_auth::{AuthError, IdentityProvider, TokenClaims};
use heliops_core::models::Profile;
use heliops_core::StorageBackend;
use heliops_ingest::ProgressSink;
use heliops_storage::{ObjectMetadata, ObjectStore, PutReceipt, StorageError, StorageResult};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use super::TEST_JWT_SECRET;

/// Object captured by the in-memory store.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub original_name: String,
    pub tenant_id: Uuid,
}

/// In-memory object store with scripted per-file failures.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    put_attempts: AtomicUsize,
    fail_names: Vec<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every put whose original file name is in `names`.
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            fail_names: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn put_attempts(&self) -> usize {
        self.put_attempts.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        metadata: &ObjectMetadata,
    ) -> StorageResult<PutReceipt> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);

        if self.fail_names.contains(&metadata.original_name) {
            return Err(StorageError::UploadFailed(
                "simulated transport error".to_string(),
            ));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                original_name: metadata.original_name.clone(),
                tenant_id: metadata.tenant_id,
            },
        );

        Ok(PutReceipt {
            key: key.to_string(),
            url: format!("https://files.test/{}", key),
        })
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn presigned_get_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        Ok(format!("https://files.test/{}", key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Identity fake counting every consultation, for "provider untouched"
/// assertions.
pub struct ScriptedIdentity {
    user_id: Uuid,
    tenant_id: Uuid,
    token: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedIdentity {
    /// Caller whose fresh token carries a privileged role.
    pub fn privileged() -> Self {
        Self::with_role("supervisor")
    }

    /// Caller whose only role, from every source, is unprivileged.
    pub fn unprivileged() -> Self {
        Self::with_role("viewer")
    }

    fn with_role(role: &str) -> Self {
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id,
            tenant_id,
            role: role.to_string(),
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap();

        Self {
            user_id,
            tenant_id,
            token: Some(token),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub fn consultations(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentity {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    async fn refreshed_token(&self) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token.clone()
    }

    fn cached_profile(&self) -> Option<Profile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }

    async fn fetch_profile(&self, _user_id: Uuid) -> Result<Option<Profile>, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

/// Progress sink recording every report.
#[derive(Default)]
pub struct RecordingProgress {
    reports: Mutex<Vec<(usize, usize)>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(usize, usize)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        self.reports.lock().unwrap().push((completed, total));
    }
}
