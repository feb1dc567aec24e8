//! Identity provider seam.
//!
//! The console owns sessions and tokens; the pipeline only reads the
//! caller's current identity through this trait. Implementations must not
//! cache authorization results across batches: the resolver re-reads every
//! source on each resolution.

use crate::error::AuthError;
use async_trait::async_trait;
use heliops_core::models::Profile;
use uuid::Uuid;

/// Read access to the caller's current identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn user_id(&self) -> Uuid;
    fn tenant_id(&self) -> Uuid;

    /// Force-refresh the identity token and return the fresh JWT.
    ///
    /// None when no fresh token could be obtained (expired session,
    /// provider unreachable); the resolver then falls back to profile
    /// sources.
    async fn refreshed_token(&self) -> Option<String>;

    /// Locally cached profile copy set during session bootstrap.
    fn cached_profile(&self) -> Option<Profile>;

    /// One remote fetch of the caller's profile record.
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AuthError>;
}

/// HTTP client for the console's profile directory.
#[derive(Clone)]
pub struct HttpProfileClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpProfileClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch a profile record; Ok(None) when the directory has no entry.
    pub async fn fetch(&self, user_id: Uuid) -> Result<Option<Profile>, AuthError> {
        let url = format!(
            "{}/profiles/{}",
            self.base_url.trim_end_matches('/'),
            user_id
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::ProfileFetch(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AuthError::ProfileFetch(format!(
                "Profile endpoint returned {}",
                response.status()
            )));
        }

        let profile = response
            .json::<Profile>()
            .await
            .map_err(|e| AuthError::ProfileFetch(format!("Failed to parse profile: {}", e)))?;

        Ok(Some(profile))
    }
}

/// Identity provider backed by fixed values.
///
/// Used by the CLI (token and profile from the environment) and as a
/// building block in tests.
pub struct StaticIdentity {
    user_id: Uuid,
    tenant_id: Uuid,
    token: Option<String>,
    cached: Option<Profile>,
    profile_client: Option<HttpProfileClient>,
}

impl StaticIdentity {
    pub fn new(user_id: Uuid, tenant_id: Uuid) -> Self {
        Self {
            user_id,
            tenant_id,
            token: None,
            cached: None,
            profile_client: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_cached_profile(mut self, profile: Profile) -> Self {
        self.cached = Some(profile);
        self
    }

    pub fn with_profile_client(mut self, client: HttpProfileClient) -> Self {
        self.profile_client = Some(client);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    async fn refreshed_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn cached_profile(&self) -> Option<Profile> {
        self.cached.clone()
    }

    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AuthError> {
        match &self.profile_client {
            Some(client) => client.fetch(user_id).await,
            None => Ok(None),
        }
    }
}
