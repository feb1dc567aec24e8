//! Layered storage-write authorization.
//!
//! Storage-side rules are coarse (role-based), but token propagation lags
//! profile changes, so three independent, decreasingly fresh sources are
//! consulted in order instead of trusting the token alone: fresh token
//! claim, locally cached profile, then one remote profile fetch. The chain
//! short-circuits on the first privileged role.

use crate::claims::decode_claims;
use crate::provider::IdentityProvider;
use heliops_core::models::UserRole;
use heliops_core::Config;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The trust source that granted write permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustSource {
    TokenClaim,
    CachedProfile,
    RemoteProfile,
}

impl Display for TrustSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TrustSource::TokenClaim => write!(f, "token claim"),
            TrustSource::CachedProfile => write!(f, "cached profile"),
            TrustSource::RemoteProfile => write!(f, "remote profile"),
        }
    }
}

/// Outcome of one authorization resolution.
///
/// Recomputed per batch; never cached across batches because the underlying
/// identity token can be revoked or changed mid-session.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    pub role: Option<UserRole>,
    pub source: Option<TrustSource>,
}

impl AuthorizationDecision {
    fn granted(role: UserRole, source: TrustSource) -> Self {
        Self {
            allowed: true,
            role: Some(role),
            source: Some(source),
        }
    }

    fn denied() -> Self {
        Self {
            allowed: false,
            role: None,
            source: None,
        }
    }
}

/// Resolves whether the current caller may write to storage.
pub struct AuthorizationResolver {
    jwt_secret: String,
    privileged_roles: Vec<UserRole>,
}

impl AuthorizationResolver {
    pub fn new(jwt_secret: impl Into<String>, privileged_roles: Vec<UserRole>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            privileged_roles,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone(), config.privileged_roles.clone())
    }

    fn is_privileged(&self, role: UserRole) -> bool {
        self.privileged_roles.contains(&role)
    }

    /// Resolve write permission for one batch.
    ///
    /// A source that yields nothing (failed refresh, invalid token, missing
    /// profile, unreachable directory) falls through to the next; only a
    /// privileged role short-circuits the chain.
    pub async fn resolve(&self, identity: &dyn IdentityProvider) -> AuthorizationDecision {
        if let Some(token) = identity.refreshed_token().await {
            match decode_claims(&token, &self.jwt_secret) {
                Ok(claims) => {
                    if let Some(role) = claims.role() {
                        if self.is_privileged(role) {
                            tracing::debug!(role = %role, "Storage write granted by token claim");
                            return AuthorizationDecision::granted(role, TrustSource::TokenClaim);
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Refreshed token rejected, falling back to profile sources");
                }
            }
        }

        if let Some(profile) = identity.cached_profile() {
            if self.is_privileged(profile.role) {
                tracing::debug!(role = %profile.role, "Storage write granted by cached profile");
                return AuthorizationDecision::granted(profile.role, TrustSource::CachedProfile);
            }
        }

        match identity.fetch_profile(identity.user_id()).await {
            Ok(Some(profile)) if self.is_privileged(profile.role) => {
                tracing::debug!(role = %profile.role, "Storage write granted by remote profile");
                return AuthorizationDecision::granted(profile.role, TrustSource::RemoteProfile);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed during authorization resolution");
            }
        }

        tracing::info!(user_id = %identity.user_id(), "Storage write denied: no trust source granted a privileged role");
        AuthorizationDecision::denied()
    }
}
