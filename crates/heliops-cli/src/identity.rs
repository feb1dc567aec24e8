//! Caller identity for command-line runs.

use anyhow::Result;
use heliops_auth::{decode_claims, HttpProfileClient, StaticIdentity};
use heliops_core::Config;
use std::env;

/// Build the CLI's identity from the environment.
///
/// `HELIOPS_TOKEN` carries the identity token; the caller's user and tenant
/// ids are taken from its claims. When `PROFILE_SERVICE_URL` is configured,
/// the identity can also fall back to a remote profile fetch during
/// authorization.
pub fn identity_from_env(config: &Config) -> Result<StaticIdentity> {
    let token = env::var("HELIOPS_TOKEN")
        .map_err(|_| anyhow::anyhow!("HELIOPS_TOKEN must be set"))?;
    let claims = decode_claims(&token, &config.jwt_secret)?;

    let mut identity = StaticIdentity::new(claims.sub, claims.tenant_id).with_token(token);
    if let Some(url) = &config.profile_service_url {
        identity = identity.with_profile_client(HttpProfileClient::new(url.clone()));
    }

    Ok(identity)
}
