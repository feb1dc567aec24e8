//! Identity token claim decoding.

use crate::error::AuthError;
use heliops_core::models::UserRole;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid, // user_id
    pub tenant_id: Uuid,
    pub role: String, // "admin", "supervisor", "technician" or "viewer"
    pub exp: i64,     // expiration timestamp
    pub iat: i64,     // issued at timestamp
}

impl TokenClaims {
    /// Parsed role claim; None when the claim names an unknown role.
    pub fn role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }
}

/// Decode and verify an identity token (HS256).
pub fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 30;

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(data.claims)
}
