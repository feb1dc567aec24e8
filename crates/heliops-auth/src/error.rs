use thiserror::Error;

/// Authorization resolution errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Profile fetch failed: {0}")]
    ProfileFetch(String),
}

impl From<AuthError> for heliops_core::AppError {
    fn from(err: AuthError) -> Self {
        heliops_core::AppError::Unauthorized(err.to_string())
    }
}
