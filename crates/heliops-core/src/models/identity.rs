use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// User role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Supervisor,
    Technician,
    Viewer,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Supervisor => write!(f, "supervisor"),
            UserRole::Technician => write!(f, "technician"),
            UserRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "supervisor" => Ok(UserRole::Supervisor),
            "technician" => Ok(UserRole::Technician),
            "viewer" => Ok(UserRole::Viewer),
            _ => Err(anyhow::anyhow!("Invalid user role: {}", s)),
        }
    }
}

/// Caller profile record as stored by the console's user directory.
///
/// A copy of this record is cached locally during session bootstrap; the
/// authorization resolver reads that cache before reaching for the remote
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub display_name: String,
    pub role: UserRole,
}
