//! Actor role enumeration.
//!
//! Identity is owned by the external auth service; this backend only
//! distinguishes the two privilege levels the booking engine cares about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of the acting user, as carried in the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    /// A regular guest: may create, view, and cancel their own bookings.
    Guest,
    /// An operator: may act on any booking, including the privileged
    /// transitions (confirm, check-in, check-out).
    Admin,
}

impl ActorRole {
    /// Whether this role has operator privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = nusastay_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guest" => Ok(Self::Guest),
            "admin" => Ok(Self::Admin),
            _ => Err(nusastay_core::AppError::validation(format!(
                "Invalid actor role: '{s}'. Expected one of: guest, admin"
            ))),
        }
    }
}
