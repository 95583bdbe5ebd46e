//! Token verification configuration.
//!
//! NusaStay does not issue tokens itself; the external identity service
//! signs access tokens that this backend only verifies.

use serde::{Deserialize, Serialize};

/// JWT verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 secret used to verify access tokens.
    pub jwt_secret: String,
    /// Expected token issuer (empty = not checked).
    #[serde(default)]
    pub issuer: String,
}
