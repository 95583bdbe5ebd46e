//! `AuthUser` extractor — verifies the bearer token and injects context.
//!
//! Tokens are issued by the external identity service and verified here
//! with the shared HS256 secret; this backend never mints tokens.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use nusastay_core::config::AuthConfig;
use nusastay_core::error::{AppError, ErrorKind};
use nusastay_core::result::AppResult;
use nusastay_entity::user::ActorRole;
use nusastay_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Claims carried by an access token.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Subject: the user's ID.
    sub: Uuid,
    /// Actor role, `guest` or `admin`.
    role: String,
    /// Contact email, when the identity service includes one.
    #[serde(default)]
    email: Option<String>,
}

/// Verify a bearer token and build the request context.
pub fn decode_context(token: &str, config: &AuthConfig) -> AppResult<RequestContext> {
    let mut validation = Validation::new(Algorithm::HS256);
    if !config.issuer.is_empty() {
        validation.set_issuer(&[&config.issuer]);
    }

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        AppError::with_source(ErrorKind::Unauthorized, "Invalid or expired access token", e)
    })?;

    let role: ActorRole = data
        .claims
        .role
        .parse()
        .map_err(|_| AppError::unauthorized("Invalid role claim"))?;

    Ok(RequestContext::new(data.claims.sub, role, data.claims.email))
}

/// Extracted authenticated actor context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let ctx = decode_context(token, &state.config.auth)?;
        Ok(AuthUser(ctx))
    }
}
