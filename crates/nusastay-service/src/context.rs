//! Per-request actor context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use nusastay_entity::user::ActorRole;

/// The authenticated actor behind a request, extracted from the access
/// token by the HTTP layer.
///
/// `request_time` is captured once at extraction so every time-based
/// decision within one request (lead-time checks, transition stamps) sees
/// the same instant.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: Uuid,
    /// The acting user's role.
    pub role: ActorRole,
    /// The acting user's email, when the token carries one.
    pub email: Option<String>,
    /// The instant the request was authenticated.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Create a context stamped with the current time.
    pub fn new(user_id: Uuid, role: ActorRole, email: Option<String>) -> Self {
        Self {
            user_id,
            role,
            email,
            request_time: Utc::now(),
        }
    }

    /// Whether the actor has operator privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
