/// Authenticated session
use super::ids::UserId;
use super::user::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side session, created at login and destroyed at logout or expiry.
///
/// Handlers receive this already resolved; nothing reads it from ambient
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session id, named by the signed session token
    pub id: String,
    pub user_id: UserId,
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub login_time: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// "Firstname Lastname"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }

    /// Whether the session has outlived its TTL at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
