/// User domain types
use super::ids::UserId;
use crate::error::CrmError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Regular user
    #[default]
    Member,
    /// May manage users and see every contact
    Administrator,
}

impl Role {
    /// Stored and displayed name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "Member",
            Role::Administrator => "Administrator",
        }
    }

    /// CSS badge used by the users page
    pub fn badge_class(&self) -> &'static str {
        match self {
            Role::Member => "badge-member",
            Role::Administrator => "badge-admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Member" => Ok(Role::Member),
            "Administrator" => Ok(Role::Administrator),
            _ => Err(CrmError::validation("Invalid role selected.")),
        }
    }
}

/// User account as surfaced to callers.
///
/// The password hash is not a field here; it is only ever read through
/// the credential lookup in `dolphin-storage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Given name
    pub firstname: String,
    /// Family name
    pub lastname: String,
    /// Login email, unique
    pub email: String,
    /// Account role
    pub role: Role,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// "Firstname Lastname"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Data for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Given name
    pub firstname: String,
    /// Family name
    pub lastname: String,
    /// Login email
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Account role
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Member".parse::<Role>().unwrap(), Role::Member);
        assert_eq!("Administrator".parse::<Role>().unwrap(), Role::Administrator);
        assert_eq!(Role::Administrator.to_string(), "Administrator");
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Member);
    }

    #[test]
    fn test_role_serializes_as_display_name() {
        assert_eq!(
            serde_json::to_string(&Role::Administrator).unwrap(),
            "\"Administrator\""
        );
    }
}
