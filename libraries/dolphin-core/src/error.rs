/// Core error types for Dolphin CRM
use thiserror::Error;

/// Result type alias using `CrmError`
pub type Result<T> = std::result::Result<T, CrmError>;

/// Core error type for Dolphin CRM
#[derive(Error, Debug)]
pub enum CrmError {
    /// No valid session accompanied the request
    #[error("Not authenticated")]
    Unauthenticated,

    /// Authenticated, but not allowed to touch the target resource
    #[error("Permission denied: {0}")]
    Unauthorized(String),

    /// Login failed. Deliberately says nothing about which part was wrong.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// One message per offending field
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. "Contact"
        entity: String,
        /// Identifier that was looked up
        id: String,
    },

    /// User creation conflict on the unique email
    #[error("A user with this email already exists.")]
    DuplicateEmail,

    /// Underlying persistence failure. The message is for logs only.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CrmError {
    /// Create a validation error carrying a single message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Validation messages, if this is a validation error
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            Self::Validation(messages) => Some(messages),
            _ => None,
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for CrmError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
