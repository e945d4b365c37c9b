//! Dolphin CRM Core
//!
//! Platform-agnostic domain types, access control, and error handling for
//! Dolphin CRM.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Contact`, `Note`, `Session`
//! - **Access Control**: pure capability checks over a session and a resource
//! - **Validation**: form inputs turned into validated `Create*` values
//! - **Error Handling**: Unified `CrmError` and `Result` types
//!
//! Nothing in here performs I/O; storage lives in `dolphin-storage` and the
//! HTTP surface in `dolphin-server`.
//!
//! # Example
//!
//! ```rust
//! use dolphin_core::access::{self, Access};
//! use dolphin_core::types::{Role, Session};
//! use chrono::Utc;
//!
//! let session = Session {
//!     id: "sid".to_string(),
//!     user_id: 1,
//!     role: Role::Administrator,
//!     firstname: "Admin".to_string(),
//!     lastname: "User".to_string(),
//!     email: "admin@project2.com".to_string(),
//!     login_time: Utc::now(),
//!     expires_at: Utc::now(),
//! };
//!
//! assert_eq!(access::check_manage_users(&session), Access::Allowed);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod error;
pub mod html;
pub mod time;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use access::Access;
pub use error::{CrmError, Result};
pub use types::{
    Contact, ContactFilter, ContactId, ContactStats, ContactType, CreateContact, CreateNote,
    CreateUser, Note, NoteId, Role, Session, User, UserId,
};
pub use validation::{ContactForm, UserForm};
