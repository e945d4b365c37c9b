/// Note domain types
use super::ids::{ContactId, NoteId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Note attached to a contact, enriched with its author's name.
///
/// `comment` was HTML-escaped when it was written and is safe to render
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub contact_id: ContactId,
    pub comment: String,
    pub created_by: UserId,
    pub created_by_name: String,
    /// Human-formatted creation time, e.g. `Jan 5, 2025 at 3:04 PM`
    pub created_at: String,
    /// Raw creation time
    pub created_at_utc: DateTime<Utc>,
}

/// Data for appending a note. `comment` is raw user input.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub contact_id: ContactId,
    pub comment: String,
    pub created_by: UserId,
}
