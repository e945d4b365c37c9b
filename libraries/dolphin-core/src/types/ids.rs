/// ID types for Dolphin CRM entities
///
/// All entities use `SQLite` integer row ids.

/// User identifier
pub type UserId = i64;

/// Contact identifier
pub type ContactId = i64;

/// Note identifier
pub type NoteId = i64;
