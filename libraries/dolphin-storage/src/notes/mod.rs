//! Notes: append-only comments on a contact

use crate::{contacts, now_millis};
use dolphin_core::{html, time, ContactId, CreateNote, CrmError, Note, NoteId, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_NOTE: &str = r#"
    SELECT n.id, n.contact_id, n.comment, n.created_by, n.created_at,
           u.firstname, u.lastname
    FROM notes n
    JOIN users u ON n.created_by = u.id
"#;

fn note_from_row(row: &SqliteRow) -> Result<Note> {
    let created_at = time::from_millis(row.get("created_at"))?;
    let firstname: String = row.get("firstname");
    let lastname: String = row.get("lastname");

    Ok(Note {
        id: row.get("id"),
        contact_id: row.get("contact_id"),
        comment: row.get("comment"),
        created_by: row.get("created_by"),
        // Names were escaped when the user was created.
        created_by_name: format!("{firstname} {lastname}"),
        created_at: time::format_datetime(&created_at),
        created_at_utc: created_at,
    })
}

/// Append a note and bump the parent contact's `updated_at`.
///
/// Fails with a validation error, writing nothing, when the trimmed comment
/// is empty or the contact does not exist. The comment is HTML-escaped
/// here, once; readers must not escape it again.
pub async fn add(pool: &SqlitePool, note: CreateNote) -> Result<Note> {
    let comment = note.comment.trim();
    if comment.is_empty() {
        return Err(CrmError::validation("Comment cannot be empty"));
    }

    let now = now_millis();
    let mut tx = pool.begin().await?;

    // Write first so the transaction holds the write lock from the start.
    if !contacts::touch(&mut tx, note.contact_id, now).await? {
        return Err(CrmError::validation("Contact not found"));
    }

    let result = sqlx::query(
        "INSERT INTO notes (contact_id, comment, created_by, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(note.contact_id)
    .bind(html::escape(comment))
    .bind(note.created_by)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get_by_id(pool, result.last_insert_rowid())
        .await?
        .ok_or_else(|| CrmError::storage("Failed to retrieve created note"))
}

/// Get note by ID
pub async fn get_by_id(pool: &SqlitePool, id: NoteId) -> Result<Option<Note>> {
    let row = sqlx::query(&format!("{SELECT_NOTE} WHERE n.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(note_from_row).transpose()
}

/// Notes on a contact, newest first
pub async fn list_for_contact(pool: &SqlitePool, contact_id: ContactId) -> Result<Vec<Note>> {
    let rows = sqlx::query(&format!(
        "{SELECT_NOTE} WHERE n.contact_id = ? ORDER BY n.created_at DESC, n.id DESC"
    ))
    .bind(contact_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(note_from_row).collect()
}
