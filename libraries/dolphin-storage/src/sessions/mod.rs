//! Server-side sessions
//!
//! A row is a snapshot of the principal taken at login. Rows past
//! `expires_at` are treated as absent and purged lazily.

use chrono::{DateTime, Utc};
use dolphin_core::{time, Result, Role, Session};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

fn session_from_row(row: &SqliteRow) -> Result<Session> {
    let role: String = row.get("role");
    Ok(Session {
        id: row.get("id"),
        user_id: row.get("user_id"),
        role: role.parse::<Role>()?,
        firstname: row.get("firstname"),
        lastname: row.get("lastname"),
        email: row.get("email"),
        login_time: time::from_millis(row.get("login_time"))?,
        expires_at: time::from_millis(row.get("expires_at"))?,
    })
}

/// Persist a freshly issued session
pub async fn create(pool: &SqlitePool, session: &Session) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (id, user_id, role, firstname, lastname, email, login_time, expires_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(session.user_id)
    .bind(session.role.as_str())
    .bind(&session.firstname)
    .bind(&session.lastname)
    .bind(&session.email)
    .bind(session.login_time.timestamp_millis())
    .bind(session.expires_at.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(())
}

/// Look up a session that is still valid at `now`
pub async fn get(pool: &SqlitePool, id: &str, now: DateTime<Utc>) -> Result<Option<Session>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, role, firstname, lastname, email, login_time, expires_at
        FROM sessions
        WHERE id = ? AND expires_at > ?
        "#,
    )
    .bind(id)
    .bind(now.timestamp_millis())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(session_from_row).transpose()
}

/// Delete a session. Deleting an unknown id is not an error.
pub async fn delete(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Remove every session expired at `now`, returning how many went
pub async fn delete_expired(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now.timestamp_millis())
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        tracing::debug!("Purged {} expired sessions", result.rows_affected());
    }

    Ok(result.rows_affected())
}
