//! User accounts and credentials

use crate::now_millis;
use dolphin_core::{html, time, CreateUser, CrmError, Result, Role, User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// A user together with their stored password hash. Only the login path
/// reads this.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let role: String = row.get("role");
    Ok(User {
        id: row.get("id"),
        firstname: row.get("firstname"),
        lastname: row.get("lastname"),
        email: row.get("email"),
        role: role
            .parse::<Role>()
            .map_err(|_| CrmError::storage(format!("Unknown role in users table: {role}")))?,
        created_at: time::from_millis(row.get("created_at"))?,
    })
}

/// Create a user.
///
/// Names are escaped on write. Email uniqueness is checked up front, and a
/// unique-constraint violation from a concurrent insert maps to the same
/// [`CrmError::DuplicateEmail`].
pub async fn create(pool: &SqlitePool, user: CreateUser) -> Result<UserId> {
    if email_exists(pool, &user.email).await? {
        return Err(CrmError::DuplicateEmail);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO users (firstname, lastname, email, password_hash, role, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(html::escape(&user.firstname))
    .bind(html::escape(&user.lastname))
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(now_millis())
    .execute(pool)
    .await
    .map_err(|e| {
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            CrmError::DuplicateEmail
        } else {
            CrmError::from(e)
        }
    })?;

    Ok(result.last_insert_rowid())
}

/// Whether any user already uses `email` (exact match)
pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Whether `id` names an existing user
pub async fn exists(pool: &SqlitePool, id: UserId) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count") > 0)
}

/// Number of user accounts
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM users")
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, firstname, lastname, email, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Get all users, newest first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(
        r#"
        SELECT id, firstname, lastname, email, role, created_at
        FROM users
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter().map(user_from_row).collect()
}

/// Look up a user and their password hash by exact email
pub async fn find_credentials(pool: &SqlitePool, email: &str) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(
        r#"
        SELECT id, firstname, lastname, email, role, created_at, password_hash
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(UserCredentials {
            user: user_from_row(&row)?,
            password_hash: row.get("password_hash"),
        })
    })
    .transpose()
}
