//! Dolphin CRM Storage
//!
//! `SQLite` database layer for Dolphin CRM.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//!   (`users`, `contacts`, `notes`, `sessions`)
//! - **Parameterized**: every statement binds its inputs
//! - **Escape on write**: free text from users is HTML-escaped before it is
//!   inserted, so readers render stored values as-is
//! - **Scoped connections**: the pool hands out a connection per statement
//!   or transaction and takes it back on drop, error paths included
//!
//! # Example
//!
//! ```rust,no_run
//! use dolphin_core::ContactFilter;
//! use dolphin_storage::{contacts, create_pool, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://dolphin.db").await?;
//! run_migrations(&pool).await?;
//!
//! let recent = contacts::list(&pool, ContactFilter::All, 1).await?;
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod contacts;
pub mod notes;
pub mod sessions;
pub mod users;

pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://dolphin.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("Pool created");

    Ok(pool)
}

/// Current time as stored epoch milliseconds
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
