/// Storage-specific errors
use thiserror::Error;

/// Errors from setting up the database. Query failures surface as
/// `dolphin_core::CrmError` instead.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for dolphin_core::CrmError {
    fn from(err: StorageError) -> Self {
        dolphin_core::CrmError::storage(err.to_string())
    }
}
