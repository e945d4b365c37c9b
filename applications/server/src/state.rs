/// Shared application state
use crate::services::AuthService;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    /// Mark cookies `Secure`
    pub secure_cookie: bool,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth_service: Arc<AuthService>, secure_cookie: bool) -> Self {
        Self {
            pool,
            auth_service,
            secure_cookie,
        }
    }
}
