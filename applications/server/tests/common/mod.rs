//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use dolphin_core::{UserForm, UserId};
use dolphin_server::{
    config::SeedSettings,
    services::{accounts, AuthService},
    state::AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test user credentials
pub mod fixtures {
    pub const ADMIN_EMAIL: &str = "admin@project2.com";
    pub const ADMIN_PASSWORD: &str = "password123";

    pub const MEMBER_PASSWORD: &str = "Member123";
}

/// Create a test database (real SQLite file) with migrations applied
pub async fn create_test_database() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let pool = dolphin_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    dolphin_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, temp_dir)
}

pub fn create_test_auth_service() -> AuthService {
    AuthService::new("test-secret-key".to_string(), 1)
}

pub fn default_seed() -> SeedSettings {
    dolphin_server::ServerConfig::default().seed
}

/// Full router over a fresh database with the default administrator seeded
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub admin_id: UserId,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let (pool, temp_dir) = create_test_database().await;
        let auth_service = Arc::new(create_test_auth_service());

        let admin_id = accounts::seed_admin(&pool, &auth_service, &default_seed())
            .await
            .expect("Failed to seed admin")
            .expect("Admin not seeded");

        let state = AppState::new(pool.clone(), Arc::clone(&auth_service), false);

        Self {
            router: dolphin_server::create_router(state),
            pool,
            auth_service,
            admin_id,
            _temp_dir: temp_dir,
        }
    }

    /// Create a member account directly
    pub async fn create_member(&self, firstname: &str, email: &str) -> UserId {
        let form = UserForm {
            firstname: Some(firstname.to_string()),
            lastname: Some("Member".to_string()),
            email: Some(email.to_string()),
            password: Some(fixtures::MEMBER_PASSWORD.to_string()),
            confirm_password: None,
            role: None,
        };
        accounts::create_user(&self.pool, &self.auth_service, &form)
            .await
            .expect("Failed to create member")
    }

    /// Log in over the API and return the session token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token in body").to_string()
    }

    pub async fn login_admin(&self) -> String {
        self.login(fixtures::ADMIN_EMAIL, fixtures::ADMIN_PASSWORD).await
    }

    /// Send a request with an optional bearer token and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    /// Like [`send`](Self::send), decoding the JSON response
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, token, body).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

/// Contact body with every required field
pub fn contact_body(firstname: &str, assigned_to: UserId) -> Value {
    serde_json::json!({
        "title": "Mr",
        "firstname": firstname,
        "lastname": "Halpert",
        "email": format!("{}@example.com", firstname.to_lowercase()),
        "telephone": "555-0199",
        "company": "Athlead",
        "type": "Sales Lead",
        "assigned_to": assigned_to.to_string(),
    })
}
