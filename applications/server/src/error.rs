/// Server error types
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dolphin_core::CrmError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Crm(#[from] CrmError),

    /// Contact missing or not visible to the caller. Both render the same.
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<dolphin_storage::StorageError> for ServerError {
    fn from(err: dolphin_storage::StorageError) -> Self {
        ServerError::Crm(err.into())
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        ServerError::BadRequest("Invalid JSON data".to_string())
    }
}

/// Either a single message or a list of per-field messages
enum Body {
    Message(String),
    Errors(Vec<String>),
}

impl ServerError {
    fn status_and_body(self) -> (StatusCode, Body) {
        match self {
            ServerError::Crm(err) => match err {
                CrmError::Unauthenticated => (
                    StatusCode::UNAUTHORIZED,
                    Body::Message("Not authenticated".to_string()),
                ),
                CrmError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, Body::Message(err.to_string()))
                }
                CrmError::Unauthorized(reason) => (StatusCode::FORBIDDEN, Body::Message(reason)),
                CrmError::Validation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, Body::Errors(errors)),
                CrmError::NotFound { ref entity, .. } => (
                    StatusCode::NOT_FOUND,
                    Body::Message(format!("{entity} not found")),
                ),
                CrmError::DuplicateEmail => {
                    (StatusCode::CONFLICT, Body::Errors(vec![err.to_string()]))
                }
                CrmError::Storage(ref detail) => {
                    tracing::error!("Storage error: {}", detail);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Body::Message("Database error occurred. Please try again.".to_string()),
                    )
                }
            },
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, Body::Message(msg)),
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Body::Message(msg)),
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT error: {:?}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    Body::Message("Not authenticated".to_string()),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Body::Message("An error occurred. Please try again.".to_string()),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Body::Message("An error occurred. Please try again.".to_string()),
                )
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Body::Message("An error occurred. Please try again.".to_string()),
                )
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        let body = match body {
            Body::Message(message) => json!({ "success": false, "message": message }),
            Body::Errors(errors) => json!({ "success": false, "errors": errors }),
        };

        (status, Json(body)).into_response()
    }
}
