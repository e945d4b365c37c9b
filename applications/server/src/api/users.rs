/// User management API routes (administrators only)
use crate::{
    error::Result, middleware::AuthenticatedSession, services::accounts, state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use dolphin_core::{access, User, UserForm};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Result<Json<UsersResponse>> {
    access::check_manage_users(&session).into_result()?;

    let users = dolphin_storage::users::get_all(&state.pool).await?;

    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    payload: std::result::Result<Json<UserForm>, JsonRejection>,
) -> Result<Json<Value>> {
    access::check_manage_users(&session).into_result()?;
    let Json(form) = payload?;

    let user_id = accounts::create_user(&state.pool, &state.auth_service, &form).await?;

    Ok(Json(json!({
        "success": true,
        "message": "User added successfully!",
        "user_id": user_id,
    })))
}
