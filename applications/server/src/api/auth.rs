/// Authentication API routes
use crate::{
    cookies, error::Result, middleware::AuthenticatedSession, state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use dolphin_core::{Role, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The signed-in principal, as the login response reports it
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: SessionUser,
    pub token: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;

    let (session, token) = match state
        .auth_service
        .authenticate(&state.pool, req.email.trim(), &req.password)
        .await
    {
        Ok(opened) => opened,
        Err(e) => {
            tracing::info!("Failed login for {}", req.email.trim());
            return Err(e);
        }
    };

    tracing::info!("User {} logged in", session.user_id);

    let cookie = cookies::session_cookie(
        &token,
        state.auth_service.session_ttl().num_seconds(),
        state.secure_cookie,
    )?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            user: SessionUser {
                id: session.user_id,
                firstname: session.firstname,
                lastname: session.lastname,
                email: session.email,
                role: session.role,
            },
            token,
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Result<impl IntoResponse> {
    state.auth_service.destroy(&state.pool, &session).await?;

    tracing::info!("User {} logged out", session.user_id);

    let cookie = cookies::clear_cookie(cookies::SESSION_COOKIE, state.secure_cookie)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "success": true })),
    ))
}
