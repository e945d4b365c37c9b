/// Authentication middleware
use crate::{cookies, error::ServerError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use dolphin_core::{CrmError, Session};

/// The resolved session, inserted by the middleware.
/// Can be used as an extractor in handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

impl AuthenticatedSession {
    pub fn session(&self) -> &Session {
        &self.0
    }
}

/// Resolve the session carried by `headers`, if any
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let token = cookies::session_token(headers);
    state
        .auth_service
        .current(&state.pool, token.as_deref())
        .await
}

/// JSON routes: no session means 401
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let session = resolve_session(&state, request.headers())
        .await
        .ok_or(CrmError::Unauthenticated)?;

    request.extensions_mut().insert(AuthenticatedSession(session));

    Ok(next.run(request).await)
}

/// Page routes: no session means a redirect to the login form
pub async fn page_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session) = resolve_session(&state, request.headers()).await else {
        return Redirect::to("/login").into_response();
    };

    request.extensions_mut().insert(AuthenticatedSession(session));

    next.run(request).await
}

/// Implement FromRequestParts so AuthenticatedSession can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedSession
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedSession>()
            .cloned()
            .ok_or_else(|| CrmError::Unauthenticated.into())
    }
}
