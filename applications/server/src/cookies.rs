/// Cookie parsing and `Set-Cookie` values
use crate::error::{Result, ServerError};
use axum::http::{header, HeaderMap, HeaderValue};

/// Carries the signed session token
pub const SESSION_COOKIE: &str = "dolphin_session";

/// One-shot message shown on the next page load
pub const FLASH_COOKIE: &str = "dolphin_flash";

/// Value of cookie `name` from the request's `Cookie` headers
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(s) = value.to_str() else { continue };
        for part in s.split(';') {
            if let Some((k, v)) = part.trim().split_once('=') {
                if k == name {
                    return Some(v.to_string());
                }
            }
        }
    }
    None
}

/// Session token from `Authorization: Bearer` or the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
        .or_else(|| parse_cookie(headers, SESSION_COOKIE))
}

fn build(name: &str, value: &str, max_age: i64, secure: bool) -> Result<HeaderValue> {
    let secure = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{name}={value}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Lax{secure}"
    ))
    .map_err(|e| ServerError::Internal(format!("Invalid cookie value: {e}")))
}

/// `Set-Cookie` for a fresh session token
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Result<HeaderValue> {
    build(SESSION_COOKIE, token, max_age_secs, secure)
}

/// `Set-Cookie` for a flash key
pub fn flash_cookie(key: &str, secure: bool) -> Result<HeaderValue> {
    build(FLASH_COOKIE, key, 60, secure)
}

/// `Set-Cookie` that expires `name` immediately
pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue> {
    build(name, "deleted", 0, secure)
}
