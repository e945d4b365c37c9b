/// Authentication service - sessions, session tokens and password handling
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use dolphin_core::{CrmError, Session};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Verified against when the email is unknown, so a miss costs as much as
/// a wrong password.
/// Upper bound on session lifetime: one year
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| bcrypt::hash("dolphin-timing-guard", bcrypt::DEFAULT_COST).ok());

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    session_ttl: Duration,
}

/// Session token payload. The token only names the server-side session;
/// everything else is read from the session row.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub sid: String, // Session ID
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl AuthService {
    /// `session_ttl_hours` is capped at [`MAX_SESSION_TTL_HOURS`]
    pub fn new(secret: String, session_ttl_hours: u64) -> Self {
        let hours = i64::try_from(session_ttl_hours.min(MAX_SESSION_TTL_HOURS))
            .unwrap_or_default();
        Self {
            secret,
            session_ttl: Duration::hours(hours),
        }
    }

    /// Session lifetime, also the cookie `Max-Age`
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Check credentials and open a session.
    ///
    /// Returns the session and the signed token naming it. Unknown email and
    /// wrong password both fail with [`CrmError::InvalidCredentials`].
    pub async fn authenticate(
        &self,
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<(Session, String)> {
        let Some(credentials) = dolphin_storage::users::find_credentials(pool, email).await? else {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = bcrypt::verify(password, hash);
            }
            return Err(CrmError::InvalidCredentials.into());
        };

        // A malformed stored hash is a failed login, not a server error.
        let verified = bcrypt::verify(password, &credentials.password_hash).unwrap_or(false);
        if !verified {
            return Err(CrmError::InvalidCredentials.into());
        }

        let now = Utc::now();
        dolphin_storage::sessions::delete_expired(pool, now).await?;

        let user = credentials.user;
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id,
            role: user.role,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            login_time: now,
            expires_at: now + self.session_ttl,
        };
        dolphin_storage::sessions::create(pool, &session).await?;

        let token = self.create_session_token(&session)?;
        Ok((session, token))
    }

    /// Resolve the session named by `token`.
    ///
    /// Missing token, bad signature, expired token and unknown or expired
    /// session row all come back as `None`.
    pub async fn current(&self, pool: &SqlitePool, token: Option<&str>) -> Option<Session> {
        let claims = match self.verify_session_token(token?) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Session token rejected: {}", e);
                return None;
            }
        };

        match dolphin_storage::sessions::get(pool, &claims.sid, Utc::now()).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Session lookup failed: {}", e);
                None
            }
        }
    }

    /// End a session. Its token stops resolving immediately.
    pub async fn destroy(&self, pool: &SqlitePool, session: &Session) -> Result<()> {
        dolphin_storage::sessions::delete(pool, &session.id).await?;
        Ok(())
    }

    /// Sign a token naming `session`, expiring with it
    pub fn create_session_token(&self, session: &Session) -> Result<String> {
        let claims = Claims {
            sub: session.user_id.to_string(),
            sid: session.id.clone(),
            exp: session.expires_at.timestamp(),
            iat: session.login_time.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify and decode a session token
    pub fn verify_session_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dolphin_core::Role;

    fn session(ttl: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: "session-123".to_string(),
            user_id: 7,
            role: Role::Member,
            firstname: "Kelly".to_string(),
            lastname: "Kapoor".to_string(),
            email: "kelly@example.com".to_string(),
            login_time: now,
            expires_at: now + ttl,
        }
    }

    #[test]
    fn test_password_hashing() {
        let auth = AuthService::new("secret".to_string(), 24);
        let password = "My_secure_passw0rd";

        let hash = auth.hash_password(password).unwrap();
        assert!(auth.verify_password(password, &hash).unwrap());
        assert!(!auth.verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_token_names_session() {
        let auth = AuthService::new("secret".to_string(), 24);
        let session = session(Duration::hours(1));

        let token = auth.create_session_token(&session).unwrap();
        let claims = auth.verify_session_token(&token).unwrap();
        assert_eq!(claims.sid, "session-123");
        assert_eq!(claims.sub, "7");
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let auth = AuthService::new("secret".to_string(), 24);
        let other = AuthService::new("other-secret".to_string(), 24);

        let token = auth.create_session_token(&session(Duration::hours(1))).unwrap();
        assert!(other.verify_session_token(&token).is_err());
        assert!(auth.verify_session_token("not-a-token").is_err());
    }

    #[test]
    fn test_session_ttl_capped() {
        let auth = AuthService::new("secret".to_string(), u64::MAX);
        assert_eq!(auth.session_ttl(), Duration::hours(MAX_SESSION_TTL_HOURS as i64));

        let auth = AuthService::new("secret".to_string(), 24);
        assert_eq!(auth.session_ttl(), Duration::hours(24));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = AuthService::new("secret".to_string(), 24);
        let token = auth.create_session_token(&session(Duration::hours(-2))).unwrap();
        assert!(auth.verify_session_token(&token).is_err());
    }
}
