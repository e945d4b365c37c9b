/// Server configuration
use crate::{
    error::{Result, ServerError},
    services::auth::MAX_SESSION_TTL_HOURS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default = "default_seed")]
    pub seed: SeedSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Signs session tokens
    #[serde(default)]
    pub session_secret: String,

    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,

    /// Adds `Secure` to the session cookie. Turn on behind HTTPS.
    #[serde(default)]
    pub secure_cookie: bool,
}

/// Administrator created at start-up when the users table is empty
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedSettings {
    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_admin_firstname")]
    pub admin_firstname: String,

    #[serde(default = "default_admin_lastname")]
    pub admin_lastname: String,
}

impl ServerConfig {
    /// Load configuration from `config.toml` and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from `path` (skipped if missing), then apply
    /// `DOLPHIN_*` environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(PathBuf::from(path)));
        }

        // Override with environment variables (prefixed with DOLPHIN_)
        settings = settings.add_source(
            config::Environment::with_prefix("DOLPHIN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.session_secret.trim().is_empty() {
            return Err(ServerError::Config(
                "Session secret is required (set DOLPHIN_AUTH__SESSION_SECRET)".to_string(),
            ));
        }

        if self.auth.session_ttl_hours == 0 {
            return Err(ServerError::Config(
                "Session TTL must be at least one hour".to_string(),
            ));
        }

        if self.auth.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(ServerError::Config(format!(
                "Session TTL must be at most {MAX_SESSION_TTL_HOURS} hours"
            )));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/dolphin.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        session_secret: String::new(),
        session_ttl_hours: default_session_ttl_hours(),
        secure_cookie: false,
    }
}

fn default_session_ttl_hours() -> u64 {
    24
}

fn default_seed() -> SeedSettings {
    SeedSettings {
        admin_email: default_admin_email(),
        admin_password: default_admin_password(),
        admin_firstname: default_admin_firstname(),
        admin_lastname: default_admin_lastname(),
    }
}

fn default_admin_email() -> String {
    "admin@project2.com".to_string()
}

fn default_admin_password() -> String {
    "password123".to_string()
}

fn default_admin_firstname() -> String {
    "Admin".to_string()
}

fn default_admin_lastname() -> String {
    "User".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            seed: default_seed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.database_url, "sqlite://./data/dolphin.db");
        assert_eq!(config.auth.session_ttl_hours, 24);
        assert!(!config.auth.secure_cookie);
        assert_eq!(config.seed.admin_email, "admin@project2.com");
    }

    #[test]
    fn test_validate_requires_secret_and_ttl() {
        let mut config = ServerConfig::default();
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.auth.session_secret = "s3cret".to_string();
        assert!(config.validate().is_ok());

        config.auth.session_ttl_hours = 0;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.auth.session_ttl_hours = MAX_SESSION_TTL_HOURS;
        assert!(config.validate().is_ok());

        config.auth.session_ttl_hours = MAX_SESSION_TTL_HOURS + 1;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.auth.session_ttl_hours = u64::MAX;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[auth]\nsession_secret = \"from-file\"\nsession_ttl_hours = 2"
        )
        .unwrap();

        let config = ServerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.session_secret, "from-file");
        assert_eq!(config.auth.session_ttl_hours, 2);
        assert_eq!(config.seed.admin_firstname, "Admin");
    }
}
