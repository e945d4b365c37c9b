/// Dolphin CRM server
use anyhow::Context;
use clap::{Parser, Subcommand};
use dolphin_core::UserForm;
use dolphin_server::{
    config::ServerConfig,
    create_router,
    services::{accounts, AuthService},
    state::AppState,
};
use sqlx::SqlitePool;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dolphin-server")]
#[command(about = "Dolphin CRM server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "DOLPHIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Create a new user
    AddUser {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Member or Administrator
        #[arg(short, long, default_value = "Member")]
        role: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dolphin_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from("config.toml"));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            serve(&config_path).await?;
        }
        Commands::AddUser {
            firstname,
            lastname,
            email,
            password,
            role,
        } => {
            let form = UserForm {
                firstname: Some(firstname),
                lastname: Some(lastname),
                email: Some(email),
                password: Some(password),
                confirm_password: None,
                role: Some(role),
            };
            add_user(&config_path, &form).await?;
        }
        Commands::ListUsers => {
            list_users(&config_path).await?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load_from(path)?;
    config.validate()?;
    Ok(config)
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<SqlitePool> {
    if let Some(dir) = sqlite_parent_dir(&config.storage.database_url) {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating database directory {}", dir.display()))?;
    }

    let pool = dolphin_storage::create_pool(&config.storage.database_url).await?;
    dolphin_storage::run_migrations(&pool).await?;
    Ok(pool)
}

/// Directory holding a file-backed SQLite database, if it has one
fn sqlite_parent_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.session_secret.clone(),
        config.auth.session_ttl_hours,
    )
}

async fn serve(config_path: &Path) -> anyhow::Result<()> {
    // Load configuration
    let config = load_config(config_path)?;

    tracing::info!("Starting Dolphin CRM");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = open_database(&config).await?;
    tracing::info!("Database connected");

    // Initialize auth service
    let auth_service = Arc::new(auth_service(&config));
    tracing::info!("Auth service initialized");

    if accounts::seed_admin(&pool, &auth_service, &config.seed)
        .await?
        .is_some()
    {
        tracing::info!("Users table was empty, administrator account created");
    }

    // Build application state
    let app_state = AppState::new(pool, auth_service, config.auth.secure_cookie);

    // Build router
    let app = create_router(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(config_path: &Path, form: &UserForm) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pool = open_database(&config).await?;
    let auth_service = auth_service(&config);

    match accounts::create_user(&pool, &auth_service, form).await {
        Ok(user_id) => {
            println!("Created user {user_id}");
            Ok(())
        }
        Err(dolphin_server::ServerError::Crm(err)) if err.validation_messages().is_some() => {
            for message in err.validation_messages().unwrap_or_default() {
                eprintln!("  {message}");
            }
            anyhow::bail!("User not created")
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_users(config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pool = open_database(&config).await?;

    let users = dolphin_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} <{}> [{}]",
            user.id,
            user.full_name(),
            user.email,
            user.role
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://./data/dolphin.db"),
            Some(PathBuf::from("./data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://dolphin.db"), None);
        assert_eq!(sqlite_parent_dir("sqlite://:memory:"), None);
        assert_eq!(sqlite_parent_dir("postgres://x"), None);
    }
}
