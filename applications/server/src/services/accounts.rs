/// Account management shared by the users API, the CLI and start-up seeding
use crate::config::SeedSettings;
use crate::error::Result;
use crate::services::AuthService;
use dolphin_core::{CreateUser, Role, UserForm, UserId};
use sqlx::SqlitePool;

/// Validate a user form, hash the password and insert the account
pub async fn create_user(pool: &SqlitePool, auth: &AuthService, form: &UserForm) -> Result<UserId> {
    let validated = form.validate()?;
    let password_hash = auth.hash_password(&validated.password)?;

    let email = validated.email.clone();
    let role = validated.role;
    let user_id = dolphin_storage::users::create(pool, validated.into_create_user(password_hash)).await?;

    tracing::info!("Created user {} ({}) with role {}", user_id, email, role);

    Ok(user_id)
}

/// Create the configured administrator if no account exists yet.
///
/// The seed password is taken as configured; the password policy applies
/// to accounts created through the API and CLI only.
pub async fn seed_admin(
    pool: &SqlitePool,
    auth: &AuthService,
    seed: &SeedSettings,
) -> Result<Option<UserId>> {
    if dolphin_storage::users::count(pool).await? > 0 {
        return Ok(None);
    }

    let password_hash = auth.hash_password(&seed.admin_password)?;
    let user_id = dolphin_storage::users::create(
        pool,
        CreateUser {
            firstname: seed.admin_firstname.clone(),
            lastname: seed.admin_lastname.clone(),
            email: seed.admin_email.clone(),
            password_hash,
            role: Role::Administrator,
        },
    )
    .await?;

    tracing::info!("Seeded administrator {}", seed.admin_email);

    Ok(Some(user_id))
}
