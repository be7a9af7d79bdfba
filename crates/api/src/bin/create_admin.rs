//! Provision an operator account.
//!
//! Reads `DATABASE_URL`, `ADMIN_USERNAME` (default `admin`) and
//! `ADMIN_PASSWORD`, applies migrations, then creates the account or resets
//! the password of an existing one.

use anyhow::{bail, Context};
use doorctl_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use doorctl_core::roles::ROLE_ADMIN;
use doorctl_db::models::user::CreateUser;
use doorctl_db::repositories::UserRepo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doorctl_create_admin=info,doorctl_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;

    if username.trim().is_empty() {
        bail!("ADMIN_USERNAME must not be empty");
    }
    if let Err(msg) = validate_password_strength(&password, MIN_PASSWORD_LENGTH) {
        bail!(msg);
    }

    let pool = doorctl_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    doorctl_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

    match UserRepo::find_by_username(&pool, &username).await? {
        Some(existing) => {
            UserRepo::reset_credentials(&pool, existing.id, &password_hash, ROLE_ADMIN)
                .await?
                .context("Account disappeared during reset")?;
            tracing::info!(user_id = existing.id, %username, "Admin password reset");
        }
        None => {
            let user = UserRepo::create(
                &pool,
                &CreateUser {
                    username: username.clone(),
                    password_hash,
                    role: ROLE_ADMIN.to_string(),
                },
            )
            .await?;
            tracing::info!(user_id = user.id, %username, "Admin account created");
        }
    }

    Ok(())
}
