use anyhow::Context;
use math_learning_backend::{
    config::init_config,
    database::pool::{create_pool, run_migrations},
    models::user::UserRole,
    services::user_service::{NewUser, UserService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let full_name =
        std::env::var("ADMIN_FULL_NAME").unwrap_or_else(|_| "Administrator".to_string());
    let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    if password.len() < 6 {
        anyhow::bail!("ADMIN_PASSWORD must be at least 6 characters");
    }

    let pool = create_pool().await?;
    run_migrations(&pool).await?;
    let users = UserService::new(pool);

    if let Some(existing) = users.find_by_username(&username).await? {
        tracing::info!(user_id = existing.id, "admin account already exists, nothing to do");
        return Ok(());
    }

    let admin = users
        .create(NewUser {
            username: &username,
            email: &email,
            full_name: &full_name,
            password: &password,
            role: UserRole::Admin,
            grade: None,
            class_name: None,
            is_verified: true,
        })
        .await?;

    tracing::info!(user_id = admin.id, username = %admin.username, "admin account created");
    Ok(())
}
