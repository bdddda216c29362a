//! Create-admin command - bootstraps the first administrator.

use std::sync::Arc;

use validator::ValidateEmail;

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::Password;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::services::{UserManager, UserService};

/// Execute the create-admin command. Re-running with a known e-mail is a no-op.
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    if !args.email.validate_email() {
        return Err(AppError::validation("Invalid email format"));
    }
    Password::check_policy(&args.password)?;

    let database = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let users = UserManager::new(Arc::new(Persistence::new(database.get_connection())));
    let (admin, created) = users
        .ensure_admin(&args.email, &args.username, &args.name, &args.password)
        .await?;

    if created {
        tracing::info!(user_id = %admin.id, username = %admin.username, "Admin account created");
        println!("Admin created: {} <{}>", admin.username, admin.email);
    } else {
        tracing::warn!(user_id = %admin.id, "Account already exists, left unchanged");
        println!("Account already exists for {}; nothing changed", admin.email);
    }

    Ok(())
}
