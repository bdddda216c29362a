//! Migrate command - applies, reverts or inspects the schema.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

fn migration_error(e: DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", e))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_error)?;
            tracing::info!("schema is up to date");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(migration_error)?;
            tracing::info!("last migration reverted");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await.map_err(migration_error)?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in &status {
                println!("{:<8} {}", if *applied { "applied" } else { "pending" }, name);
            }
            println!("{} of {} pending", pending, status.len());
        }
        MigrateAction::Fresh => {
            tracing::warn!("dropping all tables: users, client profiles and DMAT accounts");
            db.fresh_migrations().await.map_err(migration_error)?;
            tracing::info!("schema recreated");
        }
    }

    Ok(())
}
