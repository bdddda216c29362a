//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{mailer_from_settings, Database, JsonFileShareholders};
use crate::services::Services;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let database = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let mailer = mailer_from_settings(config.smtp.as_ref())?;
    let shareholders = Arc::new(JsonFileShareholders::new(config.shareholders_file.clone()));
    tracing::info!(file = %config.shareholders_file, "Shareholder store ready");

    let host = args.host.unwrap_or_else(|| config.server_host.clone());
    let port = args.port.unwrap_or(config.server_port);

    let services = Services::from_connection(
        database.get_connection(),
        shareholders,
        mailer,
        config,
    );
    let app_state = AppState::from_services(&services, Arc::new(database));

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
