//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Share Registry - client holdings, review workflow and account provisioning
#[derive(Parser, Debug)]
#[command(name = "share-registry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create the first admin account
    CreateAdmin(CreateAdminArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to; falls back to SERVER_HOST
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on; falls back to SERVER_PORT
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the create-admin command
#[derive(Parser, Debug)]
pub struct CreateAdminArgs {
    #[arg(long, env = "ADMIN_EMAIL")]
    pub email: String,

    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub username: String,

    #[arg(long, env = "ADMIN_NAME", default_value = "Administrator")]
    pub name: String,

    /// At least 6 characters
    #[arg(long, env = "ADMIN_PASSWORD")]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_admin() {
        let cli = Cli::parse_from([
            "share-registry",
            "create-admin",
            "--email",
            "root@example.com",
            "--password",
            "secret123",
        ]);
        match cli.command {
            Commands::CreateAdmin(args) => {
                assert_eq!(args.email, "root@example.com");
                assert_eq!(args.username, "admin");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn serve_flags_are_optional() {
        let cli = Cli::parse_from(["share-registry", "-v", "serve", "--port", "8080"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
