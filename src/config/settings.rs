//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_FRONTEND_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SHAREHOLDERS_FILE, DEFAULT_SMTP_FROM,
    DEFAULT_SMTP_PORT, MIN_JWT_SECRET_LENGTH,
};

/// SMTP relay settings. Present only when `SMTP_HOST` is set.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    password: Option<String>,
    pub from: String,
}

impl SmtpSettings {
    /// Password for the SMTP relay, if any.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from", &self.from)
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub frontend_url: String,
    pub shareholders_file: String,
    pub smtp: Option<SmtpSettings>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("frontend_url", &self.frontend_url)
            .field("shareholders_file", &self.shareholders_file)
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let smtp = env::var("SMTP_HOST").ok().map(|host| SmtpSettings {
            host,
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            username: env::var("SMTP_USER").ok(),
            password: env::var("SMTP_PASS").ok(),
            from: env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_SMTP_FROM.to_string()),
        });

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            shareholders_file: env::var("SHAREHOLDERS_FILE")
                .unwrap_or_else(|_| DEFAULT_SHAREHOLDERS_FILE.to_string()),
            smtp,
        }
    }

    /// Build a configuration for tests and tooling without touching the environment.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            shareholders_file: DEFAULT_SHAREHOLDERS_FILE.to_string(),
            smtp: None,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Link sent to users who asked for a password reset.
    pub fn reset_password_url(&self, raw_token: &str) -> String {
        format!(
            "{}/reset-password/{}",
            self.frontend_url.trim_end_matches('/'),
            raw_token
        )
    }
}
