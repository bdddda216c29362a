//! Authentication service: registration, login and password lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::credentials::{self, Claims};
use super::provisioner::{create_with_generated_username, generate_password};
use crate::config::Config;
use crate::domain::user::normalize_email;
use crate::domain::{Credentials, NewUser, Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Email, EmailSender, UnitOfWork};
use crate::jobs::dispatch_email;
use crate::utils::templates;

/// Argon2id hash of a random string, verified against when the login is
/// unknown so both paths cost the same.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$5gRUu6C1SWqk0gJ4Tn0ZBkbaOq0hXUrUmmQlkyvBYTQ";

/// Input for creating a login directly.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Generated when absent
    pub username: Option<String>,
    /// Generated when absent
    pub password: Option<String>,
    pub role: Option<UserRole>,
}

/// Token and profile returned after a successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a login. Non-client roles require an admin `actor`.
    async fn register(
        &self,
        registration: Registration,
        actor: Option<&User>,
    ) -> AppResult<(User, Credentials)>;

    /// Check credentials of an active user and issue a token.
    async fn login(&self, email_or_username: &str, password: &str) -> AppResult<LoginResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to an active user.
    async fn authenticate(&self, token: &str) -> AppResult<User>;

    /// Start a password reset. Unknown addresses are not revealed.
    async fn forgot_password(&self, email: &str) -> AppResult<()>;

    /// Finish a password reset with the raw token from the e-mail.
    async fn reset_password(&self, raw_token: &str, new_password: &str) -> AppResult<()>;

    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
    mailer: Arc<dyn EmailSender>,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config, mailer: Arc<dyn EmailSender>) -> Self {
        Self {
            uow,
            config,
            mailer,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        registration: Registration,
        actor: Option<&User>,
    ) -> AppResult<(User, Credentials)> {
        let name = registration.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let email = normalize_email(&registration.email);
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }

        let role = registration.role.unwrap_or(UserRole::Client);
        if role != UserRole::Client && !actor.is_some_and(|a| a.is_admin() && a.is_active) {
            return Err(AppError::Forbidden);
        }

        let users = self.uow.users();
        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::validation("Email already registered"));
        }

        let password = registration.password.unwrap_or_else(generate_password);
        let template = NewUser {
            username: String::new(),
            email: email.clone(),
            name: name.clone(),
            phone_number: registration
                .phone_number
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            password_hash: Password::new(&password)?.into_string(),
            role,
        };

        let user = match registration
            .username
            .map(|u| u.trim().to_lowercase())
            .filter(|u| !u.is_empty())
        {
            Some(username) => {
                if users.find_by_username(&username).await?.is_some() {
                    return Err(AppError::validation("Username already exists"));
                }
                users.create(NewUser { username, ..template }).await?
            }
            None => create_with_generated_username(users.as_ref(), &name, template).await?,
        };

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");

        let (subject, html) = templates::welcome_email(&user.name, &user.username, &email, &password);
        dispatch_email(self.mailer.clone(), Email::new(&email, subject, html));

        let credentials = Credentials {
            username: user.username.clone(),
            password,
            email,
        };
        Ok((user, credentials))
    }

    async fn login(&self, email_or_username: &str, password: &str) -> AppResult<LoginResponse> {
        let login = email_or_username.trim();
        if login.is_empty() || password.is_empty() {
            return Err(AppError::validation(
                "Email/username and password are required",
            ));
        }

        let user = self
            .uow
            .users()
            .find_by_login(login)
            .await?
            .filter(|u| u.is_active);

        // Verify even when the user is unknown so timing does not reveal it
        let stored_hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| DUMMY_HASH.to_string());
        let password_valid = Password::from_hash(stored_hash).verify(password);

        match user {
            Some(user) if password_valid => {
                let token = credentials::generate_token(&user, &self.config)?;
                tracing::info!(user_id = %user.id, "user logged in");
                Ok(LoginResponse {
                    token,
                    user: UserResponse::from(user),
                })
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        credentials::verify_token(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;
        self.uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or(AppError::Unauthorized)
    }

    async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::validation("Email is required"));
        }

        let users = self.uow.users();
        let Some(mut user) = users.find_by_email(&email).await? else {
            tracing::debug!("password reset requested for unknown address");
            return Ok(());
        };

        let token = credentials::issue_reset_token(Utc::now());
        user.set_reset_token(token.hash.clone(), token.expires_at);
        users.save(&user).await?;

        let url = self.config.reset_password_url(&token.raw);
        let (subject, html) = templates::password_reset_email(&user.name, &url);
        dispatch_email(self.mailer.clone(), Email::new(&user.email, subject, html));

        tracing::info!(user_id = %user.id, "password reset token issued");
        Ok(())
    }

    async fn reset_password(&self, raw_token: &str, new_password: &str) -> AppResult<()> {
        Password::check_policy(new_password)?;

        let users = self.uow.users();
        let mut user = users
            .find_by_reset_token(&credentials::hash_reset_token(raw_token.trim()))
            .await?
            .filter(|u| u.reset_token_valid_at(Utc::now()))
            .ok_or(AppError::InvalidOrExpiredToken)?;

        user.set_password_hash(Password::new(new_password)?.into_string());
        users.save(&user).await?;

        tracing::info!(user_id = %user.id, "password reset completed");
        Ok(())
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        Password::check_policy(new_password)?;

        let users = self.uow.users();
        let mut user = users.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;

        if !Password::from_hash(user.password_hash.clone()).verify(current_password) {
            return Err(AppError::WrongPassword);
        }

        user.set_password_hash(Password::new(new_password)?.into_string());
        users.save(&user).await?;

        tracing::info!(user_id = %user.id, "password changed");
        Ok(())
    }
}
