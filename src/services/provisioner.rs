//! Account provisioning for client profiles.
//!
//! Every profile gets a `client` login. When the owner's e-mail already
//! belongs to a user that user is reused; otherwise a username/password
//! pair is generated and returned to the caller exactly once.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use uuid::Uuid;

use crate::config::{
    DEFAULT_USERNAME_STEM, GENERATED_PASSWORD_LENGTH, MAX_USERNAME_ATTEMPTS, PASSWORD_ALPHABET,
    PLACEHOLDER_EMAIL_DOMAIN,
};
use crate::domain::user::normalize_email;
use crate::domain::{Credentials, NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, UserRepository};

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]").unwrap());

/// Outcome of provisioning a login for a profile owner.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub user_id: Uuid,
    /// `false` when an existing user was reused
    pub created: bool,
    pub credentials: Option<Credentials>,
    /// Profile a reused login already belongs to
    pub linked_profile: Option<Uuid>,
}

#[async_trait]
pub trait AccountProvisioner: Send + Sync {
    /// Find or create the `client` login for `name` / `email`.
    async fn provision(
        &self,
        name: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> AppResult<Provisioned>;

    /// Undo a login created by `provision`.
    async fn revoke(&self, user_id: Uuid) -> AppResult<()>;
}

/// Lower-cased name stripped to `[a-z0-9]`, or the default stem.
pub fn username_stem(name: &str) -> String {
    let stem = NON_ALPHANUMERIC.replace_all(&name.to_lowercase(), "").into_owned();
    if stem.is_empty() {
        DEFAULT_USERNAME_STEM.to_string()
    } else {
        stem
    }
}

/// Stem plus a random four digit suffix.
pub fn candidate_username(stem: &str) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..=9999);
    format!("{}{}", stem, suffix)
}

/// Random password drawn from an alphabet without look-alike characters.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| PASSWORD_ALPHABET[rng.gen_range(0..PASSWORD_ALPHABET.len())] as char)
        .collect()
}

/// Address synthesized for owners who gave none.
pub fn placeholder_email(name: &str) -> String {
    format!(
        "{}.{}@{}",
        username_stem(name),
        Utc::now().timestamp_millis(),
        PLACEHOLDER_EMAIL_DOMAIN
    )
}

/// Insert `template` under a generated username derived from `name`.
///
/// Taken candidates are skipped; a unique violation on the username is
/// retried with a fresh suffix. Gives up with `Conflict` after
/// `MAX_USERNAME_ATTEMPTS`.
pub async fn create_with_generated_username(
    users: &dyn UserRepository,
    name: &str,
    template: NewUser,
) -> AppResult<User> {
    let stem = username_stem(name);

    for attempt in 1..=MAX_USERNAME_ATTEMPTS {
        let candidate = candidate_username(&stem);
        if users.find_by_username(&candidate).await?.is_some() {
            tracing::debug!(%candidate, attempt, "generated username taken");
            continue;
        }

        let new_user = NewUser {
            username: candidate.clone(),
            ..template.clone()
        };
        match users.create(new_user).await {
            Ok(user) => return Ok(user),
            Err(AppError::Conflict(entity)) => {
                // Lost a race on the username; anything else is a real duplicate
                if users.find_by_username(&candidate).await?.is_none() {
                    return Err(AppError::Conflict(entity));
                }
                tracing::debug!(%candidate, attempt, "generated username raced");
            }
            Err(e) => return Err(e),
        }
    }

    tracing::warn!(%stem, "no free username after {} attempts", MAX_USERNAME_ATTEMPTS);
    Err(AppError::conflict("Username"))
}

/// Provisioner backed by the user repository.
pub struct Provisioner<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Provisioner<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccountProvisioner for Provisioner<U> {
    async fn provision(
        &self,
        name: &str,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> AppResult<Provisioned> {
        let users = self.uow.users();
        let email = email
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| placeholder_email(name));

        if let Some(existing) = users.find_by_email(&email).await? {
            tracing::info!(user_id = %existing.id, "reusing existing login for profile owner");
            return Ok(Provisioned {
                user_id: existing.id,
                created: false,
                credentials: None,
                linked_profile: existing.client_id,
            });
        }

        let password = generate_password();
        let template = NewUser {
            username: String::new(),
            email: email.clone(),
            name: name.trim().to_string(),
            phone_number: phone_number
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from),
            password_hash: Password::new(&password)?.into_string(),
            role: UserRole::Client,
        };

        let user = create_with_generated_username(users.as_ref(), name, template).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "client login provisioned");

        Ok(Provisioned {
            user_id: user.id,
            created: true,
            credentials: Some(Credentials {
                username: user.username,
                password,
                email,
            }),
            linked_profile: None,
        })
    }

    async fn revoke(&self, user_id: Uuid) -> AppResult<()> {
        self.uow.users().delete(user_id).await
    }
}
