//! User login identity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_CLIENT, ROLE_EMPLOYEE};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Employee,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Employees and admins manage records on behalf of clients
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Employee | UserRole::Admin)
    }

    /// Parse a role name, rejecting unknown values.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_ADMIN => Ok(UserRole::Admin),
            ROLE_EMPLOYEE => Ok(UserRole::Employee),
            ROLE_CLIENT => Ok(UserRole::Client),
            other => Err(AppError::validation(format!("Unknown role '{}'", other))),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        UserRole::parse(s).unwrap_or(UserRole::Client)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::Employee => write!(f, "{}", ROLE_EMPLOYEE),
            UserRole::Client => write!(f, "{}", ROLE_CLIENT),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    /// Weak back-reference to the client profile this login belongs to
    pub client_id: Option<Uuid>,
    /// Profiles an employee may work on
    pub assigned_clients: Vec<Uuid>,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Replace the stored hash; any pending reset token is invalidated.
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
        self.clear_reset_token();
        self.updated_at = Utc::now();
    }

    /// Remember a hashed reset token and its expiry.
    pub fn set_reset_token(&mut self, token_hash: String, expires: DateTime<Utc>) {
        self.reset_password_token = Some(token_hash);
        self.reset_password_expires = Some(expires);
        self.updated_at = Utc::now();
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expires = None;
    }

    /// Whether a stored reset token is still usable at `now`.
    pub fn reset_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.reset_password_token.is_some()
            && self.reset_password_expires.is_some_and(|exp| exp > now)
    }

    /// Whether an employee was assigned the given profile
    pub fn is_assigned_to(&self, profile_id: Uuid) -> bool {
        self.assigned_clients.contains(&profile_id)
    }
}

/// Data required to insert a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}

/// Generated login details, handed out exactly once.
#[derive(Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[schema(example = "asharao4821")]
    pub username: String,
    #[schema(example = "Xk7#pQ2mWn9z")]
    pub password: String,
    pub email: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .finish()
    }
}

/// Normalize an e-mail address for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Admin or self-service edit of a user.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    /// Admin only
    #[schema(example = "employee")]
    pub role: Option<String>,
    /// Admin only
    pub is_active: Option<bool>,
    /// Admin only
    pub assigned_clients: Option<Vec<Uuid>>,
}

impl UpdateUser {
    /// Whether the edit touches fields only an admin may change.
    pub fn touches_privileged_fields(&self) -> bool {
        self.role.is_some() || self.is_active.is_some() || self.assigned_clients.is_some()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "asharao4821")]
    pub username: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "Asha Rao")]
    pub name: String,
    pub phone_number: Option<String>,
    #[schema(example = "client")]
    pub role: String,
    pub is_active: bool,
    pub client_id: Option<Uuid>,
    pub assigned_clients: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            phone_number: user.phone_number,
            role: user.role.to_string(),
            is_active: user.is_active,
            client_id: user.client_id,
            assigned_clients: user.assigned_clients,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "asharao1234".into(),
            email: "asha@example.com".into(),
            name: "Asha Rao".into(),
            phone_number: None,
            password_hash: "hash".into(),
            role: UserRole::Client,
            is_active: true,
            client_id: None,
            assigned_clients: vec![],
            reset_password_token: None,
            reset_password_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!(UserRole::parse("Employee").unwrap(), UserRole::Employee);
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert!(UserRole::parse("root").is_err());
        assert_eq!(UserRole::from("unknown"), UserRole::Client);
    }

    #[test]
    fn test_reset_token_expiry() {
        let mut u = user();
        let now = Utc::now();
        assert!(!u.reset_token_valid_at(now));

        u.set_reset_token("abc".into(), now + Duration::minutes(60));
        assert!(u.reset_token_valid_at(now));
        assert!(!u.reset_token_valid_at(now + Duration::minutes(61)));

        u.set_password_hash("new-hash".into());
        assert!(u.reset_password_token.is_none());
        assert!(u.reset_password_expires.is_none());
    }

    #[test]
    fn test_response_hides_secrets() {
        let mut u = user();
        u.set_reset_token("secret-token".into(), Utc::now());
        let json = serde_json::to_string(&UserResponse::from(u)).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("\"username\":\"asharao1234\""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha@Example.COM "), "asha@example.com");
    }
}
