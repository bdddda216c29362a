//! Bearer tokens and password-reset tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{Config, RESET_TOKEN_BYTES, RESET_TOKEN_TTL_MINUTES};
use crate::domain::User;
use crate::errors::AppResult;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub email: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Sign an HS256 token for `user`.
pub fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        role: user.role.to_string(),
        email: user.email.clone(),
        username: user.username.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;
    Ok(token)
}

/// Check signature and expiry, returning the claims.
pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// A freshly issued reset token. Only `hash` is persisted.
#[derive(Clone)]
pub struct ResetToken {
    pub raw: String,
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetToken")
            .field("raw", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// 32 random bytes, hex encoded, valid for an hour from `now`.
pub fn issue_reset_token(now: DateTime<Utc>) -> ResetToken {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);

    ResetToken {
        hash: hash_reset_token(&raw),
        raw,
        expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
    }
}

/// SHA-256 hex digest of a raw reset token.
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "asharao1234".into(),
            email: "asha@example.com".into(),
            name: "Asha Rao".into(),
            phone_number: None,
            password_hash: String::new(),
            role: UserRole::Employee,
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
    fn test_token_round_trip_carries_identity() {
        let config = Config::with_secret("a-test-secret-that-is-long-enough!!");
        let user = user();
        let token = generate_token(&user, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, "employee");
        assert_eq!(claims.username, "asharao1234");
        assert_eq!(claims.exp - claims.iat, 168 * 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = Config::with_secret("a-test-secret-that-is-long-enough!!");
        let other = Config::with_secret("another-secret-that-is-long-enough!");
        let token = generate_token(&user(), &issuer).unwrap();
        assert!(verify_token(&token, &other).is_err());
        assert!(verify_token("not-a-jwt", &issuer).is_err());
    }

    #[test]
    fn test_reset_token_shape() {
        let now = Utc::now();
        let token = issue_reset_token(now);
        assert_eq!(token.raw.len(), RESET_TOKEN_BYTES * 2);
        assert_eq!(token.hash, hash_reset_token(&token.raw));
        assert_ne!(token.hash, token.raw);
        assert_eq!(token.expires_at - now, Duration::minutes(60));
    }
}
