//! Password value object.
//!
//! Wraps an Argon2id PHC string. The plain text never leaves the
//! constructor; only the hash is stored or compared.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hashed password.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password after checking the length policy.
    ///
    /// # Errors
    /// Returns a validation error when shorter than the minimum length.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        Self::check_policy(plain_text)?;
        Ok(Self {
            hash: Self::hash(plain_text)?,
        })
    }

    /// Length policy shared by registration, reset and change flows.
    pub fn check_policy(plain_text: &str) -> AppResult<()> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Constant-time check of a candidate against this hash.
    /// A malformed stored hash never matches.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                false
            }
        }
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let password = Password::new("s3cret!").unwrap();

        assert_ne!(password.as_str(), "s3cret!");
        assert!(password.as_str().starts_with("$argon2"));
        assert!(password.verify("s3cret!"));
        assert!(!password.verify("s3cret?"));
    }

    #[test]
    fn test_restored_hash_verifies() {
        let hash = Password::new("restore-me").unwrap().into_string();
        assert!(Password::from_hash(hash).verify("restore-me"));
    }

    #[test]
    fn test_salts_differ() {
        let a = Password::new("same-pass").unwrap();
        let b = Password::new("same-pass").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_length_policy() {
        assert!(Password::new("12345").is_err());
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!Password::from_hash("plain".into()).verify("plain"));
    }
}
