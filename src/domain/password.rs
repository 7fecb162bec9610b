//! Password value object - hashing, verification and the password policy.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::{COMMON_PASSWORDS, MIN_PASSWORD_LENGTH};
use crate::errors::{AppError, AppResult};

/// Password value object that handles hashing and verification.
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
    /// Hash a plain text password after checking the policy.
    ///
    /// # Errors
    /// Returns a validation error listing every policy violation.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        Self::validate(plain_text, None)?;
        Ok(Self {
            hash: Self::hash(plain_text)?,
        })
    }

    /// Same as [`Password::new`] but also rejects passwords resembling the email.
    pub fn for_user(plain_text: &str, email: &str) -> AppResult<Self> {
        Self::validate(plain_text, Some(email))?;
        Ok(Self {
            hash: Self::hash(plain_text)?,
        })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    /// Check the password policy without hashing.
    pub fn validate(plain_text: &str, email: Option<&str>) -> AppResult<()> {
        let mut problems = Vec::new();

        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            problems.push(format!(
                "This password is too short. It must contain at least {} characters.",
                MIN_PASSWORD_LENGTH
            ));
        }

        if !plain_text.is_empty() && plain_text.chars().all(|c| c.is_ascii_digit()) {
            problems.push("This password is entirely numeric.".to_string());
        }

        let lowered = plain_text.to_lowercase();
        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            problems.push("This password is too common.".to_string());
        }

        if let Some(email) = email {
            let email = email.to_lowercase();
            let local = email.split('@').next().unwrap_or_default();
            if lowered == email || (!local.is_empty() && lowered == local) {
                problems.push("The password is too similar to the email address.".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(problems.join(" ")))
        }
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_password_too_short() {
        assert!(Password::new("short").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("abcd1234x").is_ok());
        assert!(Password::new("k9#mzq2v").is_ok());
    }

    #[test]
    fn test_entirely_numeric_rejected() {
        let err = Password::validate("90817263544", None).unwrap_err();
        assert!(err.to_string().contains("entirely numeric"));
    }

    #[test]
    fn test_common_password_rejected_case_insensitive() {
        assert!(Password::validate("PassWord123", None).is_err());
    }

    #[test]
    fn test_similar_to_email_rejected() {
        assert!(Password::validate("engineer.one", Some("Engineer.One@example.com")).is_err());
        assert!(Password::validate("engineer.one", None).is_ok());
    }

    #[test]
    fn test_multiple_problems_reported_together() {
        let err = Password::validate("1234", None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("too short"));
        assert!(message.contains("entirely numeric"));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-phc-string".to_string()).verify("anything"));
    }
}
