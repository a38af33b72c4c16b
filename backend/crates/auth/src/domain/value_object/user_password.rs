//! User Password Value Objects
//!
//! [`RawPassword`] is what the client typed; [`UserPassword`] is what the
//! `users.password_hash` column holds. Hashing lives in `platform::password`.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, PasswordPolicyError, SecretHash};

/// Password as submitted, already normalized and policy-checked
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw).map(Self).map_err(|e| {
            let action = match e {
                PasswordPolicyError::TooShort { .. } | PasswordPolicyError::Guessable => {
                    "Choose a longer or less common password"
                }
                PasswordPolicyError::TooLong { .. } => "Choose a shorter password",
                PasswordPolicyError::Blank => "Enter a password",
                PasswordPolicyError::ControlCharacter => "Remove non-printable characters",
            };
            AppError::bad_request(e.to_string()).with_action(action)
        })
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored password hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(SecretHash);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AppResult<Self> {
        raw.0
            .hash(pepper)
            .map(Self)
            .map_err(|e| AppError::internal(e.to_string()))
    }

    /// Load from the database; a malformed value is a server-side fault
    pub fn from_phc_string(phc: impl Into<String>) -> AppResult<Self> {
        SecretHash::from_phc_string(phc)
            .map(Self)
            .map_err(|_| AppError::internal("Invalid password hash in database"))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        raw.0.matches(&self.0, pepper)
    }

    /// True when sign-in should store a fresh hash
    pub fn needs_rehash(&self) -> bool {
        !self.0.is_current()
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_errors_become_bad_requests() {
        let err = RawPassword::new("short".to_string()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.message(), "Password must be at least 8 characters");
        assert_eq!(err.to_body()["action"], "Choose a longer or less common password");

        let err = RawPassword::new("password123".to_string()).unwrap_err();
        assert_eq!(err.message(), "Password is too easy to guess");
    }

    #[test]
    fn test_hash_verify_and_reload() {
        let raw = RawPassword::new("Poster-Shop-2024".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, Some(b"pepper")).unwrap();
        assert!(!stored.needs_rehash());

        let reloaded = UserPassword::from_phc_string(stored.as_phc_string()).unwrap();
        assert!(reloaded.verify(&raw, Some(b"pepper")));

        let wrong = RawPassword::new("Poster-Shop-2025".to_string()).unwrap();
        assert!(!reloaded.verify(&wrong, Some(b"pepper")));
    }

    #[test]
    fn test_corrupt_hash_is_internal() {
        let err = UserPassword::from_phc_string("not-a-hash").unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_debug_redacts() {
        let raw = RawPassword::new("Poster-Shop-2024".to_string()).unwrap();
        assert_eq!(format!("{raw:?}"), "RawPassword([REDACTED])");
    }
}
