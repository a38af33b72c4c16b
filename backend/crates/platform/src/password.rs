//! Secret Hashing
//!
//! Account passwords and vendor access PINs are both stored as Argon2id PHC
//! strings. An optional application-wide pepper is appended to the secret
//! before hashing and must be supplied again to verify.
//!
//! Passwords additionally pass through [`ClearTextPassword::new`], which
//! NFKC-normalizes them and enforces the length policy.

use std::fmt;

use argon2::{Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Shortest accepted password, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest accepted password, in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Passwords refused outright regardless of length
const DENYLIST: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyuiop",
    "iloveyou",
    "letmein1",
    "admin123",
    "welcome1",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Password cannot be blank")]
    Blank,

    #[error("Password contains control characters")]
    ControlCharacter,

    #[error("Password is too easy to guess")]
    Guessable,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Hashing failed: {0}")]
    Hashing(argon2::password_hash::Error),

    #[error("Stored hash is not a valid PHC string")]
    Malformed,
}

/// A password that satisfied the policy; wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize (NFKC) and check the policy
    ///
    /// Length is counted in characters after normalization, so `"ｐａｓｓ"`
    /// and `"pass"` are the same password.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let raw = Zeroizing::new(raw);
        let normalized: String = raw.nfkc().collect();
        let candidate = Self(normalized);

        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::Blank);
        }

        let len = candidate.0.chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }
        if len > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
            });
        }

        if candidate
            .0
            .chars()
            .any(|c| c.is_control() && c != '\t' && c != '\n')
        {
            return Err(PasswordPolicyError::ControlCharacter);
        }

        if is_guessable(&candidate.0) {
            return Err(PasswordPolicyError::Guessable);
        }

        Ok(candidate)
    }

    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<SecretHash, PasswordHashError> {
        hash_secret(self.0.as_bytes(), pepper)
    }

    pub fn matches(&self, stored: &SecretHash, pepper: Option<&[u8]>) -> bool {
        stored.verify(self.0.as_bytes(), pepper)
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// Argon2id PHC string as stored in the database
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    /// Accept a stored hash after checking it parses
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::Malformed)?;
        Ok(Self(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    /// Constant-time check of `secret` (+ pepper) against this hash
    pub fn verify(&self, secret: &[u8], pepper: Option<&[u8]>) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(&peppered(secret, pepper), &parsed)
            .is_ok()
    }

    /// Whether the hash was produced with today's algorithm and cost
    ///
    /// Hashes that are not current are re-hashed on the next successful sign-in.
    pub fn is_current(&self) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        if parsed.algorithm != argon2::Algorithm::Argon2id.ident() {
            return false;
        }
        Params::try_from(&parsed).is_ok_and(|params| {
            let current = Params::default();
            params.m_cost() == current.m_cost()
                && params.t_cost() == current.t_cost()
                && params.p_cost() == current.p_cost()
        })
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash([HASH])")
    }
}

/// Hash arbitrary secret bytes with Argon2id and a fresh 16-byte salt
pub fn hash_secret(secret: &[u8], pepper: Option<&[u8]>) -> Result<SecretHash, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(&peppered(secret, pepper), &salt)
        .map_err(PasswordHashError::Hashing)?;
    Ok(SecretHash(hash.to_string()))
}

fn peppered(secret: &[u8], pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
    let mut combined = Zeroizing::new(secret.to_vec());
    if let Some(p) = pepper {
        combined.extend_from_slice(p);
    }
    combined
}

fn is_guessable(password: &str) -> bool {
    let lower = password.to_lowercase();
    let mut chars = lower.chars();
    let first = chars.next();
    // "aaaaaaaa"
    if first.is_some() && chars.all(|c| Some(c) == first) {
        return true;
    }
    DENYLIST.contains(&lower.as_str())
}
