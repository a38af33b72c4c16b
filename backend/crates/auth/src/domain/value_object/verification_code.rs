//! Email Verification Code
//!
//! Six-digit code mailed at signup and checked by `confirm-email`.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{constant_time_eq, random_digits};

/// Number of digits in a verification code
pub const VERIFICATION_CODE_LENGTH: u32 = 6;

/// Issued verification code with its expiry
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode {
    code: String,
    expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Draw a fresh code valid for `ttl` from `now`
    pub fn issue(now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            code: random_digits(VERIFICATION_CODE_LENGTH),
            expires_at: now + ttl,
        }
    }

    /// Restore from database
    pub fn from_db(code: String, expires_at: DateTime<Utc>) -> Self {
        Self { code, expires_at }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn matches(&self, supplied: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), supplied.trim().as_bytes())
    }
}

impl std::fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationCode")
            .field("code", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
