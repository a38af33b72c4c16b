//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::crypto::random_bytes;
use platform::token::{DEFAULT_TOKEN_TTL, TokenSigner};

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for access tokens (32 bytes)
    pub token_secret: Vec<u8>,
    /// Access token lifetime (1 hour)
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Lifetime of the signup verification code (1 hour)
    pub verification_code_ttl: Duration,
    /// Frontend origin used for links in outgoing mail
    pub app_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: vec![0u8; 32],
            token_ttl: DEFAULT_TOKEN_TTL,
            password_pepper: None,
            verification_code_ttl: Duration::from_secs(3600),
            app_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Build the token signer for this configuration
    pub fn signer(&self) -> TokenSigner {
        TokenSigner::new(self.token_secret.clone(), self.token_ttl)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Verification code lifetime as a chrono duration
    pub fn verification_code_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.verification_code_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(1))
    }

    /// `<app_base_url>/<path>`
    pub fn link(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.app_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("verification_code_ttl", &self.verification_code_ttl)
            .field("app_base_url", &self.app_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_joins_cleanly() {
        let config = AuthConfig {
            app_base_url: "https://shop.example.com/".into(),
            ..Default::default()
        };
        assert_eq!(config.link("/confirm-email"), "https://shop.example.com/confirm-email");
    }

    #[test]
    fn test_random_secret_differs() {
        assert_ne!(
            AuthConfig::with_random_secret().token_secret,
            AuthConfig::with_random_secret().token_secret
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::development()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("pepper\""));
    }
}
