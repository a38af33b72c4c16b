//! Process Configuration
//!
//! Everything the binary reads from the environment, resolved once at
//! startup into the per-crate config structs.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use platform::mail::SmtpConfig;
use secrecy::SecretString;
use vendor::VendorConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Operator account created or promoted at startup
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct ApiConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub smtp: Option<SmtpConfig>,
    pub admin: Option<AdminBootstrap>,
    pub auth: AuthConfig,
    pub vendor: VendorConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be host:port")?;

        let frontend_origins = optional("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let app_base_url = optional("APP_BASE_URL");
        let password_pepper = optional("PASSWORD_PEPPER").map(String::into_bytes);

        let mut auth = match optional("TOKEN_SECRET") {
            Some(secret) => AuthConfig {
                token_secret: decode_secret(&secret)?,
                ..AuthConfig::default()
            },
            None if cfg!(debug_assertions) => {
                tracing::warn!("TOKEN_SECRET not set; using a random key for this process");
                AuthConfig::development()
            }
            None => bail!("TOKEN_SECRET must be set in release builds"),
        };
        auth.password_pepper = password_pepper.clone();

        let mut vendor = VendorConfig {
            pin_pepper: password_pepper,
            ..VendorConfig::default()
        };
        if let Some(url) = app_base_url {
            auth.app_base_url = url.clone();
            vendor.app_base_url = url;
        }

        Ok(Self {
            database_url,
            bind_addr,
            frontend_origins,
            upload_dir: optional("UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),
            smtp: smtp_from_env()?,
            admin: admin_from_env(),
            auth,
            vendor,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Base64 HMAC key, exactly 32 bytes
fn decode_secret(encoded: &str) -> anyhow::Result<Vec<u8>> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("TOKEN_SECRET must be base64")?;
    if bytes.len() != 32 {
        bail!("TOKEN_SECRET must decode to 32 bytes, got {}", bytes.len());
    }
    Ok(bytes)
}

/// SMTP is enabled only when the host is set
fn smtp_from_env() -> anyhow::Result<Option<SmtpConfig>> {
    let Some(host) = optional("SMTP_HOST") else {
        return Ok(None);
    };

    let port = match optional("SMTP_PORT") {
        Some(port) => port.parse().context("SMTP_PORT must be a port number")?,
        None => DEFAULT_SMTP_PORT,
    };

    Ok(Some(SmtpConfig {
        host,
        port,
        username: optional("SMTP_USERNAME").unwrap_or_default(),
        password: SecretString::from(optional("SMTP_PASSWORD").unwrap_or_default()),
        from_address: optional("MAIL_FROM").context("MAIL_FROM must be set with SMTP_HOST")?,
    }))
}

fn admin_from_env() -> Option<AdminBootstrap> {
    let (email, password) = (optional("ADMIN_EMAIL")?, optional("ADMIN_PASSWORD")?);
    Some(AdminBootstrap {
        name: optional("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
        email,
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_secret_length() {
        let key = general_purpose::STANDARD.encode([3u8; 32]);
        assert_eq!(decode_secret(&key).unwrap(), vec![3u8; 32]);

        let short = general_purpose::STANDARD.encode([3u8; 16]);
        assert!(decode_secret(&short).is_err());
        assert!(decode_secret("not base64!").is_err());
    }
}
