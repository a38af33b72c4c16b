//! Outbound Email
//!
//! Transactional mail rendered from Askama templates (HTML + plain text)
//! and delivered over SMTP with lettre. Callers treat delivery as
//! best-effort: a failed send is reported, never retried here.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur when composing or sending email
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

// ============================================================================
// Message + transport trait
// ============================================================================

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Mail delivery
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// SMTP settings
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// From header, e.g. `Marketplace <no-reply@example.com>`
    pub from_address: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// STARTTLS relay mailer
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        let from = config
            .from_address
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.from_address.clone()))?;

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(mail.to.clone()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(mail.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(mail.html),
                    ),
            )?;

        self.transport.send(message).await?;

        tracing::info!(to = %mail.to, subject = %mail.subject, "Email sent");
        Ok(())
    }
}

/// Development mailer: records the envelope in the log, never the body
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            "SMTP not configured; email logged instead of sent"
        );
        Ok(())
    }
}

/// Runtime-selected transport
#[derive(Clone)]
pub enum MailTransport {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl MailTransport {
    /// SMTP when configured, log-only otherwise
    pub fn from_config(config: Option<&SmtpConfig>) -> Result<Self, MailError> {
        match config {
            Some(config) => Ok(Self::Smtp(SmtpMailer::new(config)?)),
            None => Ok(Self::Log(LogMailer)),
        }
    }
}

impl Mailer for MailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        match self {
            Self::Smtp(m) => Mailer::send(m, mail).await,
            Self::Log(m) => Mailer::send(m, mail).await,
        }
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Vendor approval notice carrying the activation code
#[derive(Debug, Clone)]
pub struct VendorApprovalMail<'a> {
    pub name: &'a str,
    pub store_name: &'a str,
    pub activation_code: &'a str,
    pub valid_hours: i64,
    pub activation_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/vendor_approved.html")]
struct VendorApprovalHtml<'a> {
    mail: &'a VendorApprovalMail<'a>,
}

#[derive(Template)]
#[template(path = "email/vendor_approved.txt")]
struct VendorApprovalText<'a> {
    mail: &'a VendorApprovalMail<'a>,
}

impl VendorApprovalMail<'_> {
    pub fn compose(&self, to: &str) -> Result<OutgoingMail, MailError> {
        Ok(OutgoingMail {
            to: to.to_string(),
            subject: "Your vendor space has been approved".to_string(),
            text: VendorApprovalText { mail: self }.render()?,
            html: VendorApprovalHtml { mail: self }.render()?,
        })
    }
}

/// Vendor rejection notice
#[derive(Debug, Clone)]
pub struct VendorRejectionMail<'a> {
    pub name: &'a str,
    pub reason: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "email/vendor_rejected.html")]
struct VendorRejectionHtml<'a> {
    mail: &'a VendorRejectionMail<'a>,
}

#[derive(Template)]
#[template(path = "email/vendor_rejected.txt")]
struct VendorRejectionText<'a> {
    mail: &'a VendorRejectionMail<'a>,
}

impl VendorRejectionMail<'_> {
    pub fn compose(&self, to: &str) -> Result<OutgoingMail, MailError> {
        Ok(OutgoingMail {
            to: to.to_string(),
            subject: "About your vendor application".to_string(),
            text: VendorRejectionText { mail: self }.render()?,
            html: VendorRejectionHtml { mail: self }.render()?,
        })
    }
}

/// Signup email verification code
#[derive(Debug, Clone)]
pub struct EmailVerificationMail<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub valid_minutes: i64,
    pub confirm_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/verify_email.html")]
struct EmailVerificationHtml<'a> {
    mail: &'a EmailVerificationMail<'a>,
}

#[derive(Template)]
#[template(path = "email/verify_email.txt")]
struct EmailVerificationText<'a> {
    mail: &'a EmailVerificationMail<'a>,
}

impl EmailVerificationMail<'_> {
    pub fn compose(&self, to: &str) -> Result<OutgoingMail, MailError> {
        Ok(OutgoingMail {
            to: to.to_string(),
            subject: "Please verify your email address".to_string(),
            text: EmailVerificationText { mail: self }.render()?,
            html: EmailVerificationHtml { mail: self }.render()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_mail_contains_code() {
        let mail = VendorApprovalMail {
            name: "Ada",
            store_name: "Ada's Prints",
            activation_code: "4821",
            valid_hours: 24,
            activation_url: "http://localhost:3000/market/publication-space/verify-code",
        }
        .compose("ada@example.com")
        .unwrap();

        assert_eq!(mail.to, "ada@example.com");
        assert!(mail.text.contains("4821"));
        assert!(mail.html.contains("4821"));
        assert!(mail.text.contains("24 hours"));
        // HTML template escapes the apostrophe
        assert!(!mail.html.contains("Ada's Prints"));
    }

    #[test]
    fn test_rejection_reason_is_escaped() {
        let mail = VendorRejectionMail {
            name: "Bob",
            reason: Some("<script>alert(1)</script>"),
        }
        .compose("bob@example.com")
        .unwrap();

        assert!(!mail.html.contains("<script>"));
        assert!(mail.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_rejection_without_reason() {
        let mail = VendorRejectionMail {
            name: "Bob",
            reason: None,
        }
        .compose("bob@example.com")
        .unwrap();

        assert!(!mail.text.contains("Reason:"));
    }

    #[test]
    fn test_verification_mail() {
        let mail = EmailVerificationMail {
            name: "Cy",
            code: "583920",
            valid_minutes: 60,
            confirm_url: "http://localhost:3000/confirm-email",
        }
        .compose("cy@example.com")
        .unwrap();

        assert!(mail.text.contains("583920"));
        assert!(mail.html.contains("583920"));
    }

    #[tokio::test]
    async fn test_log_mailer_accepts() {
        let mail = OutgoingMail {
            to: "x@example.com".into(),
            subject: "s".into(),
            text: "t".into(),
            html: "h".into(),
        };
        assert!(Mailer::send(&LogMailer, mail).await.is_ok());
    }

    #[test]
    fn test_smtp_config_debug_redacts() {
        let config = SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: "mailer".into(),
            password: SecretString::from("hunter2"),
            from_address: "Marketplace <no-reply@example.com>".into(),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("hunter2"));
    }
}
