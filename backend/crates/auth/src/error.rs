//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{
    app_error::{AppError, FieldIssue},
    conversions::database_error_kind,
    kind::ErrorKind,
};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request body failed field validation
    #[error("Validation failed")]
    Validation(Vec<FieldIssue>),

    /// Malformed or incomplete request
    #[error("{0}")]
    BadRequest(String),

    /// Signup with an email that already has an account
    #[error("Email already registered")]
    EmailTaken,

    /// Profile update to an email owned by someone else
    #[error("Email already in use")]
    EmailInUse,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    #[error("Email already verified")]
    EmailAlreadyVerified,

    #[error("No verification code found")]
    NoVerificationCode,

    #[error("Verification code expired")]
    VerificationCodeExpired,

    #[error("Invalid verification code")]
    InvalidVerificationCode,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login before confirming the email address
    #[error("Email not verified. Please check your inbox and confirm your email.")]
    EmailNotVerified,

    /// No bearer token on a protected route
    #[error("Unauthorized")]
    MissingToken,

    /// Bad signature, malformed or expired token
    #[error("Invalid token")]
    InvalidToken,

    /// Authenticated but lacking the required role
    #[error("Forbidden: Admin access required")]
    Forbidden,

    #[error("Current password is incorrect")]
    IncorrectCurrentPassword,

    #[error("Invalid role")]
    InvalidRole,

    #[error("Cannot delete your own account")]
    CannotDeleteSelf,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::BadRequest(_)
            | AuthError::EmailTaken
            | AuthError::EmailInUse
            | AuthError::EmailAlreadyVerified
            | AuthError::NoVerificationCode
            | AuthError::VerificationCodeExpired
            | AuthError::InvalidVerificationCode
            | AuthError::IncorrectCurrentPassword
            | AuthError::InvalidRole
            | AuthError::CannotDeleteSelf => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials | AuthError::MissingToken | AuthError::InvalidToken => {
                ErrorKind::Unauthorized
            }
            AuthError::EmailNotVerified | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::Database(e) => database_error_kind(e),
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::Validation(issues) => {
                AppError::bad_request("Validation failed").with_issues(issues.clone())
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected invalid access token");
            }
            AuthError::Forbidden => {
                tracing::warn!("Role check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.is_client_error() {
            AuthError::BadRequest(err.message().to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}
