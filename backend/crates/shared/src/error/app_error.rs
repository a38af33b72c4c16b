//! Application Error
//!
//! [`AppError`] is what every domain error is converted into right before it
//! becomes a JSON response: `{ "error": ..., "action"?, "issues"?, ...details }`.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use super::kind::ErrorKind;

/// 入力検証で見つかった個別の問題（`issues` 配列の要素）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl FieldIssue {
    pub fn new(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Response-shaped error shared by the auth and vendor crates
///
/// ```rust
/// use kernel::error::{app_error::{AppError, FieldIssue}, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "Application not found");
/// assert_eq!(err.status_code(), 404);
///
/// let err = AppError::bad_request("Validation failed")
///     .with_issues(vec![FieldIssue::new("storeName", "Store name is required")]);
/// assert_eq!(err.to_body()["issues"][0]["field"], "storeName");
/// ```
#[derive(Debug, Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    /// Hint for the client, e.g. which page to go to next
    action: Option<Cow<'static, str>>,
    issues: Vec<FieldIssue>,
    /// Extra top-level keys such as `status`
    details: Vec<(Cow<'static, str>, serde_json::Value)>,
}

pub type AppResult<T> = Result<T, AppError>;

/// Keys owned by the body itself; details may not shadow them
const RESERVED_KEYS: [&str; 3] = ["error", "action", "issues"];

/// Substituted for the message of every 5xx body
const GENERIC_SERVER_MESSAGE: &str = "Internal server error";

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            issues: Vec::new(),
            details: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_issues(mut self, issues: Vec<FieldIssue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn with_detail(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_ref()) {
            self.details.push((key, value.into()));
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Internal message; for 5xx this differs from what the client sees
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }

    /// JSON body sent to the client
    pub fn to_body(&self) -> serde_json::Value {
        let message = if self.kind.is_server_error() {
            GENERIC_SERVER_MESSAGE
        } else {
            self.message()
        };

        let mut body = serde_json::Map::new();
        body.insert("error".into(), message.into());
        if let Some(action) = &self.action {
            body.insert("action".into(), action.as_ref().into());
        }
        if !self.issues.is_empty() {
            body.insert(
                "issues".into(),
                serde_json::to_value(&self.issues).unwrap_or_default(),
            );
        }
        for (key, value) in &self.details {
            body.insert(key.to_string(), value.clone());
        }
        serde_json::Value::Object(body)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.status_code())
    }
}

impl std::error::Error for AppError {}
