//! Error Kind
//!
//! The HTTP-facing classification every domain error is reduced to.

use serde::Serialize;

/// エラー種別（HTTP ステータスに一対一で対応）
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Forbidden.status_code(), 403);
/// assert_eq!(ErrorKind::Forbidden.to_string(), "Forbidden");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed input or a refused state transition
    BadRequest,
    /// Missing or invalid bearer token, wrong credentials
    Unauthorized,
    /// Authenticated but not allowed (role, vendor access)
    Forbidden,
    NotFound,
    InternalServerError,
    /// Database pool exhausted or unreachable
    ServiceUnavailable,
}

impl ErrorKind {
    pub const fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
            Self::ServiceUnavailable => 503,
        }
    }

    /// Canonical reason phrase
    pub const fn reason(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 5xx: logged at error level, message hidden from clients
    pub const fn is_server_error(self) -> bool {
        self.status_code() >= 500
    }

    pub const fn is_client_error(self) -> bool {
        !self.is_server_error()
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}
