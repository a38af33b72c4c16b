//! Framework Bridges
//!
//! Classification of database failures and the HTTP rendering of [`AppError`].

#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

/// Status class for a database failure
///
/// Connection-level trouble (pool timeout, I/O, Postgres classes 53 and 57)
/// is reported as 503 so clients can retry; everything else is a 500.
#[cfg(feature = "sqlx")]
pub fn database_error_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db) => match db.code() {
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            Some(code) if code.starts_with("53") || code.starts_with("57") => {
                ErrorKind::ServiceUnavailable
            }
            _ => ErrorKind::InternalServerError,
        },
        _ => ErrorKind::InternalServerError,
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.to_body())).into_response()
    }
}
