//! JSON Request Bodies
//!
//! [`JsonBody`] reads a JSON body like `axum::Json` but reports every
//! failure (wrong content type, malformed JSON, missing or mistyped fields)
//! as a 400 in the [`AppError`] shape, so clients never see axum's plain
//! text rejections.
//!
//! `Option<JsonBody<T>>` treats an empty body as `None`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, OptionalFromRequest, Request};
use axum::http::{HeaderMap, header};
use serde::de::DeserializeOwned;

use crate::error::app_error::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

fn is_json(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// `Ok(None)` for an empty (or all-whitespace) body
async fn read<T, S>(req: Request, state: &S) -> Result<Option<T>, AppError>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    let json = is_json(req.headers());
    let bytes = <Bytes as FromRequest<S>>::from_request(req, state)
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    if !json {
        return Err(AppError::bad_request(
            "Expected request with `Content-Type: application/json`",
        ));
    }

    Json::<T>::from_bytes(&bytes)
        .map(|Json(value)| Some(value))
        .map_err(|e| AppError::bad_request(e.body_text()))
}

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        read(req, state)
            .await?
            .map(Self)
            .ok_or_else(|| AppError::bad_request("Request body is required"))
    }
}

impl<T, S> OptionalFromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        Ok(read(req, state).await?.map(Self))
    }
}
