//! Auth Middleware
//!
//! Route layers for bearer authentication and role checks.
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/users", get(list_users))
//!     .route_layer(from_fn_with_state(UserRole::Admin, require_role))
//!     .route_layer(from_fn_with_state(signer, require_auth));
//! ```
//! Layers run bottom-up, so `require_auth` executes before `require_role`.

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::{Request, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::token::{TokenSigner, extract_bearer};
use std::sync::Arc;

use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;

/// Authenticated caller, inserted into request extensions by [`require_auth`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AuthError::MissingToken)
    }
}

/// Middleware that requires a valid bearer token
pub async fn require_auth(
    State(signer): State<Arc<TokenSigner>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_bearer(req.headers()).ok_or(AuthError::MissingToken)?;

    let claims = signer.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "Access token rejected");
        AuthError::InvalidToken
    })?;
    let role = UserRole::from_code(&claims.role).ok_or(AuthError::InvalidToken)?;

    req.extensions_mut().insert(AuthUser {
        user_id: UserId::from_i64(claims.sub),
        role,
    });

    Ok(next.run(req).await)
}

/// Middleware that requires the caller to hold `required`
///
/// Must be layered inside [`require_auth`].
pub async fn require_role(
    State(required): State<UserRole>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or(AuthError::MissingToken)?;

    if user.role != required {
        tracing::warn!(user_id = %user.user_id, role = %user.role, required = %required, "Role check failed");
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}
