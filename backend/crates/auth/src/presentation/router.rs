//! Auth Routers
//!
//! Mounted by the API binary under `/api/auth`, `/api/user` and `/api/admin`.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use platform::mail::{MailTransport, Mailer};

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{require_auth, require_role};

/// State wired with the PostgreSQL repository and the runtime mail transport
pub type PgAuthAppState = AuthAppState<PgAuthRepository, MailTransport>;

/// `/api/auth`: signup, email confirmation, login, logout, me
pub fn auth_router<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me::<R, M>))
        .route_layer(from_fn_with_state(state.signer.clone(), require_auth));

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, M>))
        .route("/confirm-email", post(handlers::confirm_email::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .merge(protected)
        .with_state(state)
}

/// `/api/user`: self-service profile operations
pub fn user_router<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    Router::new()
        .route("/profile", put(handlers::update_profile::<R, M>))
        .route("/password", put(handlers::change_password::<R, M>))
        .route("/avatar", put(handlers::update_avatar::<R, M>))
        .route("/account", delete(handlers::delete_account::<R, M>))
        .route_layer(from_fn_with_state(state.signer.clone(), require_auth))
        .with_state(state)
}

/// `/api/admin`: user management, admin role required
pub fn admin_router<R, M>(state: AuthAppState<R, M>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    Router::new()
        .route("/users", get(handlers::list_users::<R, M>))
        .route("/users/{user_id}/role", put(handlers::update_user_role::<R, M>))
        .route("/users/{user_id}", delete(handlers::delete_user::<R, M>))
        .route_layer(from_fn_with_state(UserRole::Admin, require_role))
        .route_layer(from_fn_with_state(state.signer.clone(), require_auth))
        .with_state(state)
}
