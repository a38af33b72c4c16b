//! Accounts
//!
//! Everything about a marketplace user that is not their vendor space:
//! signup with an emailed 6-digit code, password login, the profile, and
//! the admin user list. The bearer-token middleware defined here also
//! guards every vendor route.
//!
//! Layout: `domain` (user entity, value objects, `UserRepository`),
//! `application` (one use case per file), `infra` (Postgres) and
//! `presentation` (DTOs, handlers, middleware, routers).

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{admin_router, auth_router, user_router};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::user::*;
    pub use crate::domain::value_object::{
        email::Email, user_name::UserName, user_role::UserRole, vendor_status::VendorStatus,
    };
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
