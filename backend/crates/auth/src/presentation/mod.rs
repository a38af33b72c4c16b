//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{AuthUser, require_auth, require_role};
pub use router::{PgAuthAppState, admin_router, auth_router, user_router};
