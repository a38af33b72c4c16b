//! Application Layer
//!
//! Use cases and application services.

pub mod admin_users;
pub mod bootstrap_admin;
pub mod config;
pub mod confirm_email;
pub mod profile;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use admin_users::AdminUsersUseCase;
pub use bootstrap_admin::{BootstrapAdminInput, BootstrapAdminUseCase, BootstrapOutcome};
pub use config::AuthConfig;
pub use confirm_email::{ConfirmEmailInput, ConfirmEmailOutput, ConfirmEmailUseCase};
pub use profile::{ChangePasswordInput, ProfileUseCase, UpdateProfileInput};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
