//! Bootstrap Admin
//!
//! Provisions the operator's administrator account at startup.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

pub struct BootstrapAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// What the bootstrap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    Promoted,
    AlreadyAdmin,
}

pub struct BootstrapAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> BootstrapAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Idempotent: an existing account keeps its password and is only promoted
    pub async fn execute(&self, input: BootstrapAdminInput) -> AuthResult<BootstrapOutcome> {
        let email = Email::new(&input.email)?;

        if let Some(user) = self.user_repo.find_by_email(&email).await? {
            if user.role.is_admin() {
                return Ok(BootstrapOutcome::AlreadyAdmin);
            }
            self.user_repo
                .update_role(user.user_id, UserRole::Admin)
                .await?;
            tracing::warn!(user_id = %user.user_id, "Existing account promoted to admin");
            return Ok(BootstrapOutcome::Promoted);
        }

        let name = UserName::new(&input.name)
            .map_err(|e| AuthError::BadRequest(format!("Admin name: {e}")))?;
        let raw = RawPassword::new(input.password)?;
        let password_hash = UserPassword::from_raw(&raw, self.config.pepper())?;

        let user = self
            .user_repo
            .create(NewUser::admin(name, email, password_hash))
            .await?;

        tracing::info!(user_id = %user.user_id, "Admin account created");
        Ok(BootstrapOutcome::Created)
    }
}
