//! Admin User Management

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};

pub struct AdminUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> AdminUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// All users, newest first
    pub async fn list(&self) -> AuthResult<Vec<User>> {
        self.user_repo.list().await
    }

    pub async fn update_role(&self, target: UserId, role_code: &str) -> AuthResult<User> {
        let role = UserRole::from_code(role_code).ok_or(AuthError::InvalidRole)?;

        let user = self
            .user_repo
            .update_role(target, role)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = %target, role = %role, "User role updated");
        Ok(user)
    }

    pub async fn delete(&self, actor: UserId, target: UserId) -> AuthResult<()> {
        if actor == target {
            return Err(AuthError::CannotDeleteSelf);
        }
        if !self.user_repo.delete_cascade(target).await? {
            return Err(AuthError::UserNotFound);
        }
        tracing::info!(admin_id = %actor, user_id = %target, "User deleted by admin");
        Ok(())
    }
}
