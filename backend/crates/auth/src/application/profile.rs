//! Profile Use Cases
//!
//! Self-service operations on the caller's own account.

use std::sync::Arc;

use kernel::error::app_error::FieldIssue;
use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct UpdateProfileInput {
    pub name: String,
    pub email: String,
}

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct ProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Current user
    pub async fn me(&self, user_id: UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update_profile(
        &self,
        user_id: UserId,
        input: UpdateProfileInput,
    ) -> AuthResult<User> {
        let mut issues = Vec::new();
        let name = UserName::new(&input.name)
            .map_err(|e| issues.push(FieldIssue::new("name", e.to_string())))
            .ok();
        let email = Email::new(&input.email)
            .map_err(|e| issues.push(FieldIssue::new("email", e.message().to_string())))
            .ok();
        let (Some(name), Some(email)) = (name, email) else {
            return Err(AuthError::Validation(issues));
        };

        let mut user = self.me(user_id).await?;

        if email != user.email
            && let Some(owner) = self.user_repo.find_by_email(&email).await?
            && owner.user_id != user_id
        {
            return Err(AuthError::EmailInUse);
        }

        user.set_profile(name, email);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: UserId,
        input: ChangePasswordInput,
    ) -> AuthResult<()> {
        let new_password = RawPassword::new(input.new_password).map_err(|e| {
            AuthError::Validation(vec![FieldIssue::new(
                "newPassword",
                e.message().to_string(),
            )])
        })?;

        let mut user = self.me(user_id).await?;

        let current_ok = RawPassword::new(input.current_password)
            .map(|current| user.password_hash.verify(&current, self.config.pepper()))
            .unwrap_or(false);
        if !current_ok {
            return Err(AuthError::IncorrectCurrentPassword);
        }

        user.set_password(UserPassword::from_raw(&new_password, self.config.pepper())?);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    pub async fn update_avatar(&self, user_id: UserId, avatar: Option<String>) -> AuthResult<User> {
        let avatar = avatar
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| AuthError::BadRequest("Avatar URL is required".to_string()))?;

        let mut user = self.me(user_id).await?;
        user.set_avatar(avatar);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user_id, "Avatar updated");
        Ok(user)
    }

    /// Delete the caller's account with all dependent vendor records
    pub async fn delete_account(&self, user_id: UserId) -> AuthResult<()> {
        if !self.user_repo.delete_cascade(user_id).await? {
            return Err(AuthError::UserNotFound);
        }
        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
