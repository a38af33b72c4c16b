//! Confirm Email Use Case
//!
//! Checks the signup verification code and signs the user in.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{User, VerificationCheck};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct ConfirmEmailInput {
    pub email: String,
    pub code: String,
}

pub struct ConfirmEmailOutput {
    pub token: String,
    pub user: User,
}

impl std::fmt::Debug for ConfirmEmailOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmEmailOutput")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

pub struct ConfirmEmailUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ConfirmEmailUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: ConfirmEmailInput) -> AuthResult<ConfirmEmailOutput> {
        if input.email.trim().is_empty() || input.code.trim().is_empty() {
            return Err(AuthError::BadRequest(
                "Email and code are required".to_string(),
            ));
        }

        let email = Email::new(&input.email).map_err(|_| AuthError::UserNotFound)?;
        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        match user.confirm_email(&input.code, Utc::now()) {
            VerificationCheck::Verified => {}
            VerificationCheck::AlreadyVerified => return Err(AuthError::EmailAlreadyVerified),
            VerificationCheck::NoCode => return Err(AuthError::NoVerificationCode),
            VerificationCheck::Expired => return Err(AuthError::VerificationCodeExpired),
            VerificationCheck::Mismatch => return Err(AuthError::InvalidVerificationCode),
        }

        self.user_repo.update(&user).await?;

        let token = self
            .config
            .signer()
            .issue(user.user_id.as_i64(), user.role.code());

        tracing::info!(user_id = %user.user_id, "Email verified");

        Ok(ConfirmEmailOutput { token, user })
    }
}
