//! Sign Up Use Case
//!
//! Creates an unverified account and mails the verification code.

use std::sync::Arc;

use kernel::error::app_error::FieldIssue;
use platform::mail::{EmailVerificationMail, Mailer};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<String>,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user: User,
    /// Whether the verification email was handed to the mailer
    pub email_sent: bool,
}

/// Sign up use case
pub struct SignUpUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> SignUpUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub fn new(user_repo: Arc<U>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let mut issues = Vec::new();

        let name = UserName::new(&input.name)
            .map_err(|e| issues.push(FieldIssue::new("name", e.to_string())))
            .ok();
        let email = Email::new(&input.email)
            .map_err(|e| issues.push(FieldIssue::new("email", e.message().to_string())))
            .ok();
        if input.password != input.confirm_password {
            issues.push(FieldIssue::new("confirmPassword", "Passwords don't match"));
        }
        let password = RawPassword::new(input.password)
            .map_err(|e| issues.push(FieldIssue::new("password", e.message().to_string())))
            .ok();

        let role = match input.role.as_deref() {
            None => Some(UserRole::default()),
            Some(code) => match UserRole::from_code(code) {
                Some(role) if role.is_self_assignable() => Some(role),
                _ => {
                    issues.push(FieldIssue::new("role", "Invalid role"));
                    None
                }
            },
        };

        let (Some(name), Some(email), Some(password), Some(role), true) =
            (name, email, password, role, issues.is_empty())
        else {
            return Err(AuthError::Validation(issues));
        };

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;

        let new_user = NewUser::signup(
            name,
            email,
            password_hash,
            role,
            self.config.verification_code_ttl(),
        );
        let user = self.user_repo.create(new_user).await?;

        tracing::info!(
            user_id = %user.user_id,
            role = %user.role,
            "User signed up"
        );

        let email_sent = self.send_verification(&user).await;

        Ok(SignUpOutput { user, email_sent })
    }

    async fn send_verification(&self, user: &User) -> bool {
        let Some(code) = &user.verification_code else {
            return false;
        };

        let confirm_url = self.config.link("confirm-email");
        let composed = EmailVerificationMail {
            name: user.name.as_str(),
            code: code.as_str(),
            valid_minutes: self.config.verification_code_ttl().num_minutes(),
            confirm_url: &confirm_url,
        }
        .compose(user.email.as_str());

        let result = match composed {
            Ok(mail) => self.mailer.send(mail).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "Verification email not sent");
                false
            }
        }
    }
}
