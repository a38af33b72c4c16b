//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kernel::extract::JsonBody;
use kernel::id::UserId;
use platform::mail::Mailer;
use platform::token::TokenSigner;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AdminUsersUseCase, ChangePasswordInput, ConfirmEmailInput, ConfirmEmailUseCase,
    ProfileUseCase, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase, UpdateProfileInput,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, ConfirmEmailRequest, MessageResponse, SignInRequest, SignUpRequest,
    SignUpResponse, TokenResponse, UpdateAvatarRequest, UpdateProfileRequest, UpdateRoleRequest,
    UserResponse,
};
use crate::presentation::middleware::AuthUser;

/// Shared state for auth, user and admin handlers
pub struct AuthAppState<R, M>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
    pub signer: Arc<TokenSigner>,
}

impl<R, M> Clone for AuthAppState<R, M>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
            signer: self.signer.clone(),
        }
    }
}

impl<R, M> AuthAppState<R, M>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub fn new(repo: R, mailer: M, config: AuthConfig) -> Self {
        let signer = Arc::new(config.signer());
        Self {
            repo: Arc::new(repo),
            mailer: Arc::new(mailer),
            config: Arc::new(config),
            signer,
        }
    }
}

// ============================================================================
// Sign Up / Confirm Email
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R, M>(
    State(state): State<AuthAppState<R, M>>,
    JsonBody(req): JsonBody<SignUpRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            role: req.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "User created. Please check your email for the verification code.",
            user: UserResponse::from(&output.user),
            email_sent: output.email_sent,
        }),
    ))
}

/// POST /api/auth/confirm-email
pub async fn confirm_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    JsonBody(req): JsonBody<ConfirmEmailRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ConfirmEmailUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(ConfirmEmailInput {
            email: req.email,
            code: req.code,
        })
        .await?;

    Ok(Json(TokenResponse {
        message: "Email verified",
        token: output.token,
        user: UserResponse::from(&output.user),
    }))
}

// ============================================================================
// Sign In / Sign Out
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    JsonBody(req): JsonBody<SignInRequest>,
) -> AuthResult<Json<TokenResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        message: "Login successful",
        token: output.token,
        user: UserResponse::from(&output.user),
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client discards its copy.
pub async fn logout(user: AuthUser) -> Json<MessageResponse> {
    tracing::info!(user_id = %user.user_id, "User signed out");
    Json(MessageResponse {
        message: "Logout successful",
    })
}

/// GET /api/auth/me
pub async fn me<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthUser,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let user = use_case.me(user.user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

// ============================================================================
// Profile
// ============================================================================

/// PUT /api/user/profile
pub async fn update_profile<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthUser,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let updated = use_case
        .update_profile(
            user.user_id,
            UpdateProfileInput {
                name: req.name,
                email: req.email,
            },
        )
        .await?;
    Ok(Json(UserResponse::from(&updated)))
}

/// PUT /api/user/password
pub async fn change_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthUser,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .change_password(
            user.user_id,
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}

/// PUT /api/user/avatar
pub async fn update_avatar<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthUser,
    JsonBody(req): JsonBody<UpdateAvatarRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    let updated = use_case.update_avatar(user.user_id, req.avatar).await?;
    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /api/user/account
pub async fn delete_account<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthUser,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let use_case = ProfileUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete_account(user.user_id).await?;
    Ok(Json(MessageResponse {
        message: "Account deleted successfully",
    }))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/users
pub async fn list_users<R, M>(
    State(state): State<AuthAppState<R, M>>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let users = AdminUsersUseCase::new(state.repo.clone()).list().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// PUT /api/admin/users/{user_id}/role
pub async fn update_user_role<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Path(user_id): Path<i64>,
    JsonBody(req): JsonBody<UpdateRoleRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let updated = AdminUsersUseCase::new(state.repo.clone())
        .update_role(UserId::from_i64(user_id), &req.role)
        .await?;
    Ok(Json(UserResponse::from(&updated)))
}

/// DELETE /api/admin/users/{user_id}
pub async fn delete_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    admin: AuthUser,
    Path(user_id): Path<i64>,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    AdminUsersUseCase::new(state.repo.clone())
        .delete(admin.user_id, UserId::from_i64(user_id))
        .await?;
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
