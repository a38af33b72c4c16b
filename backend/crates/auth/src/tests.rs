//! Crate-level tests: use cases against an in-memory repository and
//! router-level checks of the auth and role middleware.

#[cfg(test)]
mod support {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use kernel::id::UserId;
    use platform::mail::{MailError, Mailer, OutgoingMail};

    use crate::domain::entity::user::{NewUser, User};
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{email::Email, user_role::UserRole};
    use crate::error::{AuthError, AuthResult};

    #[derive(Clone, Default)]
    pub struct MemoryUserRepo {
        users: Arc<Mutex<Vec<User>>>,
        next_id: Arc<AtomicI64>,
        pub cascade_calls: Arc<Mutex<Vec<UserId>>>,
    }

    impl MemoryUserRepo {
        pub fn get(&self, user_id: UserId) -> Option<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.user_id == user_id)
                .cloned()
        }

        pub fn by_email(&self, email: &str) -> Option<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email.as_str() == email)
                .cloned()
        }

        pub fn put(&self, user: User) {
            let mut users = self.users.lock().unwrap();
            if let Some(slot) = users.iter_mut().find(|u| u.user_id == user.user_id) {
                *slot = user;
            }
        }
    }

    impl UserRepository for MemoryUserRepo {
        async fn create(&self, user: NewUser) -> AuthResult<User> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(AuthError::EmailTaken);
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let user = user.into_user(UserId::from_i64(id), Utc::now());
            users.push(user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
            Ok(self.get(user_id))
        }

        async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
            Ok(self.by_email(email.as_str()))
        }

        async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
            Ok(self.by_email(email.as_str()).is_some())
        }

        async fn update(&self, user: &User) -> AuthResult<()> {
            self.put(user.clone());
            Ok(())
        }

        async fn list(&self) -> AuthResult<Vec<User>> {
            let mut users = self.users.lock().unwrap().clone();
            users.sort_by(|a, b| b.user_id.as_i64().cmp(&a.user_id.as_i64()));
            Ok(users)
        }

        async fn update_role(&self, user_id: UserId, role: UserRole) -> AuthResult<Option<User>> {
            let mut users = self.users.lock().unwrap();
            Ok(users.iter_mut().find(|u| u.user_id == user_id).map(|u| {
                u.set_role(role);
                u.clone()
            }))
        }

        async fn delete_cascade(&self, user_id: UserId) -> AuthResult<bool> {
            self.cascade_calls.lock().unwrap().push(user_id);
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.user_id != user_id);
            Ok(users.len() != before)
        }
    }

    /// Records every message; optionally fails every send
    #[derive(Clone, Default)]
    pub struct RecordingMailer {
        pub sent: Arc<Mutex<Vec<OutgoingMail>>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    impl Mailer for RecordingMailer {
        async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::InvalidAddress(mail.to));
            }
            self.sent.lock().unwrap().push(mail);
            Ok(())
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::support::{MemoryUserRepo, RecordingMailer};
    use crate::application::*;
    use crate::domain::value_object::{user_role::UserRole, verification_code::VerificationCode};
    use crate::error::AuthError;

    const PASSWORD: &str = "Sunny-Harbor-42";

    fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::development())
    }

    fn signup_input(email: &str) -> SignUpInput {
        SignUpInput {
            name: "Ada Lovelace".into(),
            email: email.into(),
            password: PASSWORD.into(),
            confirm_password: PASSWORD.into(),
            role: Some("designer".into()),
        }
    }

    /// Sign up and confirm; returns the user's id
    async fn verified_user(repo: &MemoryUserRepo, config: &Arc<AuthConfig>, email: &str) -> i64 {
        let output = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(RecordingMailer::default()),
            config.clone(),
        )
        .execute(signup_input(email))
        .await
        .unwrap();
        let code = output.user.verification_code.unwrap().as_str().to_string();

        ConfirmEmailUseCase::new(Arc::new(repo.clone()), config.clone())
            .execute(ConfirmEmailInput {
                email: email.into(),
                code,
            })
            .await
            .unwrap();
        output.user.user_id.as_i64()
    }

    #[tokio::test]
    async fn test_sign_up_creates_unverified_user_and_mails_code() {
        let repo = MemoryUserRepo::default();
        let mailer = RecordingMailer::default();
        let use_case = SignUpUseCase::new(Arc::new(repo.clone()), Arc::new(mailer.clone()), config());

        let output = use_case.execute(signup_input("Ada@Example.com")).await.unwrap();

        assert!(output.email_sent);
        assert!(!output.user.email_verified);
        assert_eq!(output.user.role, UserRole::Designer);
        assert_eq!(output.user.email.as_str(), "ada@example.com");

        let code = output.user.verification_code.as_ref().unwrap().as_str().to_string();
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert!(sent[0].text.contains(&code));
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let repo = MemoryUserRepo::default();
        let use_case = SignUpUseCase::new(
            Arc::new(repo),
            Arc::new(RecordingMailer::default()),
            config(),
        );
        use_case.execute(signup_input("ada@example.com")).await.unwrap();

        let err = use_case.execute(signup_input("ADA@example.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[tokio::test]
    async fn test_sign_up_collects_validation_issues() {
        let use_case = SignUpUseCase::new(
            Arc::new(MemoryUserRepo::default()),
            Arc::new(RecordingMailer::default()),
            config(),
        );

        let err = use_case
            .execute(SignUpInput {
                name: "A".into(),
                email: "not-an-email".into(),
                password: PASSWORD.into(),
                confirm_password: "Other-Harbor-42".into(),
                role: Some("admin".into()),
            })
            .await
            .unwrap_err();

        let AuthError::Validation(issues) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_ref()).collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"confirmPassword"));
        assert!(fields.contains(&"role"));
        assert!(!fields.contains(&"password"));
    }

    #[tokio::test]
    async fn test_sign_up_survives_mail_failure() {
        let repo = MemoryUserRepo::default();
        let use_case = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(RecordingMailer::failing()),
            config(),
        );

        let output = use_case.execute(signup_input("ada@example.com")).await.unwrap();
        assert!(!output.email_sent);
        assert!(repo.by_email("ada@example.com").is_some());
    }

    #[tokio::test]
    async fn test_confirm_email_error_paths() {
        let repo = MemoryUserRepo::default();
        let config = config();
        let output = SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(RecordingMailer::default()),
            config.clone(),
        )
        .execute(signup_input("ada@example.com"))
        .await
        .unwrap();
        let use_case = ConfirmEmailUseCase::new(Arc::new(repo.clone()), config.clone());

        let missing = use_case
            .execute(ConfirmEmailInput {
                email: "".into(),
                code: "".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(missing.to_string(), "Email and code are required");

        let unknown = use_case
            .execute(ConfirmEmailInput {
                email: "nobody@example.com".into(),
                code: "123456".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::UserNotFound));

        let wrong = use_case
            .execute(ConfirmEmailInput {
                email: "ada@example.com".into(),
                code: "abcdef".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidVerificationCode));

        // Expire the stored code
        let mut user = output.user.clone();
        let code = user.verification_code.as_ref().unwrap().as_str().to_string();
        user.verification_code = Some(VerificationCode::from_db(
            code.clone(),
            Utc::now() - Duration::minutes(1),
        ));
        repo.put(user);
        let expired = use_case
            .execute(ConfirmEmailInput {
                email: "ada@example.com".into(),
                code,
            })
            .await
            .unwrap_err();
        assert!(matches!(expired, AuthError::VerificationCodeExpired));
    }

    #[tokio::test]
    async fn test_confirm_email_issues_token() {
        let repo = MemoryUserRepo::default();
        let config = config();
        let user_id = verified_user(&repo, &config, "ada@example.com").await;

        let stored = repo.by_email("ada@example.com").unwrap();
        assert!(stored.email_verified);
        assert!(stored.verification_code.is_none());

        let again = ConfirmEmailUseCase::new(Arc::new(repo.clone()), config.clone())
            .execute(ConfirmEmailInput {
                email: "ada@example.com".into(),
                code: "123456".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(again, AuthError::EmailAlreadyVerified));

        let login = SignInUseCase::new(Arc::new(repo), config.clone())
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();
        let claims = config.signer().verify(&login.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "designer");
    }

    #[tokio::test]
    async fn test_login_rejections() {
        let repo = MemoryUserRepo::default();
        let config = config();
        SignUpUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(RecordingMailer::default()),
            config.clone(),
        )
        .execute(signup_input("ada@example.com"))
        .await
        .unwrap();
        let use_case = SignInUseCase::new(Arc::new(repo), config);

        let unverified = use_case
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(unverified, AuthError::EmailNotVerified));

        let wrong = use_case
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: "Other-Harbor-42".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));

        let unknown = use_case
            .execute(SignInInput {
                email: "ghost@example.com".into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_profile_update_rejects_taken_email() {
        let repo = MemoryUserRepo::default();
        let config = config();
        let ada = verified_user(&repo, &config, "ada@example.com").await;
        verified_user(&repo, &config, "bob@example.com").await;
        let use_case = ProfileUseCase::new(Arc::new(repo.clone()), config);

        let err = use_case
            .update_profile(
                ada.into(),
                UpdateProfileInput {
                    name: "Ada".into(),
                    email: "bob@example.com".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already in use");

        let updated = use_case
            .update_profile(
                ada.into(),
                UpdateProfileInput {
                    name: "Ada King".into(),
                    email: "ada.king@example.com".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.as_str(), "Ada King");
        assert!(repo.by_email("ada.king@example.com").is_some());
    }

    #[tokio::test]
    async fn test_change_password() {
        let repo = MemoryUserRepo::default();
        let config = config();
        let ada = verified_user(&repo, &config, "ada@example.com").await;
        let use_case = ProfileUseCase::new(Arc::new(repo.clone()), config.clone());

        let wrong = use_case
            .change_password(
                ada.into(),
                ChangePasswordInput {
                    current_password: "Other-Harbor-42".into(),
                    new_password: "Quiet-River-Stone-9".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::IncorrectCurrentPassword));

        use_case
            .change_password(
                ada.into(),
                ChangePasswordInput {
                    current_password: PASSWORD.into(),
                    new_password: "Quiet-River-Stone-9".into(),
                },
            )
            .await
            .unwrap();

        let login = SignInUseCase::new(Arc::new(repo), config)
            .execute(SignInInput {
                email: "ada@example.com".into(),
                password: "Quiet-River-Stone-9".into(),
            })
            .await;
        assert!(login.is_ok());
    }

    #[tokio::test]
    async fn test_avatar_required() {
        let repo = MemoryUserRepo::default();
        let config = config();
        let ada = verified_user(&repo, &config, "ada@example.com").await;
        let use_case = ProfileUseCase::new(Arc::new(repo), config);

        let err = use_case.update_avatar(ada.into(), Some("  ".into())).await.unwrap_err();
        assert_eq!(err.to_string(), "Avatar URL is required");

        let user = use_case
            .update_avatar(ada.into(), Some("/uploads/a.png".into()))
            .await
            .unwrap();
        assert_eq!(user.avatar.as_deref(), Some("/uploads/a.png"));
    }

    #[tokio::test]
    async fn test_admin_user_management() {
        let repo = MemoryUserRepo::default();
        let config = config();
        let admin = verified_user(&repo, &config, "root@example.com").await;
        let ada = verified_user(&repo, &config, "ada@example.com").await;
        let use_case = AdminUsersUseCase::new(Arc::new(repo.clone()));

        let listed = use_case.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].user_id.as_i64(), ada);

        assert!(matches!(
            use_case.update_role(ada.into(), "overlord").await,
            Err(AuthError::InvalidRole)
        ));
        let promoted = use_case.update_role(ada.into(), "seller").await.unwrap();
        assert_eq!(promoted.role, UserRole::Seller);

        assert!(matches!(
            use_case.delete(admin.into(), admin.into()).await,
            Err(AuthError::CannotDeleteSelf)
        ));
        use_case.delete(admin.into(), ada.into()).await.unwrap();
        assert!(repo.get(ada.into()).is_none());
        assert!(matches!(
            use_case.delete(admin.into(), ada.into()).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let repo = MemoryUserRepo::default();
        let use_case = BootstrapAdminUseCase::new(Arc::new(repo.clone()), config());
        let input = || BootstrapAdminInput {
            name: "Site Admin".into(),
            email: "admin@example.com".into(),
            password: PASSWORD.into(),
        };

        assert_eq!(use_case.execute(input()).await.unwrap(), BootstrapOutcome::Created);
        assert_eq!(use_case.execute(input()).await.unwrap(), BootstrapOutcome::AlreadyAdmin);

        let admin = repo.by_email("admin@example.com").unwrap();
        assert!(admin.email_verified);
        assert_eq!(admin.role, UserRole::Admin);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::Router;
    use kernel::id::UserId;
    use tower::ServiceExt;

    use super::support::{MemoryUserRepo, RecordingMailer};
    use crate::application::AuthConfig;
    use crate::presentation::{AuthAppState, admin_router, auth_router};

    fn state() -> AuthAppState<MemoryUserRepo, RecordingMailer> {
        AuthAppState::new(
            MemoryUserRepo::default(),
            RecordingMailer::default(),
            AuthConfig::development(),
        )
    }

    async fn call(router: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let (status, body) = call(auth_router(state()), get("/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_me_rejects_bad_token() {
        let (status, body) = call(auth_router(state()), get("/me", Some("abc.def"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token");
    }

    #[tokio::test]
    async fn test_me_rejects_token_from_other_key() {
        let foreign = AuthConfig::development().signer().issue(1, "user");
        let (status, _) = call(auth_router(state()), get("/me", Some(&foreign))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_role() {
        let state = state();
        let user_token = state.signer.issue(5, "vendor");
        let (status, body) = call(admin_router(state.clone()), get("/users", Some(&user_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden: Admin access required");

        let admin_token = state.signer.issue(1, "admin");
        let (status, body) = call(admin_router(state), get("/users", Some(&admin_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_array());
    }

    #[tokio::test]
    async fn test_signup_validation_response_shape() {
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"ada@example.com"}"#))
            .unwrap();
        let (status, body) = call(auth_router(state()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert!(body["issues"].as_array().is_some_and(|i| !i.is_empty()));
    }

    #[tokio::test]
    async fn test_unreadable_bodies_get_json_errors() {
        let no_type = Request::builder()
            .method("POST")
            .uri("/login")
            .body(Body::from(r#"{"email":"ada@example.com","password":"x"}"#))
            .unwrap();
        let malformed = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"#))
            .unwrap();
        let empty = Request::builder()
            .method("POST")
            .uri("/confirm-email")
            .body(Body::empty())
            .unwrap();

        for req in [no_type, malformed, empty] {
            let (status, body) = call(auth_router(state()), req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "{body}");
        }
    }

    #[tokio::test]
    async fn test_signup_then_me() {
        let state = state();
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name":"Ada","email":"ada@example.com","password":"Sunny-Harbor-42","confirmPassword":"Sunny-Harbor-42"}"#,
            ))
            .unwrap();
        let (status, body) = call(auth_router(state.clone()), req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["vendorStatus"], "none");
        assert!(body["user"].get("passwordHash").is_none());

        let id = body["user"]["id"].as_i64().unwrap();
        let token = state.signer.issue(UserId::from_i64(id).as_i64(), "user");
        let (status, body) = call(auth_router(state), get("/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ada@example.com");
    }
}
