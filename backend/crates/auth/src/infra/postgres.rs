//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
    vendor_status::VendorStatus, verification_code::VerificationCode,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    name,
    email,
    password_hash,
    role,
    vendor_status,
    email_verified,
    verification_code,
    verification_code_expires_at,
    avatar,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: NewUser) -> AuthResult<User> {
        let (code, code_expires_at) = split_code(user.verification_code.as_ref());

        let sql = format!(
            r#"
            INSERT INTO users (
                name,
                email,
                password_hash,
                role,
                email_verified,
                verification_code,
                verification_code_expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.name.as_str())
            .bind(user.email.as_str())
            .bind(user.password_hash.as_phc_string())
            .bind(user.role.code())
            .bind(user.email_verified)
            .bind(code)
            .bind(code_expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation_as(e, AuthError::EmailTaken))?;

        row.into_user()
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let (code, code_expires_at) = split_code(user.verification_code.as_ref());

        sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                password_hash = $4,
                email_verified = $5,
                verification_code = $6,
                verification_code_expires_at = $7,
                avatar = $8,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.user_id.as_i64())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.email_verified)
        .bind(code)
        .bind(code_expires_at)
        .bind(user.avatar.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation_as(e, AuthError::EmailInUse))?;

        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update_role(&self, user_id: UserId, role: UserRole) -> AuthResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_i64())
            .bind(role.code())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn delete_cascade(&self, user_id: UserId) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        let orders = sqlx::query(
            r#"
            DELETE FROM vendor_orders
            WHERE application_id IN (SELECT id FROM vendor_applications WHERE user_id = $1)
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let products = sqlx::query(
            r#"
            DELETE FROM vendor_products
            WHERE application_id IN (SELECT id FROM vendor_applications WHERE user_id = $1)
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("DELETE FROM vendor_applications WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(
            user_id = %user_id,
            orders_deleted = orders,
            products_deleted = products,
            "User and dependent vendor records deleted"
        );

        Ok(true)
    }
}

/// The `users.email` unique key is the only one a write can hit
fn unique_violation_as(err: sqlx::Error, mapped: AuthError) -> AuthError {
    if err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        mapped
    } else {
        AuthError::Database(err)
    }
}

fn split_code(code: Option<&VerificationCode>) -> (Option<&str>, Option<DateTime<Utc>>) {
    match code {
        Some(c) => (Some(c.as_str()), Some(c.expires_at())),
        None => (None, None),
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    vendor_status: String,
    email_verified: bool,
    verification_code: Option<String>,
    verification_code_expires_at: Option<DateTime<Utc>>,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role in database: {}", self.role)))?;
        let vendor_status = VendorStatus::from_code(&self.vendor_status).ok_or_else(|| {
            AuthError::Internal(format!(
                "Invalid vendor status in database: {}",
                self.vendor_status
            ))
        })?;

        let verification_code = match (self.verification_code, self.verification_code_expires_at) {
            (Some(code), Some(expires_at)) => Some(VerificationCode::from_db(code, expires_at)),
            _ => None,
        };

        Ok(User {
            user_id: UserId::from_i64(self.id),
            name: UserName::from_db(self.name),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_phc_string(self.password_hash)?,
            role,
            vendor_status,
            email_verified: self.email_verified,
            verification_code,
            avatar: self.avatar,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
