//! User Entity
//!
//! Account record: identity, credentials, role and the mirrored vendor status.

use chrono::{DateTime, Duration, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
    vendor_status::VendorStatus, verification_code::VerificationCode,
};

/// Outcome of checking a supplied email verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationCheck {
    Verified,
    AlreadyVerified,
    NoCode,
    Expired,
    Mismatch,
}

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: UserName,
    pub email: Email,
    pub password_hash: UserPassword,
    pub role: UserRole,
    pub vendor_status: VendorStatus,
    pub email_verified: bool,
    pub verification_code: Option<VerificationCode>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User not yet inserted; the database assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: UserName,
    pub email: Email,
    pub password_hash: UserPassword,
    pub role: UserRole,
    pub email_verified: bool,
    pub verification_code: Option<VerificationCode>,
}

impl NewUser {
    /// Self-registered user: unverified, with a fresh verification code
    pub fn signup(
        name: UserName,
        email: Email,
        password_hash: UserPassword,
        role: UserRole,
        code_ttl: Duration,
    ) -> Self {
        Self {
            name,
            email,
            password_hash,
            role,
            email_verified: false,
            verification_code: Some(VerificationCode::issue(Utc::now(), code_ttl)),
        }
    }

    /// Operator-provisioned administrator, verified from the start
    pub fn admin(name: UserName, email: Email, password_hash: UserPassword) -> Self {
        Self {
            name,
            email,
            password_hash,
            role: UserRole::Admin,
            email_verified: true,
            verification_code: None,
        }
    }

    /// Materialize with the id assigned on insert
    pub fn into_user(self, user_id: UserId, now: DateTime<Utc>) -> User {
        User {
            user_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            vendor_status: VendorStatus::None,
            email_verified: self.email_verified,
            verification_code: self.verification_code,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl User {
    /// Check `supplied` and mark the email verified on success
    pub fn confirm_email(&mut self, supplied: &str, now: DateTime<Utc>) -> VerificationCheck {
        if self.email_verified {
            return VerificationCheck::AlreadyVerified;
        }
        let Some(code) = &self.verification_code else {
            return VerificationCheck::NoCode;
        };
        if code.is_expired_at(now) {
            return VerificationCheck::Expired;
        }
        if !code.matches(supplied) {
            return VerificationCheck::Mismatch;
        }

        self.email_verified = true;
        self.verification_code = None;
        self.updated_at = now;
        VerificationCheck::Verified
    }

    pub fn set_profile(&mut self, name: UserName, email: Email) {
        self.name = name;
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn set_avatar(&mut self, avatar: String) {
        self.avatar = Some(avatar);
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}
