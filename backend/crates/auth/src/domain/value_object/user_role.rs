use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role, stored as its text code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Developer,
    Designer,
    Vendor,
    Seller,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 6] = [
        UserRole::User,
        UserRole::Developer,
        UserRole::Designer,
        UserRole::Vendor,
        UserRole::Seller,
        UserRole::Admin,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Developer => "developer",
            Designer => "designer",
            Vendor => "vendor",
            Seller => "seller",
            Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Roles a visitor may pick for themselves at signup
    #[inline]
    pub const fn is_self_assignable(&self) -> bool {
        !self.is_admin()
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
