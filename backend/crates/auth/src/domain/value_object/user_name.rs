//! User Name Value Object
//!
//! ユーザー名は画面表示・メール宛名に使う**表示名**。ログイン識別子ではない
//! （ログインはメールアドレス）。
//!
//! ## 設計方針
//! - NFKC正規化 → 前後空白除去 → 連続空白の圧縮 の順で処理
//! - 文字種は制限しない（国際化された氏名を許可）
//!
//! ## 不変条件
//! - 長さ: 2〜100文字（正規化後）
//! - 制御文字禁止

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 2;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 100;

/// User name validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserNameError {
    #[error("Name must be at least {USER_NAME_MIN_LENGTH} characters")]
    TooShort,

    #[error("Name must be at most {USER_NAME_MAX_LENGTH} characters")]
    TooLong,

    #[error("Name contains invalid characters")]
    InvalidCharacter,
}

/// Display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Normalize and validate user input
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let normalized: String = raw.as_ref().nfkc().collect();

        if normalized.chars().any(char::is_control) {
            return Err(UserNameError::InvalidCharacter);
        }

        // 連続空白を1つに
        let collapsed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");

        let len = collapsed.chars().count();
        if len < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort);
        }
        if len > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong);
        }

        Ok(Self(collapsed))
    }

    /// Restore from database (already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
