//! Vendor Status Value Object
//!
//! ユーザーレコード側に複製される出店ステータス。
//! 正本は `vendor_applications` の状態で、承認・却下・ブロック時に
//! 同一トランザクション内で同期される。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    /// 未申請
    #[default]
    None,
    /// 審査中
    Pending,
    /// 承認済み
    Approved,
    /// 却下
    Rejected,
    /// 承認済みだが停止中
    Blocked,
}

impl VendorStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use VendorStatus::*;
        match self {
            None => "none",
            Pending => "pending",
            Approved => "approved",
            Rejected => "rejected",
            Blocked => "blocked",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use VendorStatus::*;
        match code {
            "none" => Some(None),
            "pending" => Some(Pending),
            "approved" => Some(Approved),
            "rejected" => Some(Rejected),
            "blocked" => Some(Blocked),
            _ => Option::None,
        }
    }

    /// 出店者として操作できるか
    #[inline]
    pub const fn can_operate(&self) -> bool {
        matches!(self, VendorStatus::Approved)
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_status_roundtrip_codes() {
        for status in [
            VendorStatus::None,
            VendorStatus::Pending,
            VendorStatus::Approved,
            VendorStatus::Rejected,
            VendorStatus::Blocked,
        ] {
            assert_eq!(VendorStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(VendorStatus::from_code("active"), None);
    }

    #[test]
    fn test_can_operate() {
        assert!(VendorStatus::Approved.can_operate());
        assert!(!VendorStatus::Blocked.can_operate());
        assert!(!VendorStatus::Pending.can_operate());
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(VendorStatus::default(), VendorStatus::None);
    }
}
