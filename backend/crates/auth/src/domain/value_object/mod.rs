//! Value Object Module

pub mod email;
pub mod user_name;
pub mod user_password;
pub mod user_role;
pub mod vendor_status;
pub mod verification_code;
