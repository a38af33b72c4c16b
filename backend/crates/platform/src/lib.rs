//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random codes, Base64, constant-time compare)
//! - Password and PIN hashing (Argon2id, NIST SP 800-63B compliant)
//! - Signed bearer access tokens (HMAC-SHA256)
//! - Transactional email (lettre + Askama templates)
//! - Upload validation and local file storage

pub mod crypto;
pub mod mail;
pub mod password;
pub mod token;
pub mod upload;
