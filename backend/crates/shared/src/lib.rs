//! Shared Kernel
//!
//! Vocabulary the auth and vendor crates must agree on: the JSON error
//! shape ([`error::app_error::AppError`]) and the JSON body extractor that
//! produces it, typed `BIGSERIAL` ids and the
//! `page`/`limit` pagination envelope. Nothing here knows about users or
//! vendor spaces.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod page;
