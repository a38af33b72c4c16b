//! Randomness and Encoding Helpers
//!
//! Everything random here comes from the OS CSPRNG: verification codes,
//! activation codes, upload names and development signing keys.

use std::ops::RangeInclusive;

use base64::{Engine, engine::general_purpose};
use rand::{Rng, RngCore, rngs::OsRng};

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Uniform draw from an inclusive range using the OS CSPRNG
pub fn random_in_range(range: RangeInclusive<u32>) -> u32 {
    OsRng.gen_range(range)
}

/// Random decimal code of exactly `len` digits, first digit non-zero
pub fn random_digits(len: u32) -> String {
    debug_assert!((1..=9).contains(&len));
    let low = 10u32.pow(len - 1);
    let high = 10u32.pow(len) - 1;
    random_in_range(low..=high).to_string()
}

/// Encode bytes as unpadded URL-safe base64
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded URL-safe base64
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
