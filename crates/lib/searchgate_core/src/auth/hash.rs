//! Salted SHA-512 digests.
//!
//! The server never stores a refresh token itself, only this digest of it.
//! The same digest keys the blacklist.

use sha2::{Digest, Sha512};

/// Digest `input` salted with `salt`, as lowercase hex (128 chars).
///
/// The salt is a process-wide secret distinct from the token signing key.
pub fn digest(input: &str, salt: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}
