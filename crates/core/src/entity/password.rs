//! Password hashing.
//!
//! Passwords are stored as the lowercase hex SHA-256 digest of the plaintext.
//! The digest is unsalted so the same plaintext always hashes to the same
//! value, which is what `read_by_credentials` relies on.

use sha2::{Digest, Sha256};

/// Minimum number of characters in a plaintext password.
pub const MIN_PASSWORD_LEN: usize = 8;

const HASH_HEX_LEN: usize = 64;

/// Hashes a plaintext password.
///
/// # Examples
///
/// ```
/// use harsh_core::entity::{hash_password, is_password_hash};
///
/// let hash = hash_password("sunshine");
/// assert_ne!(hash, "sunshine");
/// assert_eq!(hash, hash_password("sunshine"));
/// assert!(is_password_hash(&hash));
/// ```
pub fn hash_password(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Returns true if `value` has the shape of a digest produced by [`hash_password`].
pub fn is_password_hash(value: &str) -> bool {
    value.len() == HASH_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
