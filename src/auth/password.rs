//! Password Hashing
//! Mission: One-way salted hashing with self-describing output

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password with a per-call random salt.
///
/// The salt is embedded in the bcrypt output, so verification needs no
/// external salt storage. Call this only where a password is newly set or
/// changed; stored hashes must never be re-hashed.
pub fn hash_password(plaintext: &str) -> Result<String> {
    hash(plaintext, DEFAULT_COST).context("Failed to hash password")
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `false` for any malformed stored hash rather than erroring, so a
/// corrupted record degrades to a failed login instead of a 500.
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    verify(plaintext, hashed).unwrap_or(false)
}
