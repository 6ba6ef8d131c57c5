//! Salted password hashing using Argon2id.
//!
//! The salt is generated separately from the digest and stored next to it,
//! so verification recomputes the digest from the stored salt and compares
//! the raw outputs. `password_hash::Output` equality is constant-time.

use argon2::{
    Argon2, PasswordHash, PasswordHasher,
    password_hash::{Output, SaltString},
};

use crate::error::{AuthError, AuthResult};

/// Generate a fresh random salt, B64-encoded.
pub fn generate_salt() -> String {
    SaltString::generate(&mut rand::thread_rng())
        .as_str()
        .to_string()
}

/// Hash `password` under `salt`, returning the PHC-format digest.
///
/// Deterministic for a given (password, salt) pair.
pub fn hash_password(password: &str, salt: &str) -> AuthResult<String> {
    let salt = parse_salt(salt)?;
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Crypto(format!("Failed to hash password: {}", e)))?;

    Ok(digest.to_string())
}

/// Check `password` against a digest previously produced by [`hash_password`]
/// with the same `salt`.
///
/// Returns `Ok(false)` on mismatch and `Err` only if the stored salt or
/// digest is malformed.
pub fn verify_password(password: &str, salt: &str, expected_digest: &str) -> AuthResult<bool> {
    let expected = PasswordHash::new(expected_digest)
        .map_err(|e| AuthError::Crypto(format!("Failed to parse password hash: {}", e)))?;
    let expected_output = expected
        .hash
        .ok_or_else(|| AuthError::Crypto("Stored password hash has no output".to_string()))?;

    let salt = parse_salt(salt)?;
    let computed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Crypto(format!("Failed to hash password: {}", e)))?;

    Ok(computed.hash.is_some_and(|output: Output| output == expected_output))
}

fn parse_salt(salt: &str) -> AuthResult<SaltString> {
    SaltString::from_b64(salt)
        .map_err(|e| AuthError::Crypto(format!("Invalid password salt: {}", e)))
}
