//! Password hashing using Argon2id
//!
//! Hashes are stored in PHC string format, so the salt and the Argon2
//! parameters travel with the hash and verification needs nothing else.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AuthError;

/// Hash a password using Argon2id with a fresh random salt
///
/// # Returns
/// * `Ok(String)` - The hashed password in PHC string format
/// * `Err(AuthError::Hash)` - Only on entropy or parameter failures
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored hash
///
/// Returns `false` on mismatch and also when the stored hash cannot be
/// parsed. Callers never see a distinct error for a corrupt hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// Run a full verification against a throwaway hash and return `false`
///
/// Used when there is no stored hash to check, so that a missing account
/// costs the same Argon2 work as a wrong password.
pub fn verify_against_dummy(password: &str) -> bool {
    let _ = verify_password(password, dummy_hash());
    false
}

fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        hash_password("dummy-password-for-missing-accounts").unwrap_or_default()
    })
}
