//! Password and PIN hashing.
//!
//! Both operations run on tokio's blocking pool.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::warn;

use crate::error::{PayrollError, PayrollResult};

/// Hashes a password or PIN with Argon2 and a random salt.
pub async fn hash_secret(secret: String) -> PayrollResult<String> {
    tokio::task::spawn_blocking(move || hash_blocking(&secret))
        .await
        .map_err(|e| PayrollError::CalculationError {
            message: format!("credential hashing task failed: {}", e),
        })?
}

/// Returns true if `secret` matches the stored Argon2 `hash`.
///
/// A malformed stored hash never matches.
pub async fn verify_secret(secret: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_blocking(&secret, &hash))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "Credential verification task failed");
            false
        })
}

fn hash_blocking(secret: &str) -> PayrollResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PayrollError::CalculationError {
            message: format!("failed to hash credential: {}", e),
        })
}

fn verify_blocking(secret: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(secret.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
