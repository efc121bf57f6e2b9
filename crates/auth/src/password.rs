//! Password hashing (bcrypt).
//!
//! Hashing is CPU-bound; async callers should run these on a blocking thread.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Hash a password with the given bcrypt cost (4..=31).
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check a password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch, not an error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(password, stored_hash) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("stored password hash could not be verified: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("vendor123", TEST_COST).unwrap();
        assert_ne!(hash, "vendor123");
        assert!(verify_password("vendor123", &hash));
        assert!(!verify_password("vendor124", &hash));
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("password123", "password123"));
    }
}
