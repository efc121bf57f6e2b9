//! bcrypt work runs on the blocking pool.

use tracing::warn;

use vendorclub_auth::{hash_password, verify_password};

use crate::app::errors::PasswordTaskError;

pub async fn hash(password: String, cost: u32) -> Result<String, PasswordTaskError> {
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;
    Ok(hashed)
}

pub async fn verify(password: String, stored_hash: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await {
        Ok(matches) => matches,
        Err(e) => {
            warn!(error = %e, "password verification task failed");
            false
        }
    }
}
