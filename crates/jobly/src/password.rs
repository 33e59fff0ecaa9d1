//! bcrypt password hashing, run off the async executor.

use crate::error::{JoblyError, JoblyResult};

/// Hash `password` with the given bcrypt work factor.
pub async fn hash_password(password: String, cost: u32) -> JoblyResult<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| JoblyError::Task(e.to_string()))??;
    Ok(hashed)
}

/// Check `password` against a stored bcrypt hash.
pub async fn verify_password(password: String, hash: String) -> JoblyResult<bool> {
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| JoblyError::Task(e.to_string()))??;
    Ok(ok)
}
