use thiserror::Error;

/// Error type for password hashing.
///
/// A wrong password is not an error; `verify` reports it as `Ok(false)`.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is unreadable: {0}")]
    InvalidHash(String),
}
