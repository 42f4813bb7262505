use thiserror::Error;

use super::claims::TokenKind;

/// Error type for token operations.
///
/// `Malformed`, `SignatureInvalid`, `Expired` and `WrongKind` are per-token
/// failures. `SigningKeyMisconfigured` only surfaces while building the
/// signing configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid: {0}")]
    SignatureInvalid(String),

    #[error("Token is expired")]
    Expired,

    #[error("Expected {expected} token, got {found} token")]
    WrongKind { expected: TokenKind, found: TokenKind },

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Signing key is misconfigured: {0}")]
    SigningKeyMisconfigured(String),
}

impl JwtError {
    /// Whether the caller may recover by exchanging a refresh token.
    pub fn is_expired(&self) -> bool {
        matches!(self, JwtError::Expired)
    }
}
