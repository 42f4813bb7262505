use thiserror::Error;

use crate::user::errors::UserError;
use crate::user::errors::UserIdError;

/// Reasons the auth gate refuses a request.
///
/// Every variant is a client-side failure; none of them is fatal.
#[derive(Debug, Clone, Error)]
pub enum GateRejection {
    #[error("Authorization header is missing")]
    TokenMissing,

    #[error("Authorization header is not a bearer token")]
    MalformedHeader,

    #[error("Token rejected: {0}")]
    InvalidToken(#[from] auth::JwtError),

    #[error("Token subject is not a user ID: {0}")]
    InvalidSubject(#[from] UserIdError),

    #[error("No user found for token subject {subject}")]
    PrincipalNotFound {
        subject: String,
        /// Set when the lookup itself failed rather than returning nothing.
        cause: Option<UserError>,
    },

    #[error("User {0} is not an admin")]
    InsufficientPrivilege(String),
}

impl GateRejection {
    /// Message safe to show to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            GateRejection::TokenMissing => "auth token is missing",
            GateRejection::MalformedHeader => "auth token is invalid",
            GateRejection::InvalidToken(_) => "token supplied is invalid/expired",
            GateRejection::InvalidSubject(_) => "invalid user ID",
            GateRejection::PrincipalNotFound { .. } => {
                "no user found in this authorization context"
            }
            GateRejection::InsufficientPrivilege(_) => "user is not an admin",
        }
    }
}
