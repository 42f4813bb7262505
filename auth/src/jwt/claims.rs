use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Discriminates short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Identity a token is minted for.
///
/// The id is opaque at this layer; services decide how to parse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub is_admin: bool,
}

impl Principal {
    pub fn new(id: impl ToString, is_admin: bool) -> Self {
        Self {
            id: id.to_string(),
            is_admin,
        }
    }
}

/// Payload carried by every token.
///
/// `iat` and `exp` are Unix timestamps in milliseconds, so a token expires
/// exactly `lifetime` after the instant it was issued. `is_admin` is a
/// snapshot taken at issuance and is not refreshed until a new token is
/// minted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    pub is_admin: bool,

    pub kind: TokenKind,

    /// Issued at (ms)
    pub iat: i64,

    /// Expiration time (ms)
    pub exp: i64,
}

impl Claims {
    /// Build the claims for `principal`, valid from `issued_at` until
    /// `issued_at + lifetime`.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry instant is not representable
    pub fn for_principal(
        principal: &Principal,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = issued_at.checked_add_signed(lifetime).ok_or_else(|| {
            JwtError::EncodingFailed(format!("{} token expiry overflows", kind))
        })?;

        Ok(Self {
            sub: principal.id.clone(),
            is_admin: principal.is_admin,
            kind,
            iat: issued_at.timestamp_millis(),
            exp: expires_at.timestamp_millis(),
        })
    }

    /// Principal the token was issued for, with its role snapshot.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.sub.clone(),
            is_admin: self.is_admin,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.exp)
    }

    /// True once `now` has reached the expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp
    }
}
