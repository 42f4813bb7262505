use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Serialize;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::Principal;
use crate::jwt::TokenCodec;
use crate::jwt::TokenKind;

/// Configured lifetimes for the two token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    access: Duration,
    refresh: Duration,
}

impl TokenLifetimes {
    /// Longest accepted lifetime, in days.
    pub const MAX_DAYS: i64 = 100 * 365;

    /// Create token lifetimes.
    ///
    /// # Errors
    /// * `SigningKeyMisconfigured` - A lifetime is shorter than one second or
    ///   longer than [`TokenLifetimes::MAX_DAYS`]
    pub fn new(access: Duration, refresh: Duration) -> Result<Self, JwtError> {
        Self::check(access, TokenKind::Access)?;
        Self::check(refresh, TokenKind::Refresh)?;
        Ok(Self { access, refresh })
    }

    fn check(lifetime: Duration, kind: TokenKind) -> Result<(), JwtError> {
        if lifetime < Duration::seconds(1) {
            return Err(JwtError::SigningKeyMisconfigured(format!(
                "{} token lifetime must be at least one second",
                kind
            )));
        }
        if lifetime > Duration::days(Self::MAX_DAYS) {
            return Err(JwtError::SigningKeyMisconfigured(format!(
                "{} token lifetime exceeds {} days",
                kind,
                Self::MAX_DAYS
            )));
        }
        Ok(())
    }

    pub fn access(&self) -> Duration {
        self.access
    }

    pub fn refresh(&self) -> Duration {
        self.refresh
    }
}

/// A signed token together with the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Access and refresh tokens minted together at login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Mints token pairs and exchanges refresh tokens for fresh access tokens.
///
/// Holds no state besides the codec and lifetimes; nothing is recorded
/// about the tokens it hands out.
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, lifetimes: TokenLifetimes) -> Self {
        Self { codec, lifetimes }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issue an access/refresh pair for `principal`.
    ///
    /// Both tokens carry the same subject and admin snapshot.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_pair(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access: self.issue(principal, TokenKind::Access, self.lifetimes.access, now)?,
            refresh: self.issue(principal, TokenKind::Refresh, self.lifetimes.refresh, now)?,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The subject and admin flag are taken from the refresh token as-is;
    /// the user store is not consulted.
    ///
    /// # Errors
    /// * `Malformed`, `SignatureInvalid`, `Expired` - Refresh token rejected
    /// * `WrongKind` - An access token was presented
    /// * `EncodingFailed` - Token signing failed
    pub fn refresh_access_token(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let claims = self
            .codec
            .decode_expecting(refresh_token, TokenKind::Refresh, now)?;

        self.issue(
            &claims.principal(),
            TokenKind::Access,
            self.lifetimes.access,
            now,
        )
    }

    fn issue(
        &self,
        principal: &Principal,
        kind: TokenKind,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_principal(principal, kind, now, lifetime)?;
        let token = self.codec.encode_claims(&claims)?;
        let expires_at = claims.expires_at().ok_or_else(|| {
            JwtError::EncodingFailed(format!("{} token expiry is out of range", kind))
        })?;

        Ok(IssuedToken { token, expires_at })
    }
}
