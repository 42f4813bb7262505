use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::Principal;
use super::claims::TokenKind;
use super::config::SigningConfig;
use super::errors::JwtError;

/// Signs and verifies tokens with a fixed [`SigningConfig`].
///
/// The current time is always passed in, so expiry checks are reproducible
/// in tests and independent from the host clock.
pub struct TokenCodec {
    signing: SigningConfig,
}

impl TokenCodec {
    pub fn new(signing: SigningConfig) -> Self {
        Self { signing }
    }

    /// Encode a token of `kind` for `principal`, expiring at `now + lifetime`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed, or the expiry is not representable
    pub fn encode(
        &self,
        principal: &Principal,
        kind: TokenKind,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::for_principal(principal, kind, now, lifetime)?;

        self.encode_claims(&claims)
    }

    /// Sign an already built claim set.
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.signing.algorithm());

        encode(&header, claims, self.signing.encoding_key())
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and verify a token.
    ///
    /// # Errors
    /// * `Malformed` - Not a structurally valid token
    /// * `SignatureInvalid` - Signature does not verify, or the token was signed
    ///   with an algorithm other than the configured one
    /// * `Expired` - `now` is at or past the expiry instant
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.signing.algorithm());
        // Expiry is checked against the supplied `now` below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, self.signing.decoding_key(), &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::SignatureInvalid(e.to_string()),
                ErrorKind::InvalidAlgorithm => JwtError::SignatureInvalid(format!(
                    "expected {:?} signature",
                    self.signing.algorithm()
                )),
                _ => JwtError::Malformed(e.to_string()),
            })?
            .claims;

        if claims.is_expired(now) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }

    /// Decode a token and require it to be of `kind`.
    ///
    /// # Errors
    /// Everything [`TokenCodec::decode`] returns, plus `WrongKind`.
    pub fn decode_expecting(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims, JwtError> {
        let claims = self.decode(token, now)?;

        if claims.kind != kind {
            return Err(JwtError::WrongKind {
                expected: kind,
                found: claims.kind,
            });
        }

        Ok(claims)
    }
}
