use std::str::FromStr;

use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::JwtError;

/// Process-wide signing material: algorithm plus the keys derived from the
/// shared secret.
///
/// Built once at startup and only read afterwards. Only the HMAC family is
/// accepted, so every token is signed and verified with the same secret.
#[derive(Clone)]
pub struct SigningConfig {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningConfig {
    pub const MIN_SECRET_LEN: usize = 32;

    /// Create a signing configuration.
    ///
    /// # Arguments
    /// * `algorithm` - Algorithm identifier, one of `HS256`, `HS384`, `HS512`
    /// * `secret` - Shared secret, at least 32 bytes
    ///
    /// # Errors
    /// * `SigningKeyMisconfigured` - Unknown or non-HMAC algorithm, or a short secret
    pub fn new(algorithm: &str, secret: &[u8]) -> Result<Self, JwtError> {
        let algorithm = Algorithm::from_str(algorithm).map_err(|_| {
            JwtError::SigningKeyMisconfigured(format!("unknown algorithm '{}'", algorithm))
        })?;

        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(JwtError::SigningKeyMisconfigured(format!(
                "algorithm {:?} is not an HMAC algorithm",
                algorithm
            )));
        }

        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(JwtError::SigningKeyMisconfigured(format!(
                "secret must be at least {} bytes, got {}",
                Self::MIN_SECRET_LEN,
                secret.len()
            )));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}
