//! Stateless token authentication
//!
//! Provides the pieces a service needs to authenticate callers without
//! keeping sessions:
//! - Signed, expiring access/refresh tokens (HMAC JWT)
//! - Token pair issuance and refresh
//! - Password hashing (Argon2id)
//!
//! Tokens are never stored; a token is accepted when its signature verifies
//! under the configured algorithm and it has not yet expired.
//!
//! # Examples
//!
//! ## Issuing and validating tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{Principal, SigningConfig, TokenCodec, TokenIssuer, TokenKind, TokenLifetimes};
//! use chrono::{Duration, Utc};
//!
//! let signing = SigningConfig::new("HS256", b"secret_key_at_least_32_bytes_long!").unwrap();
//! let codec = Arc::new(TokenCodec::new(signing));
//! let lifetimes = TokenLifetimes::new(Duration::minutes(10), Duration::days(30)).unwrap();
//! let issuer = TokenIssuer::new(Arc::clone(&codec), lifetimes);
//!
//! let now = Utc::now();
//! let pair = issuer.issue_pair(&Principal::new("user123", false), now).unwrap();
//!
//! let claims = codec
//!     .decode_expecting(&pair.access.token, TokenKind::Access, now)
//!     .unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use issuer::TokenLifetimes;
pub use issuer::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::Principal;
pub use jwt::SigningConfig;
pub use jwt::TokenCodec;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;
