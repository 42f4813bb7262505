pub mod claims;
pub mod codec;
pub mod config;
pub mod errors;

pub use claims::Claims;
pub use claims::Principal;
pub use claims::TokenKind;
pub use codec::TokenCodec;
pub use config::SigningConfig;
pub use errors::JwtError;
