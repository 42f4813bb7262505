use std::env;

use auth::JwtError;
use auth::SigningConfig;
use auth::TokenLifetimes;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    pub secret: String,
    #[serde(default = "default_access_token_expiry_minutes")]
    pub access_token_expiry_minutes: i64,
    #[serde(default = "default_refresh_token_expiry_hours")]
    pub refresh_token_expiry_hours: i64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_expiry_minutes() -> i64 {
    10_000
}

fn default_refresh_token_expiry_hours() -> i64 {
    240_000
}

impl JwtConfig {
    /// Build the signing configuration.
    ///
    /// # Errors
    /// * `SigningKeyMisconfigured` - Unsupported algorithm or short secret
    pub fn signing_config(&self) -> Result<SigningConfig, JwtError> {
        SigningConfig::new(&self.algorithm, self.secret.as_bytes())
    }

    /// Build the token lifetimes.
    ///
    /// # Errors
    /// * `SigningKeyMisconfigured` - A lifetime is not positive or out of range
    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, JwtError> {
        let access = Duration::try_minutes(self.access_token_expiry_minutes).ok_or_else(|| {
            JwtError::SigningKeyMisconfigured("access token lifetime out of range".to_string())
        })?;
        let refresh = Duration::try_hours(self.refresh_token_expiry_hours).ok_or_else(|| {
            JwtError::SigningKeyMisconfigured("refresh token lifetime out of range".to_string())
        })?;

        TokenLifetimes::new(access, refresh)
    }
}

// The secret must never reach the logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("secret", &"********")
            .field(
                "access_token_expiry_minutes",
                &self.access_token_expiry_minutes,
            )
            .field(
                "refresh_token_expiry_hours",
                &self.refresh_token_expiry_hours,
            )
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
