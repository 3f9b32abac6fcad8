//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Development fallback for the token signing secret.
const DEV_JWT_SECRET: &str = "change-me-in-production";

/// Service configuration, built from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// Port the HTTP server binds on.
    pub port: u16,
    /// Secret for token signing and the UA binding hash.
    pub jwt_secret: SecretString,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("INTAKE_API_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INTAKE_API_PORT".to_string(),
                message: format!("expected a port number, got {raw:?}"),
            })?,
            Err(_) => 8080,
        };

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using the development default");
            DEV_JWT_SECRET.to_string()
        });

        Ok(Self {
            port,
            jwt_secret: SecretString::from(jwt_secret),
        })
    }
}
