//! Client secret configuration and fixed protocol constants

use crate::error::{ClientSecretError, ClientSecretResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Audience Apple expects in a client secret
pub const APPLE_AUDIENCE: &str = "https://appleid.apple.com";

/// JWS algorithm label written to the header
pub const ALGORITHM: &str = "ES256";

/// Default validity window: 180 days
pub const DEFAULT_VALIDITY_SECS: i64 = 180 * 86_400;

/// Longest lifetime Apple accepts for a client secret (six months)
pub const MAX_VALIDITY_SECS: i64 = 15_777_000;

/// Smallest window that still leaves `exp > iat` after the one-second trim
pub const MIN_VALIDITY_SECS: i64 = 2;

/// Tunable parts of the claims payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecretConfig {
    /// Value of the `aud` claim
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Seconds between `iat` and one second past `exp`
    #[serde(default = "default_validity_secs")]
    pub validity_secs: i64,
}

fn default_audience() -> String {
    APPLE_AUDIENCE.to_string()
}

fn default_validity_secs() -> i64 {
    DEFAULT_VALIDITY_SECS
}

impl Default for ClientSecretConfig {
    fn default() -> Self {
        Self {
            audience: default_audience(),
            validity_secs: default_validity_secs(),
        }
    }
}

impl ClientSecretConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> ClientSecretResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ClientSecretError::configuration(format!("malformed JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> ClientSecretResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClientSecretError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Override the validity window
    #[must_use]
    pub fn with_validity_secs(mut self, validity_secs: i64) -> Self {
        self.validity_secs = validity_secs;
        self
    }

    /// Override the audience
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Check the values keep the claims well formed
    pub fn validate(&self) -> ClientSecretResult<()> {
        if self.audience.trim().is_empty() {
            return Err(ClientSecretError::configuration("audience must not be empty"));
        }
        if !(MIN_VALIDITY_SECS..=MAX_VALIDITY_SECS).contains(&self.validity_secs) {
            return Err(ClientSecretError::configuration(format!(
                "validity_secs must be within {MIN_VALIDITY_SECS}..={MAX_VALIDITY_SECS}, got {}",
                self.validity_secs
            )));
        }
        Ok(())
    }
}
