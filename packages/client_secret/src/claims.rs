//! JWS header and claims payload of a client secret
//!
//! Field declaration order is the serialized order; Apple only reads the
//! names, but the payload must be byte-stable for a frozen clock.

use crate::config::{ALGORITHM, ClientSecretConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Protected header: `{"alg":"ES256","kid":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsHeader {
    /// Signature algorithm
    pub alg: String,
    /// Key identifier Apple uses to select the public key
    pub kid: String,
}

impl JwsHeader {
    /// ES256 header for the given key identifier
    #[must_use]
    pub fn es256(kid: impl Into<String>) -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            kid: kid.into(),
        }
    }
}

/// Client secret claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecretClaims {
    /// Team identifier
    pub iss: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Identity provider audience
    pub aud: String,
    /// Client (services) identifier
    pub sub: String,
}

impl ClientSecretClaims {
    /// Derive both timestamps from a single clock reading
    ///
    /// `config` is expected to have passed [`ClientSecretConfig::validate`].
    #[must_use]
    pub(crate) fn new(
        issuer: impl Into<String>,
        subject: impl Into<String>,
        issued_at: DateTime<Utc>,
        config: &ClientSecretConfig,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            iss: issuer.into(),
            iat,
            exp: iat.saturating_add(config.validity_secs).saturating_sub(1),
            aud: config.audience.clone(),
            sub: subject.into(),
        }
    }
}
