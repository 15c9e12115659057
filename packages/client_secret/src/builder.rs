//! Client secret builder
//!
//! Runs the full pipeline for one call: decode the key, build the claims from
//! a single clock reading, sign `base64url(header).base64url(payload)` with
//! ES256 and join the three segments. Nothing is cached between calls.

use crate::{
    claims::{ClientSecretClaims, JwsHeader},
    clock::{Clock, SystemClock},
    config::ClientSecretConfig,
    error::{ClientSecretError, ClientSecretResult},
    key, logging,
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use p256::ecdsa::{Signature, signature::Signer};
use serde::Serialize;

/// Fixed width of an ES256 `R || S` signature
const SIGNATURE_LEN: usize = 64;

/// A signed client secret and the window it is valid for
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ClientSecret {
    /// Compact `header.payload.signature` token
    pub token: String,
    /// `iat` claim (unix seconds)
    pub issued_at: i64,
    /// `exp` claim (unix seconds)
    pub expires_at: i64,
}

impl ClientSecret {
    /// Take the compact token
    #[must_use]
    pub fn into_token(self) -> String {
        self.token
    }
}

impl std::fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecret")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// ES256 client secret builder
///
/// Holds only configuration and a clock, so one instance can be shared across
/// threads and reused for any number of keys.
#[derive(Debug, Clone)]
pub struct ClientSecretBuilder<C = SystemClock> {
    config: ClientSecretConfig,
    clock: C,
}

impl ClientSecretBuilder {
    /// Builder with Apple defaults and the system clock
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ClientSecretConfig::default(),
            clock: SystemClock,
        }
    }
}

impl Default for ClientSecretBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ClientSecretBuilder<C> {
    /// Replace the configuration after validating it
    pub fn with_config(mut self, config: ClientSecretConfig) -> ClientSecretResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Replace the time source
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> ClientSecretBuilder<D> {
        ClientSecretBuilder {
            config: self.config,
            clock,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ClientSecretConfig {
        &self.config
    }

    /// Produce the compact token
    pub fn build(
        &self,
        encoded_private_key: &str,
        issuer: &str,
        subject: &str,
        key_id: &str,
    ) -> ClientSecretResult<String> {
        self.issue(encoded_private_key, issuer, subject, key_id)
            .map(ClientSecret::into_token)
    }

    /// Produce the compact token together with its `iat`/`exp`
    pub fn issue(
        &self,
        encoded_private_key: &str,
        issuer: &str,
        subject: &str,
        key_id: &str,
    ) -> ClientSecretResult<ClientSecret> {
        match self.sign(encoded_private_key, issuer, subject, key_id) {
            Ok(secret) => {
                logging::log_issued(key_id, subject, secret.issued_at, secret.expires_at);
                Ok(secret)
            }
            Err(e) => {
                logging::log_failure(key_id, &e);
                Err(e)
            }
        }
    }

    fn sign(
        &self,
        encoded_private_key: &str,
        issuer: &str,
        subject: &str,
        key_id: &str,
    ) -> ClientSecretResult<ClientSecret> {
        let signing_key = key::load_signing_key(encoded_private_key)?;

        let claims = ClientSecretClaims::new(issuer, subject, self.clock.now(), &self.config);
        let payload_json = serde_json::to_vec(&claims).map_err(ClientSecretError::PayloadEncode)?;

        let header_json = serde_json::to_vec(&JwsHeader::es256(key_id))
            .map_err(|e| ClientSecretError::serialization(format!("header: {e}")))?;

        let header_b64 = URL_SAFE_NO_PAD.encode(&header_json);
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);

        let mut signing_input = String::with_capacity(header_b64.len() + 1 + payload_b64.len());
        signing_input.push_str(&header_b64);
        signing_input.push('.');
        signing_input.push_str(&payload_b64);

        let signature: Signature = signing_key
            .try_sign(signing_input.as_bytes())
            .map_err(ClientSecretError::Signing)?;

        let token = assemble_compact(signing_input, &signature.to_bytes())?;

        Ok(ClientSecret {
            token,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

/// Append the base64url signature segment to `header.payload`
fn assemble_compact(signing_input: String, signature: &[u8]) -> ClientSecretResult<String> {
    if signature.len() != SIGNATURE_LEN {
        return Err(ClientSecretError::serialization(format!(
            "ES256 signature must be {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }
    if signing_input.matches('.').count() != 1 {
        return Err(ClientSecretError::serialization(
            "signing input must have exactly two segments",
        ));
    }

    let signature_b64 = URL_SAFE_NO_PAD.encode(signature);
    let mut token = signing_input;
    token.reserve(1 + signature_b64.len());
    token.push('.');
    token.push_str(&signature_b64);
    Ok(token)
}

/// Build a client secret with Apple defaults and the system clock
///
/// `encoded_private_key` is the PEM text of a PKCS#8 P-256 key (an Apple
/// `.p8` file), `issuer` the team id, `subject` the client id and `key_id`
/// the identifier of the key in the developer account.
pub fn build(
    encoded_private_key: &str,
    issuer: &str,
    subject: &str,
    key_id: &str,
) -> ClientSecretResult<String> {
    ClientSecretBuilder::new().build(encoded_private_key, issuer, subject, key_id)
}
