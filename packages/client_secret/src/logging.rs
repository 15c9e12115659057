//! Logging setup and secret-safe event helpers
//!
//! The library emits `tracing` events; with the `log` feature they reach
//! `env_logger` when the binary has not installed a subscriber. Private keys
//! and tokens are never logged, and client and key ids only as hash prefixes.

use crate::error::ClientSecretError;
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize `env_logger` once for the process
///
/// Levels come from `RUST_LOG`, e.g. `RUST_LOG=appleid_client_secret=debug`.
pub fn init() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::from_default_env()
            .format_timestamp_micros()
            .init();

        log::debug!("Structured logging initialized");
    });
}

/// Initialize logging for tests without clashing with other test binaries
pub fn init_test() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// Short SHA-256 fingerprint of an identifier
#[must_use]
pub fn fingerprint(value: &str) -> String {
    let hash = hex::encode(Sha256::digest(value.as_bytes()));
    format!("#{}", &hash[..12])
}

pub(crate) fn log_issued(key_id: &str, subject: &str, iat: i64, exp: i64) {
    tracing::debug!(
        kid = %fingerprint(key_id),
        sub = %fingerprint(subject),
        iat,
        exp,
        "client secret issued"
    );
}

pub(crate) fn log_failure(key_id: &str, error: &ClientSecretError) {
    // Display of these errors never includes key bytes
    tracing::warn!(
        kid = %fingerprint(key_id),
        stage = error.kind().as_str(),
        error = %error,
        "client secret build failed"
    );
}
