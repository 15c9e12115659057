//! Sign in with Apple client secret builder
//!
//! Apple's token endpoint takes an ES256-signed JWT in place of a static
//! `client_secret`. This crate builds that token from a PKCS#8 `.p8` key:
//!
//! - decode the PEM envelope and PKCS#8 structure
//! - build `{iss, iat, exp, aud, sub}` from one clock reading
//! - sign with ECDSA P-256 / SHA-256 and emit `header.payload.signature`
//!
//! ```no_run
//! let pem = std::fs::read_to_string("AuthKey_ABC123XYZ.p8")?;
//! let secret = appleid_client_secret::build(&pem, "TEAM123", "com.example.app", "ABC123XYZ")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
pub mod claims;
pub mod clock;
pub mod config;
mod error;
mod key;
pub mod logging;

pub use builder::{ClientSecret, ClientSecretBuilder, build};
pub use claims::{ClientSecretClaims, JwsHeader};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    ALGORITHM, APPLE_AUDIENCE, ClientSecretConfig, DEFAULT_VALIDITY_SECS, MAX_VALIDITY_SECS,
    MIN_VALIDITY_SECS,
};
pub use error::*;
