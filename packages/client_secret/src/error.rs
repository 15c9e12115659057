//! Client secret error types
//!
//! Each variant corresponds to one stage of the build pipeline, so a caller
//! can tell a bad key apart from a failure inside the signer.

use thiserror::Error;

/// Client secret operation result type
pub type ClientSecretResult<T> = Result<T, ClientSecretError>;

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// PEM envelope could not be decoded
    KeyDecode,
    /// DER payload is not a usable PKCS#8 private key
    KeyParse,
    /// Key cannot back an ES256 signer
    SignerInit,
    /// Claims could not be serialized
    PayloadEncode,
    /// ECDSA signing failed
    Signing,
    /// Compact token could not be assembled
    Serialization,
    /// Builder configuration was rejected
    Configuration,
}

impl ErrorKind {
    /// Stable name used in log records
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::KeyDecode => "key_decode",
            ErrorKind::KeyParse => "key_parse",
            ErrorKind::SignerInit => "signer_init",
            ErrorKind::PayloadEncode => "payload_encode",
            ErrorKind::Signing => "signing",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason the ES256 signer refused a parsed private key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerRejection {
    /// Key type is a valid PKCS#8 algorithm but not an EC key
    #[error("{algorithm} keys cannot produce ES256 signatures")]
    NotEllipticCurve {
        /// Human-readable key type
        algorithm: &'static str,
    },

    /// EC key is bound to a curve other than P-256
    #[error("EC key is on curve {curve}, ES256 requires P-256")]
    CurveMismatch {
        /// Curve name or OID found in the key
        curve: String,
    },

    /// EC key carries no named-curve parameter
    #[error("EC key does not name its curve")]
    MissingCurve,
}

/// Client secret error types
#[derive(Debug, Error)]
pub enum ClientSecretError {
    /// Input is not a single well-formed PEM block
    #[error("Failed to decode private key envelope: {0}")]
    KeyDecode(String),

    /// Decoded bytes are not a valid or supported PKCS#8 private key
    #[error("Failed to parse PKCS#8 private key: {0}")]
    KeyParse(String),

    /// Key does not match the ES256 algorithm
    #[error("Failed to initialize ES256 signer: {0}")]
    SignerInit(#[from] SignerRejection),

    /// Claims could not be serialized to JSON
    #[error("Failed to encode claims payload: {0}")]
    PayloadEncode(#[source] serde_json::Error),

    /// ECDSA signing operation failed
    #[error("Signing failed: {0}")]
    Signing(#[source] p256::ecdsa::Error),

    /// Compact serialization could not be assembled
    #[error("Failed to assemble compact token: {0}")]
    Serialization(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientSecretError {
    /// Create a key decode error
    pub fn key_decode(msg: impl Into<String>) -> Self {
        Self::KeyDecode(msg.into())
    }

    /// Create a key parse error
    pub fn key_parse(msg: impl Into<String>) -> Self {
        Self::KeyParse(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Stage that produced this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyDecode(_) => ErrorKind::KeyDecode,
            Self::KeyParse(_) => ErrorKind::KeyParse,
            Self::SignerInit(_) => ErrorKind::SignerInit,
            Self::PayloadEncode(_) => ErrorKind::PayloadEncode,
            Self::Signing(_) => ErrorKind::Signing,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Signer rejection cause, if this is a [`ClientSecretError::SignerInit`]
    #[must_use]
    pub fn signer_rejection(&self) -> Option<&SignerRejection> {
        match self {
            Self::SignerInit(rejection) => Some(rejection),
            _ => None,
        }
    }
}
