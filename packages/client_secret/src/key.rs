//! Private key stages: PEM envelope, PKCS#8 structure, ES256 signer
//!
//! Each stage maps its failures to its own error variant. Decoded key bytes
//! live in a zeroizing buffer and are dropped before the call returns.

use crate::error::{ClientSecretError, ClientSecretResult, SignerRejection};
use p256::{
    ecdsa::SigningKey,
    pkcs8::{ObjectIdentifier, PrivateKeyInfo},
};
use zeroize::Zeroizing;

const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const ID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");
const ID_X25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.110");

const PRIME256V1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");
const SECP256K1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// Private key types a PKCS#8 container is accepted with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAlgorithm {
    Ec,
    Rsa,
    Ed25519,
    X25519,
}

const KEY_ALGORITHMS: [(ObjectIdentifier, KeyAlgorithm); 4] = [
    (ID_EC_PUBLIC_KEY, KeyAlgorithm::Ec),
    (RSA_ENCRYPTION, KeyAlgorithm::Rsa),
    (ID_ED25519, KeyAlgorithm::Ed25519),
    (ID_X25519, KeyAlgorithm::X25519),
];

const NAMED_CURVES: [(ObjectIdentifier, &str); 4] = [
    (PRIME256V1, "P-256"),
    (SECP384R1, "P-384"),
    (SECP521R1, "P-521"),
    (SECP256K1, "secp256k1"),
];

impl KeyAlgorithm {
    fn from_oid(oid: ObjectIdentifier) -> Option<Self> {
        KEY_ALGORITHMS
            .iter()
            .find(|(known, _)| *known == oid)
            .map(|(_, algorithm)| *algorithm)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Ec => "EC",
            Self::Rsa => "RSA",
            Self::Ed25519 => "Ed25519",
            Self::X25519 => "X25519",
        }
    }
}

fn curve_name(oid: ObjectIdentifier) -> String {
    NAMED_CURVES
        .iter()
        .find(|(known, _)| *known == oid)
        .map_or_else(|| oid.to_string(), |(_, name)| (*name).to_string())
}

/// Stage 1: unwrap exactly one PEM block into its DER payload
pub(crate) fn decode_envelope(encoded: &str) -> ClientSecretResult<Zeroizing<Vec<u8>>> {
    let mut blocks = pem::parse_many(encoded)
        .map_err(|e| ClientSecretError::key_decode(format!("malformed PEM: {e}")))?;

    let count = blocks.len();
    match (blocks.pop(), count) {
        (Some(block), 1) => Ok(Zeroizing::new(block.into_contents())),
        (None, _) => Err(ClientSecretError::key_decode("no PEM block found")),
        (Some(_), n) => Err(ClientSecretError::key_decode(format!(
            "expected a single PEM block, found {n}"
        ))),
    }
}

/// Outcome of stage 2: a classified key, decoded as far as this crate can
#[derive(Debug)]
pub(crate) enum ParsedKey {
    /// EC key on P-256 with a valid private scalar
    P256(p256::SecretKey),
    /// EC key on some other named curve
    OtherCurve(ObjectIdentifier),
    /// EC key whose parameters are absent or not a curve OID
    UnnamedCurve,
    /// Recognised PKCS#8 key that is not an EC key
    NotEc(KeyAlgorithm),
}

/// Stage 2: read the PKCS#8 `PrivateKeyInfo`, classify its key type and
/// decode the inner P-256 private key
pub(crate) fn parse_pkcs8(der: &[u8]) -> ClientSecretResult<ParsedKey> {
    let info = PrivateKeyInfo::try_from(der)
        .map_err(|e| ClientSecretError::key_parse(format!("invalid PKCS#8 structure: {e}")))?;

    let algorithm = KeyAlgorithm::from_oid(info.algorithm.oid).ok_or_else(|| {
        ClientSecretError::key_parse(format!("unsupported key type {}", info.algorithm.oid))
    })?;
    if algorithm != KeyAlgorithm::Ec {
        return Ok(ParsedKey::NotEc(algorithm));
    }

    match info.algorithm.parameters_oid() {
        Ok(curve) if curve == PRIME256V1 => p256::SecretKey::try_from(info)
            .map(ParsedKey::P256)
            .map_err(|e| ClientSecretError::key_parse(format!("malformed P-256 private key: {e}"))),
        Ok(curve) => Ok(ParsedKey::OtherCurve(curve)),
        Err(_) => Ok(ParsedKey::UnnamedCurve),
    }
}

/// Stage 3: bind a parsed key to ECDSA P-256 / SHA-256
pub(crate) fn init_signer(key: ParsedKey) -> Result<SigningKey, SignerRejection> {
    match key {
        ParsedKey::P256(secret) => Ok(SigningKey::from(secret)),
        ParsedKey::OtherCurve(curve) => Err(SignerRejection::CurveMismatch {
            curve: curve_name(curve),
        }),
        ParsedKey::UnnamedCurve => Err(SignerRejection::MissingCurve),
        ParsedKey::NotEc(algorithm) => Err(SignerRejection::NotEllipticCurve {
            algorithm: algorithm.name(),
        }),
    }
}

/// Run stages 1-3 and return a ready ES256 signing key
pub(crate) fn load_signing_key(encoded: &str) -> ClientSecretResult<SigningKey> {
    let der = decode_envelope(encoded)?;
    let key = parse_pkcs8(&der)?;
    Ok(init_signer(key)?)
}
