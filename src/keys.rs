//! Text codecs for chain account keys and signatures.
//!
//! Accounts on the chain hold secp256k1 keys. Keys and signatures travel as
//! base58 text with a RIPEMD-160 checksum appended:
//!
//! - legacy public key: `EOS6MRy...` (prefix + base58(point ‖ ripemd160(point)[..4]))
//! - canonical public key: `PUB_K1_...` (checksum over point ‖ "K1")
//! - signature: `SIG_K1_...` (65 bytes: recovery header ‖ r ‖ s, checksum over data ‖ "K1")

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use ripemd::{Digest, Ripemd160};

/// Prefix of canonical public key text.
pub const PUBLIC_KEY_K1_PREFIX: &str = "PUB_K1_";
/// Prefix of signature text.
pub const SIGNATURE_K1_PREFIX: &str = "SIG_K1_";
/// Legacy public key prefixes understood when no explicit list is configured.
pub const DEFAULT_LEGACY_PREFIXES: &[&str] = &["EOS", "GLS"];

const K1_SUFFIX: &[u8] = b"K1";
const CHECKSUM_LEN: usize = 4;
const COMPRESSED_POINT_LEN: usize = 33;
const SIGNATURE_LEN: usize = 65;
// 27 + 4 marks a recoverable signature over a compressed key.
const RECOVERY_HEADER_BASE: u8 = 31;

/// Error type for key and signature parsing.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Unrecognized key format: {0}")]
    UnknownFormat(String),

    #[error("Invalid base58 payload: {0}")]
    Base58(String),

    #[error("Invalid payload size: expected {expected}, got {got}")]
    InvalidSize { expected: usize, got: usize },

    #[error("Checksum mismatch")]
    ChecksumMismatch,

    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

/// A secp256k1 public key taken from an account permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Wrap an existing verifying key.
    pub fn from_verifying_key(inner: VerifyingKey) -> Self {
        Self { inner }
    }

    /// Parse canonical `PUB_K1_` text.
    pub fn from_k1_str(text: &str) -> Result<Self, KeyError> {
        let body = text
            .strip_prefix(PUBLIC_KEY_K1_PREFIX)
            .ok_or_else(|| KeyError::UnknownFormat(text.to_string()))?;
        let point = decode_checked(body, K1_SUFFIX, COMPRESSED_POINT_LEN)?;
        Self::from_sec1(&point)
    }

    /// Parse legacy text carrying the given prefix.
    pub fn from_legacy_str(text: &str, prefix: &str) -> Result<Self, KeyError> {
        let body = text
            .strip_prefix(prefix)
            .ok_or_else(|| KeyError::UnknownFormat(text.to_string()))?;
        let point = decode_checked(body, &[], COMPRESSED_POINT_LEN)?;
        Self::from_sec1(&point)
    }

    fn from_sec1(point: &[u8]) -> Result<Self, KeyError> {
        let inner = VerifyingKey::from_sec1_bytes(point)
            .map_err(|e| KeyError::InvalidPoint(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Compressed SEC1 encoding of the key.
    pub fn to_compressed(&self) -> Vec<u8> {
        self.inner.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Render the key in legacy text form with the given prefix.
    pub fn to_legacy_string(&self, prefix: &str) -> String {
        format!("{}{}", prefix, encode_checked(&self.to_compressed(), &[]))
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    /// Accepts canonical `PUB_K1_` text only.
    ///
    /// Legacy text goes through [`LegacyKeyConverter`] or
    /// [`PublicKey::from_legacy_str`] so the accepted prefixes stay configurable.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_k1_str(text)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            PUBLIC_KEY_K1_PREFIX,
            encode_checked(&self.to_compressed(), K1_SUFFIX)
        )
    }
}

/// Converts legacy public key text to the canonical `PUB_K1_` form.
#[derive(Debug, Clone)]
pub struct LegacyKeyConverter {
    prefixes: Vec<String>,
}

impl Default for LegacyKeyConverter {
    fn default() -> Self {
        Self::new(DEFAULT_LEGACY_PREFIXES.iter().map(|p| p.to_string()).collect())
    }
}

impl LegacyKeyConverter {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Convert `key` when it carries a known legacy prefix.
    ///
    /// Canonical and unrecognised text is returned unchanged, so a key that
    /// still cannot be parsed surfaces later as a failed candidate.
    pub fn convert(&self, key: &str) -> String {
        let Some(prefix) = self.prefixes.iter().find(|p| key.starts_with(p.as_str())) else {
            return key.to_string();
        };
        match PublicKey::from_legacy_str(key, prefix) {
            Ok(public_key) => public_key.to_string(),
            Err(e) => {
                log::debug!("Leaving legacy key {} unconverted: {}", key, e);
                key.to_string()
            }
        }
    }
}

/// A recoverable secp256k1 signature in `SIG_K1_` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySignature {
    header: u8,
    inner: Signature,
}

impl KeySignature {
    /// Build from a signature and its recovery id.
    pub fn from_recoverable(inner: Signature, recovery_id: RecoveryId) -> Self {
        Self {
            header: RECOVERY_HEADER_BASE + recovery_id.to_byte(),
            inner,
        }
    }

    /// Verify this signature over `message` (SHA-256 prehash) against `key`.
    pub fn verify(&self, message: &[u8], key: &PublicKey) -> Result<(), KeyError> {
        let signature = self.inner.normalize_s().unwrap_or_else(|| self.inner.clone());
        key.verifying_key()
            .verify(message, &signature)
            .map_err(|e| KeyError::InvalidSignature(e.to_string()))
    }

    pub fn header(&self) -> u8 {
        self.header
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SIGNATURE_LEN);
        bytes.push(self.header);
        bytes.extend_from_slice(&self.inner.to_bytes());
        bytes
    }
}

impl FromStr for KeySignature {
    type Err = KeyError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let body = text
            .strip_prefix(SIGNATURE_K1_PREFIX)
            .ok_or_else(|| KeyError::UnknownFormat(text.to_string()))?;
        let data = decode_checked(body, K1_SUFFIX, SIGNATURE_LEN)?;
        let inner = Signature::from_slice(&data[1..])
            .map_err(|e| KeyError::InvalidSignature(e.to_string()))?;
        Ok(Self {
            header: data[0],
            inner,
        })
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            SIGNATURE_K1_PREFIX,
            encode_checked(&self.to_bytes(), K1_SUFFIX)
        )
    }
}

fn checksum(data: &[u8], suffix: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.update(suffix);
    let digest = hasher.finalize();
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

fn encode_checked(data: &[u8], suffix: &[u8]) -> String {
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum(data, suffix));
    bs58::encode(payload).into_string()
}

fn decode_checked(body: &str, suffix: &[u8], expected: usize) -> Result<Vec<u8>, KeyError> {
    let mut payload = bs58::decode(body)
        .into_vec()
        .map_err(|e| KeyError::Base58(e.to_string()))?;
    if payload.len() != expected + CHECKSUM_LEN {
        return Err(KeyError::InvalidSize {
            expected: expected + CHECKSUM_LEN,
            got: payload.len(),
        });
    }
    let tail = payload.split_off(expected);
    if tail[..] != checksum(&payload, suffix)[..] {
        return Err(KeyError::ChecksumMismatch);
    }
    Ok(payload)
}
