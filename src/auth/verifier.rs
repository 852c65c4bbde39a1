//! Signature verification against candidate permission keys.

use log::debug;

use crate::auth::error::AuthError;
use crate::auth::types::PermissionEntry;
use crate::keys::{KeySignature, PublicKey};

/// Resolves which permission, if any, produced a signature.
///
/// This trait abstracts the verification to enable testing with mock implementations.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `message` against each candidate in order.
    ///
    /// Returns the permission of the first matching candidate, `Ok(None)` when
    /// nothing matches, and `MalformedSignature` when the signature text
    /// cannot be parsed at all.
    fn verify(
        &self,
        message: &[u8],
        signature: &str,
        candidates: &[PermissionEntry],
    ) -> Result<Option<String>, AuthError>;
}

/// secp256k1 verifier for `SIG_K1_` signatures and `PUB_K1_` / legacy keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyVerifier;

impl KeyVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerifier for KeyVerifier {
    fn verify(
        &self,
        message: &[u8],
        signature: &str,
        candidates: &[PermissionEntry],
    ) -> Result<Option<String>, AuthError> {
        let signature: KeySignature = signature.parse().map_err(AuthError::MalformedSignature)?;

        for candidate in candidates {
            let Some(key_text) = candidate.public_key.as_deref() else {
                continue;
            };

            let key: PublicKey = match key_text.parse() {
                Ok(key) => key,
                Err(e) => {
                    debug!(
                        "Key cannot be verified -- permission {}: {}",
                        candidate.permission, e
                    );
                    continue;
                }
            };

            match signature.verify(message, &key) {
                Ok(()) => return Ok(Some(candidate.permission.clone())),
                Err(e) => debug!(
                    "Signature does not match permission {}: {}",
                    candidate.permission, e
                ),
            }
        }

        Ok(None)
    }
}
