//! Per-channel storage of issued secrets.
//!
//! Backed by a `moka` cache; with a TTL configured, abandoned handshakes
//! expire on their own.

use std::fmt;
use std::time::Duration;

use moka::ops::compute::{CompResult, Op};
use moka::sync::Cache;
use rand_core::{OsRng, RngCore};
use sha1::{Digest, Sha1};

/// Length of a secret in bytes (SHA-1 output).
pub const SECRET_LEN: usize = 20;

const SEED_LEN: usize = 32;

/// A server-issued challenge.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    /// Derive a fresh secret: SHA-1(random seed ‖ channel id).
    pub fn generate(channel_id: &str) -> Self {
        let mut seed = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut seed);

        let mut hasher = Sha1::new();
        hasher.update(seed);
        hasher.update(channel_id.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Lowercase hex, the form sent to clients and signed by them.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Compare against caller-supplied hex text.
    ///
    /// Text that is not valid hex never matches.
    pub fn matches_hex(&self, candidate: &str) -> bool {
        match hex::decode(candidate) {
            Ok(bytes) => constant_time_eq(&self.0, &bytes),
            Err(_) => false,
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Mapping from channel id to the pending secret of that channel.
pub struct SecretStore {
    pending: Cache<String, Secret>,
}

impl SecretStore {
    /// Create a store; `ttl` of `None` keeps secrets until they are consumed.
    pub fn new(ttl: Option<Duration>) -> Self {
        let builder = Cache::builder();
        let pending = match ttl {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        };
        Self { pending }
    }

    /// Return the pending secret for `channel_id`, issuing one if none exists.
    pub fn issue(&self, channel_id: &str) -> Secret {
        self.pending
            .entry_by_ref(channel_id)
            .or_insert_with(|| Secret::generate(channel_id))
            .into_value()
    }

    pub fn peek(&self, channel_id: &str) -> Option<Secret> {
        self.pending.get(channel_id)
    }

    /// Remove the pending secret; no-op when absent.
    #[allow(dead_code)]
    pub fn consume(&self, channel_id: &str) {
        self.pending.invalidate(channel_id);
    }

    /// Remove the pending secret only if it is still `expected`.
    ///
    /// Returns false when the secret was already consumed or replaced, which
    /// makes at most one caller succeed per issued secret.
    pub fn consume_if(&self, channel_id: &str, expected: &Secret) -> bool {
        let result = self
            .pending
            .entry_by_ref(channel_id)
            .and_compute_with(|entry| match entry {
                Some(entry) if entry.value() == expected => Op::Remove,
                _ => Op::Nop,
            });
        matches!(result, CompResult::Removed(_))
    }

    /// Number of pending secrets.
    pub fn len(&self) -> usize {
        self.pending.run_pending_tasks();
        self.pending.entry_count() as usize
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
