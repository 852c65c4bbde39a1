//! Challenge-response handshake over chain account keys.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::auth::error::AuthError;
use crate::auth::secrets::SecretStore;
use crate::auth::types::{
    AuthorizeRequest, AuthorizeResponse, GenerateSecretRequest, GenerateSecretResponse,
    GetPublicKeysRequest, PublicKeysResponse,
};
use crate::auth::verifier::{KeyVerifier, SignatureVerifier};
use crate::chain::lookup::ChainLookup;

/// Issues secrets and turns signed secrets into an account permission.
pub struct Authenticator {
    secrets: SecretStore,

    chain: Arc<dyn ChainLookup>,

    verifier: Arc<dyn SignatureVerifier>,

    /// Appended as `user@domain_suffix` before name resolution.
    domain_suffix: String,
}

impl Authenticator {
    /// Create an authenticator verifying secp256k1 signatures.
    pub fn new(chain: Arc<dyn ChainLookup>, domain_suffix: impl Into<String>) -> Self {
        Self::with_verifier(chain, Arc::new(KeyVerifier::new()), domain_suffix)
    }

    pub fn with_verifier(
        chain: Arc<dyn ChainLookup>,
        verifier: Arc<dyn SignatureVerifier>,
        domain_suffix: impl Into<String>,
    ) -> Self {
        Self {
            secrets: SecretStore::new(None),
            chain,
            verifier,
            domain_suffix: domain_suffix.into(),
        }
    }

    /// Expire secrets that stay pending longer than `ttl`.
    ///
    /// Replaces the store, so call it before any secret is issued.
    pub fn with_secret_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.secrets = SecretStore::new(ttl);
        self
    }

    /// Number of channels with a handshake in progress.
    pub fn pending_secrets(&self) -> usize {
        self.secrets.len()
    }

    /// Issue the secret for a channel, or return the one already pending.
    pub fn generate_secret(&self, request: &GenerateSecretRequest) -> GenerateSecretResponse {
        let secret = self.secrets.issue(&request.channel_id);
        debug!("Secret pending for channel {}", request.channel_id);
        GenerateSecretResponse {
            secret: secret.to_hex(),
        }
    }

    /// Verify a signed secret and consume it on success.
    ///
    /// Every failure leaves the pending secret in place so the client can retry.
    pub async fn authorize(
        &self,
        request: &AuthorizeRequest,
    ) -> Result<AuthorizeResponse, AuthError> {
        // 1. A handshake must be in progress
        let stored = self.secrets.peek(&request.channel_id).ok_or_else(|| {
            error!(
                "Auth error -- stored secret does not exist for channel {}",
                request.channel_id
            );
            AuthError::NoPendingChallenge
        })?;

        // 2. Caller must echo the issued secret
        if !stored.matches_hex(&request.secret) {
            warn!(
                "Secret mismatch for channel {} (user {})",
                request.channel_id, request.user
            );
            return Err(AuthError::SecretMismatch);
        }

        // 3. Resolve the account
        let display_name = format!("{}@{}", request.user, self.domain_suffix);
        let account_id = self.chain.resolve_account(&display_name).await?;

        // 4. Candidate keys in canonical form
        let candidates = self.chain.fetch_permissions(&account_id, true).await?;

        // 5. The signed message is always the stored secret
        let message = stored.to_hex();
        let permission = self
            .verifier
            .verify(message.as_bytes(), &request.sign, &candidates)?;

        let Some(permission) = permission else {
            warn!(
                "Public key is not valid for user {} ({}), {} candidates checked",
                request.user,
                account_id,
                candidates.len()
            );
            return Err(AuthError::KeyVerificationFailed);
        };

        // 6. Consume; a concurrent success for the same secret wins the race
        if !self.secrets.consume_if(&request.channel_id, &stored) {
            warn!(
                "Secret for channel {} was consumed concurrently",
                request.channel_id
            );
            return Err(AuthError::NoPendingChallenge);
        }

        info!(
            "Authorized {} ({}) with permission {} on channel {}",
            request.user, account_id, permission, request.channel_id
        );

        Ok(AuthorizeResponse::new(
            account_id,
            request.user.clone(),
            permission,
        ))
    }

    /// Permission keys of an already resolved account, as stored on chain.
    pub async fn get_public_keys(
        &self,
        request: &GetPublicKeysRequest,
    ) -> Result<PublicKeysResponse, AuthError> {
        let public_keys = self.chain.fetch_permissions(&request.user_id, false).await?;
        Ok(PublicKeysResponse { public_keys })
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("domain_suffix", &self.domain_suffix)
            .field("pending_secrets", &self.secrets.len())
            .finish()
    }
}
