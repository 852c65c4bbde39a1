//! The chain query interface consumed by the authenticator.

use async_trait::async_trait;

use crate::auth::error::AuthError;
use crate::auth::types::{AccountId, PermissionEntry};

/// Chain queries the handshake depends on.
///
/// Implementations report failures only as [`AuthError::NameResolution`] or
/// [`AuthError::AccountLookup`] and never retry internally.
#[async_trait]
pub trait ChainLookup: Send + Sync {
    /// Resolve a full `name@domain` to the canonical account identifier.
    async fn resolve_account(&self, display_name: &str) -> Result<AccountId, AuthError>;

    /// Fetch the permissions of an account in the order the chain reports them.
    ///
    /// With `legacy_key_format` set, legacy key text is converted to the
    /// canonical `PUB_K1_` form before it is returned.
    async fn fetch_permissions(
        &self,
        account_id: &str,
        legacy_key_format: bool,
    ) -> Result<Vec<PermissionEntry>, AuthError>;
}
