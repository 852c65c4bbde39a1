//! Chain client for the node's HTTP JSON API.
//!
//! Queries `resolve_names` and `get_account` and maps the results onto the
//! permission candidates the handshake verifies against.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::error::AuthError;
use crate::auth::types::{AccountId, PermissionEntry};
use crate::chain::error::ChainError;
use crate::chain::lookup::ChainLookup;
use crate::chain::types::{Account, GetAccountParams, ResolvedName};
use crate::keys::LegacyKeyConverter;

const RESOLVE_NAMES_PATH: &str = "/v1/chain/resolve_names";
const GET_ACCOUNT_PATH: &str = "/v1/chain/get_account";

/// HTTP client for a chain node.
pub struct ChainClient {
    /// Base URL of the node, without a trailing slash.
    http_url: String,

    http: reqwest::Client,

    legacy_keys: LegacyKeyConverter,
}

impl ChainClient {
    /// Create a new chain client.
    ///
    /// No request is made until the first query.
    pub fn new(
        http_url: String,
        timeout: Duration,
        legacy_keys: LegacyKeyConverter,
    ) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http_url: http_url.trim_end_matches('/').to_string(),
            http,
            legacy_keys,
        })
    }

    /// Resolve `name@domain` names to account records.
    pub async fn resolve_names(&self, names: &[&str]) -> Result<Vec<ResolvedName>, ChainError> {
        self.post(RESOLVE_NAMES_PATH, &names).await
    }

    /// Fetch raw account data.
    pub async fn get_account(&self, account_name: &str) -> Result<Account, ChainError> {
        self.post(GET_ACCOUNT_PATH, &GetAccountParams { account_name })
            .await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ChainError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.http_url, path);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ChainError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ChainError::Decode(e.to_string()))
    }
}

/// Map account permissions onto verification candidates, keeping chain order.
///
/// Only the first key of each permission is used.
pub fn permission_entries(
    account: &Account,
    legacy_keys: Option<&LegacyKeyConverter>,
) -> Vec<PermissionEntry> {
    account
        .permissions
        .iter()
        .map(|permission| {
            let public_key = permission.required_auth.keys.first().map(|k| match legacy_keys {
                Some(converter) => converter.convert(&k.key),
                None => k.key.clone(),
            });
            PermissionEntry::new(public_key, permission.perm_name.clone())
        })
        .collect()
}

#[async_trait]
impl ChainLookup for ChainClient {
    async fn resolve_account(&self, display_name: &str) -> Result<AccountId, AuthError> {
        let resolved = self
            .resolve_names(&[display_name])
            .await
            .and_then(|names| {
                names
                    .into_iter()
                    .next()
                    .map(|n| n.resolved_username)
                    .ok_or(ChainError::EmptyResolution)
            });

        resolved.map_err(|e| {
            error!("Error resolve_names for ({}): {}", display_name, e);
            AuthError::NameResolution {
                name: display_name.to_string(),
                source: e,
            }
        })
    }

    async fn fetch_permissions(
        &self,
        account_id: &str,
        legacy_key_format: bool,
    ) -> Result<Vec<PermissionEntry>, AuthError> {
        let account = self.get_account(account_id).await.map_err(|e| {
            error!("Error get_account for ({}): {}", account_id, e);
            AuthError::AccountLookup {
                account: account_id.to_string(),
                source: e,
            }
        })?;

        let converter = legacy_key_format.then_some(&self.legacy_keys);
        Ok(permission_entries(&account, converter))
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("http_url", &self.http_url)
            .field("legacy_prefixes", &self.legacy_keys.prefixes())
            .finish()
    }
}
