//! Request and response payloads of the handshake operations.
//!
//! Field names follow the camelCase convention of the JSON-RPC clients.

use serde::{Deserialize, Serialize};

/// Canonical chain account identifier.
pub type AccountId = String;

/// One permission of a chain account with its first configured key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    /// Public key text, absent when the permission has no keys.
    pub public_key: Option<String>,

    /// Permission name, e.g. "owner" or "active".
    pub permission: String,
}

impl PermissionEntry {
    pub fn new(public_key: Option<String>, permission: impl Into<String>) -> Self {
        Self {
            public_key,
            permission: permission.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSecretRequest {
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSecretResponse {
    /// Lowercase hex of the issued secret.
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeRequest {
    /// Human-facing username, resolved with the configured domain suffix.
    pub user: String,

    /// `SIG_K1_` signature over the issued secret text.
    pub sign: String,

    /// The secret as returned by `generateSecret`.
    pub secret: String,

    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    /// Same value as `user_id`; kept for older clients.
    pub user: AccountId,
    pub account_id: AccountId,
    pub user_id: AccountId,
    pub username: String,
    pub permission: String,
}

impl AuthorizeResponse {
    pub fn new(account_id: AccountId, username: String, permission: String) -> Self {
        Self {
            user: account_id.clone(),
            user_id: account_id.clone(),
            account_id,
            username,
            permission,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPublicKeysRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeysResponse {
    pub public_keys: Vec<PermissionEntry>,
}
