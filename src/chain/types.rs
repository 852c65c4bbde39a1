//! Wire types of the chain node HTTP API.

use serde::{Deserialize, Serialize};

/// Request body of `/v1/chain/get_account`.
#[derive(Debug, Clone, Serialize)]
pub struct GetAccountParams<'a> {
    pub account_name: &'a str,
}

/// One entry of the `/v1/chain/resolve_names` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedName {
    #[serde(default)]
    pub resolved_domain: Option<String>,

    pub resolved_username: String,
}

/// Account data returned by `/v1/chain/get_account`.
///
/// Only the fields the handshake needs are decoded; the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub account_name: String,

    #[serde(default)]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Permission {
    pub perm_name: String,

    #[serde(default)]
    pub parent: String,

    pub required_auth: Authority,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Authority {
    #[serde(default)]
    pub threshold: u32,

    #[serde(default)]
    pub keys: Vec<KeyWeight>,

    #[serde(default)]
    pub accounts: Vec<serde_json::Value>,

    #[serde(default)]
    pub waits: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyWeight {
    pub key: String,

    #[serde(default)]
    pub weight: u16,
}
