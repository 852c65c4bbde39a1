//! JSON-RPC 2.0 routing of the handshake operations.
//!
//! Each text frame carries one request; the reply echoes its `id`.

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{AuthError, Authenticator};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GenerateSecret,
    Authorize,
    GetPublicKeys,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Method> {
        match name {
            "auth.generateSecret" => Some(Method::GenerateSecret),
            "auth.authorize" => Some(Method::Authorize),
            "auth.getPublicKeys" => Some(Method::GetPublicKeys),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,

    #[serde(default)]
    pub id: Value,

    pub method: String,

    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<AuthError> for RpcError {
    fn from(e: AuthError) -> Self {
        RpcError::new(e.code().as_i64(), e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,

    pub id: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Handle one text frame and return the serialized reply.
pub async fn handle_text(authenticator: &Authenticator, text: &str) -> String {
    let response = match serde_json::from_str::<Value>(text) {
        Ok(value) => match serde_json::from_value::<RpcRequest>(value) {
            Ok(request) => dispatch(authenticator, request).await,
            Err(e) => RpcResponse::failure(Value::Null, RpcError::new(INVALID_REQUEST, e.to_string())),
        },
        Err(e) => RpcResponse::failure(Value::Null, RpcError::new(PARSE_ERROR, e.to_string())),
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"{}"}}}}"#,
            INTERNAL_ERROR, e
        )
    })
}

/// Route a parsed request to the authenticator.
pub async fn dispatch(authenticator: &Authenticator, request: RpcRequest) -> RpcResponse {
    let id = request.id;
    if request.jsonrpc != JSONRPC_VERSION {
        return RpcResponse::failure(
            id,
            RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\""),
        );
    }

    let Some(method) = Method::from_name(&request.method) else {
        debug!("Unknown method: {}", request.method);
        return RpcResponse::failure(
            id,
            RpcError::new(METHOD_NOT_FOUND, format!("Unknown method: {}", request.method)),
        );
    };

    let outcome = match method {
        Method::GenerateSecret => match params(request.params) {
            Ok(p) => to_result(Ok(authenticator.generate_secret(&p))),
            Err(e) => Err(e),
        },
        Method::Authorize => match params(request.params) {
            Ok(p) => to_result(authenticator.authorize(&p).await),
            Err(e) => Err(e),
        },
        Method::GetPublicKeys => match params(request.params) {
            Ok(p) => to_result(authenticator.get_public_keys(&p).await),
            Err(e) => Err(e),
        },
    };

    match outcome {
        Ok(result) => RpcResponse::success(id, result),
        Err(error) => RpcResponse::failure(id, error),
    }
}

fn params<T: DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    serde_json::from_value(params).map_err(|e| RpcError::new(INVALID_PARAMS, e.to_string()))
}

fn to_result<T: Serialize>(outcome: Result<T, AuthError>) -> Result<Value, RpcError> {
    let value = outcome?;
    serde_json::to_value(value).map_err(|e| RpcError::new(INTERNAL_ERROR, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::types::{AccountId, PermissionEntry};
    use crate::chain::error::ChainError;
    use crate::chain::lookup::ChainLookup;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct OfflineChain;

    #[async_trait]
    impl ChainLookup for OfflineChain {
        async fn resolve_account(&self, display_name: &str) -> Result<AccountId, AuthError> {
            Err(AuthError::NameResolution {
                name: display_name.to_string(),
                source: ChainError::EmptyResolution,
            })
        }

        async fn fetch_permissions(
            &self,
            account_id: &str,
            _legacy_key_format: bool,
        ) -> Result<Vec<PermissionEntry>, AuthError> {
            Ok(vec![PermissionEntry::new(
                Some(format!("GLS-{}", account_id)),
                "active",
            )])
        }
    }

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(OfflineChain), "commun")
    }

    async fn call(auth: &Authenticator, request: Value) -> Value {
        let text = handle_text(auth, &request.to_string()).await;
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::from_name("auth.generateSecret"), Some(Method::GenerateSecret));
        assert_eq!(Method::from_name("auth.authorize"), Some(Method::Authorize));
        assert_eq!(Method::from_name("auth.getPublicKeys"), Some(Method::GetPublicKeys));
        assert_eq!(Method::from_name("auth.logout"), None);
    }

    #[tokio::test]
    async fn test_generate_secret_round() {
        let auth = authenticator();
        let reply = call(
            &auth,
            json!({"jsonrpc": "2.0", "id": 7, "method": "auth.generateSecret", "params": {"channelId": "c1"}}),
        )
        .await;
        assert_eq!(reply["id"], 7);
        assert_eq!(reply["result"]["secret"].as_str().unwrap().len(), 40);
        assert!(reply.get("error").is_none());
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let auth = authenticator();

        let text = handle_text(&auth, "{not json").await;
        let reply: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reply["error"]["code"], PARSE_ERROR);

        let reply = call(&auth, json!({"id": 1, "method": "auth.authorize"})).await;
        assert_eq!(reply["error"]["code"], INVALID_REQUEST);

        let reply = call(&auth, json!({"jsonrpc": "2.0", "id": 2, "method": "auth.nope"})).await;
        assert_eq!(reply["error"]["code"], METHOD_NOT_FOUND);

        let reply = call(
            &auth,
            json!({"jsonrpc": "2.0", "id": 3, "method": "auth.authorize", "params": {"user": "alice"}}),
        )
        .await;
        assert_eq!(reply["error"]["code"], INVALID_PARAMS);

        let reply = call(
            &auth,
            json!({"jsonrpc": "2.0", "id": 4, "method": "auth.generateSecret", "params": {"channelId": 5}}),
        )
        .await;
        assert_eq!(reply["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_auth_errors_carry_stable_codes() {
        let auth = authenticator();
        let reply = call(
            &auth,
            json!({
                "jsonrpc": "2.0",
                "id": "a",
                "method": "auth.authorize",
                "params": {"user": "alice", "sign": "SIG_K1_x", "secret": "00", "channelId": "c1"}
            }),
        )
        .await;
        assert_eq!(reply["id"], "a");
        assert_eq!(reply["error"]["code"], 1102);

        let secret = auth
            .generate_secret(&crate::auth::GenerateSecretRequest {
                channel_id: "c1".to_string(),
            })
            .secret;
        let reply = call(
            &auth,
            json!({
                "jsonrpc": "2.0",
                "id": "b",
                "method": "auth.authorize",
                "params": {"user": "alice", "sign": "SIG_K1_x", "secret": secret, "channelId": "c1"}
            }),
        )
        .await;
        assert_eq!(reply["error"]["code"], 1105);
        assert_eq!(reply["error"]["message"], "Can't resolve name: alice@commun");
    }

    #[tokio::test]
    async fn test_get_public_keys_passthrough() {
        let auth = authenticator();
        let reply = call(
            &auth,
            json!({"jsonrpc": "2.0", "id": 9, "method": "auth.getPublicKeys", "params": {"userId": "tst1abcdefgh"}}),
        )
        .await;
        assert_eq!(
            reply["result"]["publicKeys"],
            json!([{"publicKey": "GLS-tst1abcdefgh", "permission": "active"}])
        );
    }
}
