//! Challenge-response authentication proving control of a chain account key.
//!
//! The server issues a per-channel secret, the client signs it with one of its
//! account keys, and the signature is checked against the account's permission
//! keys fetched from a chain node. The matching permission becomes the
//! authenticated scope.

pub mod auth;
pub mod chain;
pub mod keys;
pub mod rpc;
pub mod settings;

pub use auth::{AuthError, Authenticator, ErrorCode};
pub use chain::{ChainClient, ChainLookup};
pub use settings::ServerSettings;
