//! Challenge-response authentication over chain account keys.
//!
//! A client proves control of an account key by signing a server-issued
//! secret. The proof is mapped to the account permission whose key verifies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌───────────────────┐
//! │ SecretStore │────▶│ Authenticator │◀────│ SignatureVerifier │
//! │ (per chan.) │     │               │     │      (trait)      │
//! └─────────────┘     └───────────────┘     └───────────────────┘
//!                             ▲
//!                             │
//!                     ┌───────────────┐
//!                     │  ChainLookup  │
//!                     │    (trait)    │
//!                     └───────────────┘
//! ```
//!
//! # Handshake
//!
//! ```ignore
//! let auth = Authenticator::new(chain, "commun");
//!
//! let GenerateSecretResponse { secret } = auth.generate_secret(&GenerateSecretRequest {
//!     channel_id: "c1".to_string(),
//! });
//!
//! // The client signs `secret` (its ASCII text) with an account key.
//! let response = auth
//!     .authorize(&AuthorizeRequest {
//!         user: "alice".to_string(),
//!         sign: signature,
//!         secret,
//!         channel_id: "c1".to_string(),
//!     })
//!     .await?;
//! assert_eq!(response.permission, "active");
//! ```

pub mod authenticator;
pub mod error;
pub(crate) mod secrets;
pub mod types;
pub mod verifier;

pub use authenticator::Authenticator;
pub use error::{AuthError, ErrorCode};
pub use types::{
    AccountId, AuthorizeRequest, AuthorizeResponse, GenerateSecretRequest,
    GenerateSecretResponse, GetPublicKeysRequest, PermissionEntry, PublicKeysResponse,
};
pub use verifier::{KeyVerifier, SignatureVerifier};
