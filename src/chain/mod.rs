//! Chain node access for the authentication handshake.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌───────────────┐
//! │ ChainClient │────▶│   ChainLookup   │────▶│ Authenticator │
//! │  (reqwest)  │     │     (trait)     │     │               │
//! └─────────────┘     └─────────────────┘     └───────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ chain node  │
//! │  HTTP API   │
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use keyauth::chain::{ChainClient, ChainLookup};
//!
//! let client = ChainClient::new(
//!     "http://127.0.0.1:8888".to_string(),
//!     Duration::from_secs(10),
//!     LegacyKeyConverter::default(),
//! )?;
//! let account = client.resolve_account("alice@commun").await?;
//! let permissions = client.fetch_permissions(&account, true).await?;
//! ```

pub mod client;
pub mod error;
pub mod lookup;
pub mod types;

pub use client::ChainClient;
pub use error::ChainError;
pub use lookup::ChainLookup;
pub use types::{Account, Authority, KeyWeight, Permission, ResolvedName};
