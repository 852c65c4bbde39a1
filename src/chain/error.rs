//! Error types for chain node queries.

use thiserror::Error;

/// Errors specific to chain node connectivity and responses.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Chain node returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode chain response: {0}")]
    Decode(String),

    #[error("Chain node resolved no account for the name")]
    EmptyResolution,
}
