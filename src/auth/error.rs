//! Error taxonomy for the authentication handshake.

use thiserror::Error;

use crate::chain::error::ChainError;
use crate::keys::KeyError;

/// Stable numeric codes reported to clients.
///
/// The values are part of the wire contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum ErrorCode {
    NoPendingChallenge = 1102,
    SecretMismatch = 1103,
    KeyVerificationFailed = 1104,
    NameResolution = 1105,
    MalformedSignature = 1106,
    AccountLookup = 1107,
}

impl ErrorCode {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(value: i64) -> Option<ErrorCode> {
        match value {
            1102 => Some(ErrorCode::NoPendingChallenge),
            1103 => Some(ErrorCode::SecretMismatch),
            1104 => Some(ErrorCode::KeyVerificationFailed),
            1105 => Some(ErrorCode::NameResolution),
            1106 => Some(ErrorCode::MalformedSignature),
            1107 => Some(ErrorCode::AccountLookup),
            _ => None,
        }
    }
}

/// Failures of the three handshake operations.
///
/// `NameResolution` and `AccountLookup` are infrastructure failures raised by
/// the chain collaborator. Every other variant is an expected denial.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("There is no secret stored for this channelId. Probably, client's already authorized")]
    NoPendingChallenge,

    #[error("Secret verification failed - access denied")]
    SecretMismatch,

    #[error("Public key verification failed - access denied")]
    KeyVerificationFailed,

    #[error("Can't resolve name: {name}")]
    NameResolution {
        name: String,
        #[source]
        source: ChainError,
    },

    #[error("Sign is not a valid signature")]
    MalformedSignature(#[source] KeyError),

    #[error("Cannot get such account from BC: {account}")]
    AccountLookup {
        account: String,
        #[source]
        source: ChainError,
    },
}

impl AuthError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::NoPendingChallenge => ErrorCode::NoPendingChallenge,
            AuthError::SecretMismatch => ErrorCode::SecretMismatch,
            AuthError::KeyVerificationFailed => ErrorCode::KeyVerificationFailed,
            AuthError::NameResolution { .. } => ErrorCode::NameResolution,
            AuthError::MalformedSignature(_) => ErrorCode::MalformedSignature,
            AuthError::AccountLookup { .. } => ErrorCode::AccountLookup,
        }
    }

    /// True for failures of the chain collaborator rather than of the client's proof.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AuthError::NameResolution { .. } | AuthError::AccountLookup { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(AuthError::NoPendingChallenge.code().as_i64(), 1102);
        assert_eq!(AuthError::SecretMismatch.code().as_i64(), 1103);
        assert_eq!(AuthError::KeyVerificationFailed.code().as_i64(), 1104);
        assert_eq!(
            AuthError::MalformedSignature(KeyError::ChecksumMismatch)
                .code()
                .as_i64(),
            1106
        );

        for code in 1102..=1107 {
            assert_eq!(ErrorCode::from_i64(code).unwrap().as_i64(), code);
        }
        assert!(ErrorCode::from_i64(1101).is_none());
    }

    #[test]
    fn test_infrastructure_split() {
        let resolution = AuthError::NameResolution {
            name: "bob@commun".to_string(),
            source: ChainError::EmptyResolution,
        };
        assert!(resolution.is_infrastructure());
        assert_eq!(resolution.to_string(), "Can't resolve name: bob@commun");

        let lookup = AuthError::AccountLookup {
            account: "bob".to_string(),
            source: ChainError::Http("connection refused".to_string()),
        };
        assert!(lookup.is_infrastructure());
        assert_eq!(lookup.code(), ErrorCode::AccountLookup);

        assert!(!AuthError::SecretMismatch.is_infrastructure());
        assert!(!AuthError::KeyVerificationFailed.is_infrastructure());
        assert!(!AuthError::NoPendingChallenge.is_infrastructure());
    }
}
