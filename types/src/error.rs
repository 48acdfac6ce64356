//! Shared error type for type-level parsing failures.

use thiserror::Error;

/// Errors produced when parsing the textual forms of core types.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
