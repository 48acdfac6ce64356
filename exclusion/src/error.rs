//! Fetch-cycle error type.

use thiserror::Error;

/// Why a single source failed within one fetch cycle.
///
/// These never cross the consensus boundary; they exist so the aggregation
/// step can log the cause and so tests can assert on it. Every variant is
/// handled identically: the source's cached entry is left untouched until
/// the next scheduled cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    BadStatus(u16),

    #[error("malformed exclusion list")]
    Parse,

    #[error("signature verification failed")]
    Verification,
}
