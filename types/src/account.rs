//! Account identifier type.

use blake2::{Blake2b512, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;
use crate::keys::PublicKey;

/// A 20-byte account identifier.
///
/// Derived from a public key via Blake2b, or parsed from its 40-character
/// hex form (the textual representation used in exclusion-list documents).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId([u8; 20]);

impl AccountId {
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive the account identifier for a public key.
    ///
    /// The key-type tag participates in the digest so an Ed25519 key and a
    /// secp256k1 key with identical bytes map to distinct accounts.
    pub fn from_public_key(key: &PublicKey) -> Self {
        let mut hasher = Blake2b512::new();
        hasher.update([key.key_type() as u8]);
        hasher.update(key.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[..20]);
        Self(bytes)
    }

    /// Parse an account identifier from its 40-character hex form.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let decoded =
            hex::decode(s).map_err(|_| TypeError::InvalidAccountId(s.to_string()))?;
        let bytes: [u8; 20] = decoded
            .try_into()
            .map_err(|_| TypeError::InvalidAccountId(s.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
