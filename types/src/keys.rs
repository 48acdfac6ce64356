//! Public key type, polymorphic over the two signature schemes the network
//! accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// The signature scheme a public key belongs to.
///
/// Verification is dispatched on this tag; the verification contract is
/// identical across schemes (see `meridian-crypto`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Ed25519,
    Secp256k1,
}

impl KeyType {
    /// The wire name used in signed-list `algorithm` fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::Secp256k1 => "secp256k1",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "ed25519" => Some(KeyType::Ed25519),
            "secp256k1" => Some(KeyType::Secp256k1),
            _ => None,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A public key tagged with its scheme.
///
/// Key bytes are kept unvalidated here; scheme-specific validation happens
/// at verification time, where a malformed key simply fails to verify.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey {
    key_type: KeyType,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(key_type: KeyType, bytes: Vec<u8>) -> Self {
        Self { key_type, bytes }
    }

    /// Parse a key from hex, tagged with the given scheme.
    pub fn from_hex(key_type: KeyType, s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|_| TypeError::InvalidPublicKey(s.to_string()))?;
        Ok(Self { key_type, bytes })
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey({}, {}..)",
            self.key_type,
            hex::encode(&self.bytes[..self.bytes.len().min(4)])
        )
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let key = PublicKey::from_hex(KeyType::Ed25519, &"ab".repeat(32)).unwrap();
        assert_eq!(key.to_hex(), "ab".repeat(32));
        assert_eq!(key.key_type(), KeyType::Ed25519);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(PublicKey::from_hex(KeyType::Secp256k1, "xyz").is_err());
    }

    #[test]
    fn key_type_wire_names() {
        assert_eq!(KeyType::Ed25519.as_str(), "ed25519");
        assert_eq!(KeyType::from_str_opt("secp256k1"), Some(KeyType::Secp256k1));
        assert_eq!(KeyType::from_str_opt("rsa"), None);
    }
}
