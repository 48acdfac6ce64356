//! Content digests.

use meridian_types::Digest256;
use sha2::{Digest, Sha512};

/// First half of a SHA-512 digest.
///
/// This is the content-hash function for fetched trust-list documents and
/// the prehash for secp256k1 signatures.
pub fn sha512_half(data: &[u8]) -> Digest256 {
    let digest = Sha512::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest[..32]);
    Digest256::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(sha512_half(b"abc"), sha512_half(b"abc"));
        assert_ne!(sha512_half(b"abc"), sha512_half(b"abd"));
    }

    #[test]
    fn known_vector() {
        // SHA-512("abc") begins ddaf35a1...
        let d = sha512_half(b"abc");
        assert!(d.to_hex().starts_with("ddaf35a1"));
    }

    #[test]
    fn empty_input() {
        let d = sha512_half(b"");
        assert!(!d.is_zero());
    }
}
