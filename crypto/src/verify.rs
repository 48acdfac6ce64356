//! Detached signature verification, polymorphic over the two accepted
//! schemes.

use ed25519_dalek::{Verifier, VerifyingKey};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use meridian_types::{KeyType, PublicKey};
use tracing::trace;

use crate::hash::sha512_half;

/// Verify a detached signature over `message` with the given public key.
///
/// - Ed25519 signatures are verified over the raw message and must be
///   exactly 64 bytes.
/// - secp256k1 signatures are ECDSA over `sha512_half(message)` and are
///   accepted in DER or 64-byte fixed form.
///
/// All failures (malformed hex, wrong-length signatures, invalid key
/// bytes, or a signature that simply does not verify) return `false`.
/// Callers cannot distinguish the cases and must treat any `false` as an
/// authentication failure for the content in question.
pub fn verify_signature(message: &[u8], signature_hex: &str, key: &PublicKey) -> bool {
    let Ok(sig_bytes) = hex::decode(signature_hex) else {
        trace!("signature is not valid hex");
        return false;
    };

    match key.key_type() {
        KeyType::Ed25519 => verify_ed25519(message, &sig_bytes, key.as_bytes()),
        KeyType::Secp256k1 => verify_secp256k1(message, &sig_bytes, key.as_bytes()),
    }
}

fn verify_ed25519(message: &[u8], sig_bytes: &[u8], key_bytes: &[u8]) -> bool {
    let Ok(sig_arr) = <[u8; 64]>::try_from(sig_bytes) else {
        trace!(len = sig_bytes.len(), "bad ed25519 signature length");
        return false;
    };
    let Ok(key_arr) = <[u8; 32]>::try_from(key_bytes) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_arr) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&sig_arr);
    verifying_key.verify(message, &sig).is_ok()
}

fn verify_secp256k1(message: &[u8], sig_bytes: &[u8], key_bytes: &[u8]) -> bool {
    let Ok(verifying_key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(key_bytes) else {
        return false;
    };
    let Ok(sig) = k256::ecdsa::Signature::from_der(sig_bytes)
        .or_else(|_| k256::ecdsa::Signature::from_slice(sig_bytes))
    else {
        trace!(len = sig_bytes.len(), "bad secp256k1 signature encoding");
        return false;
    };
    let digest = sha512_half(message);
    verifying_key.verify_prehash(digest.as_bytes(), &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::{public_key_from_secret, sign_message};

    fn ed_key() -> (PublicKey, [u8; 32]) {
        let secret = [11u8; 32];
        (
            public_key_from_secret(KeyType::Ed25519, &secret).unwrap(),
            secret,
        )
    }

    fn secp_key() -> (PublicKey, [u8; 32]) {
        let secret = [13u8; 32];
        (
            public_key_from_secret(KeyType::Secp256k1, &secret).unwrap(),
            secret,
        )
    }

    #[test]
    fn ed25519_round_trip() {
        let (key, secret) = ed_key();
        let sig = sign_message(b"trust list body", KeyType::Ed25519, &secret).unwrap();
        assert!(verify_signature(b"trust list body", &sig, &key));
    }

    #[test]
    fn ed25519_wrong_message_fails() {
        let (key, secret) = ed_key();
        let sig = sign_message(b"original", KeyType::Ed25519, &secret).unwrap();
        assert!(!verify_signature(b"tampered", &sig, &key));
    }

    #[test]
    fn ed25519_rejects_malformed_hex() {
        let (key, _) = ed_key();
        assert!(!verify_signature(b"msg", "zz-not-hex", &key));
    }

    #[test]
    fn ed25519_rejects_wrong_length() {
        let (key, _) = ed_key();
        assert!(!verify_signature(b"msg", &"ab".repeat(16), &key));
    }

    #[test]
    fn secp256k1_round_trip() {
        let (key, secret) = secp_key();
        let sig = sign_message(b"trust list body", KeyType::Secp256k1, &secret).unwrap();
        assert!(verify_signature(b"trust list body", &sig, &key));
    }

    #[test]
    fn secp256k1_wrong_message_fails() {
        let (key, secret) = secp_key();
        let sig = sign_message(b"original", KeyType::Secp256k1, &secret).unwrap();
        assert!(!verify_signature(b"tampered", &sig, &key));
    }

    #[test]
    fn secp256k1_rejects_garbage_signature() {
        let (key, _) = secp_key();
        assert!(!verify_signature(b"msg", &"00".repeat(64), &key));
    }

    #[test]
    fn cross_scheme_signature_fails() {
        // An ed25519 signature presented against a secp256k1 key must fail,
        // and vice versa.
        let (ed_pub, ed_secret) = ed_key();
        let (secp_pub, secp_secret) = secp_key();

        let ed_sig = sign_message(b"msg", KeyType::Ed25519, &ed_secret).unwrap();
        assert!(!verify_signature(b"msg", &ed_sig, &secp_pub));

        let secp_sig = sign_message(b"msg", KeyType::Secp256k1, &secp_secret).unwrap();
        assert!(!verify_signature(b"msg", &secp_sig, &ed_pub));
    }

    #[test]
    fn wrong_key_fails() {
        let (_, secret) = ed_key();
        let other = public_key_from_secret(KeyType::Ed25519, &[99u8; 32]).unwrap();
        let sig = sign_message(b"msg", KeyType::Ed25519, &secret).unwrap();
        assert!(!verify_signature(b"msg", &sig, &other));
    }

    #[test]
    fn invalid_key_bytes_fail_quietly() {
        let bad = PublicKey::new(KeyType::Secp256k1, vec![0u8; 33]);
        assert!(!verify_signature(b"msg", &"ab".repeat(64), &bad));
    }
}
