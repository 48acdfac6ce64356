//! Message signing, used by list issuers and test fixtures.

use ed25519_dalek::{Signer, SigningKey};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use meridian_types::{KeyType, PublicKey};

use crate::hash::sha512_half;

/// Sign `message` with the given 32-byte secret, returning the signature in
/// the hex form carried by signed-list documents.
///
/// Returns `None` if the secret is not a valid scalar for the scheme
/// (possible for secp256k1, never for Ed25519).
pub fn sign_message(message: &[u8], key_type: KeyType, secret: &[u8; 32]) -> Option<String> {
    match key_type {
        KeyType::Ed25519 => {
            let signing_key = SigningKey::from_bytes(secret);
            let sig = signing_key.sign(message);
            Some(hex::encode(sig.to_bytes()))
        }
        KeyType::Secp256k1 => {
            let signing_key = k256::ecdsa::SigningKey::from_bytes(secret.into()).ok()?;
            let digest = sha512_half(message);
            let sig: k256::ecdsa::Signature =
                signing_key.sign_prehash(digest.as_bytes()).ok()?;
            Some(hex::encode(sig.to_bytes()))
        }
    }
}

/// Derive the public key for a 32-byte secret under the given scheme.
pub fn public_key_from_secret(key_type: KeyType, secret: &[u8; 32]) -> Option<PublicKey> {
    match key_type {
        KeyType::Ed25519 => {
            let signing_key = SigningKey::from_bytes(secret);
            Some(PublicKey::new(
                KeyType::Ed25519,
                signing_key.verifying_key().to_bytes().to_vec(),
            ))
        }
        KeyType::Secp256k1 => {
            let signing_key = k256::ecdsa::SigningKey::from_bytes(secret.into()).ok()?;
            let point = signing_key.verifying_key().to_encoded_point(true);
            Some(PublicKey::new(KeyType::Secp256k1, point.as_bytes().to_vec()))
        }
    }
}
