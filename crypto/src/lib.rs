//! Signature verification and digests for the Meridian trust-set subsystem.
//!
//! Two signature schemes are accepted network-wide: Ed25519 and secp256k1
//! ECDSA. The verification contract is identical for both (a detached
//! signature over a message, checked against a tagged public key), so the
//! scheme is a tagged variant on [`meridian_types::PublicKey`], not a trait
//! hierarchy.

pub mod hash;
pub mod sign;
pub mod verify;

pub use hash::sha512_half;
pub use sign::{public_key_from_secret, sign_message};
pub use verify::verify_signature;
