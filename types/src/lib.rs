//! Fundamental types for the Meridian trust-set subsystem.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account identifiers, digests, public keys, ledger indices,
//! network rule gates, and the validated-transaction view consumed by the
//! on-chain watchers.

pub mod account;
pub mod error;
pub mod hash;
pub mod keys;
pub mod ledger;
pub mod rules;
pub mod tx;

pub use account::AccountId;
pub use error::TypeError;
pub use hash::Digest256;
pub use keys::{KeyType, PublicKey};
pub use ledger::{is_flag_ledger, LedgerIndex, FLAG_LEDGER_INTERVAL};
pub use rules::{Feature, Rules};
pub use tx::{Memo, ValidatedTx};
