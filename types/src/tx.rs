//! Minimal view of a validated transaction.
//!
//! The consensus engine owns the full transaction representation; the
//! trust-set watchers only need the sender, destination, and memo
//! attachments, so that is all this view carries.

use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// An arbitrary-data attachment on a transaction, used as an out-of-band
/// signalling channel for trust-set publications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub data: Vec<u8>,
}

impl Memo {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

/// A validated transaction as seen by the trust-set watchers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedTx {
    pub sender: AccountId,
    pub destination: Option<AccountId>,
    pub memos: Vec<Memo>,
}

impl ValidatedTx {
    pub fn new(sender: AccountId, destination: Option<AccountId>) -> Self {
        Self {
            sender,
            destination,
            memos: Vec::new(),
        }
    }

    pub fn with_memo(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.memos.push(Memo::new(data));
        self
    }
}
