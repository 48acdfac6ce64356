//! Validator-vote pseudo-transactions and the consensus initial position.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::error;

use meridian_crypto::sha512_half;
use meridian_types::{AccountId, Digest256, LedgerIndex, PublicKey};

/// A pseudo-transaction folding one validator's vote into consensus.
///
/// Not signed and not relayed; every honest node derives the identical set
/// from the validations it saw, so identical ids converge in the position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidatorVoteTx {
    pub network_id: u32,
    pub validator_key: PublicKey,
    pub ledger_seq: LedgerIndex,
    pub ledger_hash: Digest256,
    pub validation_hash: Digest256,
    pub vote_time: Option<u64>,
    pub exclusion_add: Option<AccountId>,
    pub exclusion_remove: Option<AccountId>,
}

impl ValidatorVoteTx {
    /// Deterministic transaction id over the serialized contents.
    ///
    /// The zero digest is reserved as the failure value; every serializable
    /// tx hashes to a non-zero id.
    pub fn id(&self) -> Digest256 {
        // bincode handles every field here (integers, options, strings,
        // fixed-size byte wrappers); a failure indicates corrupted state.
        match bincode::serialize(self) {
            Ok(bytes) => sha512_half(&bytes),
            Err(err) => {
                error!(%err, "vote tx failed to serialize");
                Digest256::ZERO
            }
        }
    }
}

/// The set of pseudo-transactions proposed at ledger close, keyed by id.
#[derive(Default)]
pub struct InitialPosition {
    txs: BTreeMap<Digest256, ValidatorVoteTx>,
}

impl InitialPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pseudo-transaction. Returns `false` when an identical one
    /// is already present or the tx has no valid id.
    pub fn insert(&mut self, tx: ValidatorVoteTx) -> bool {
        let id = tx.id();
        if id.is_zero() {
            return false;
        }
        self.txs.insert(id, tx).is_none()
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Digest256, &ValidatorVoteTx)> {
        self.txs.iter()
    }
}
