//! Per-ledger validator vote collection.
//!
//! Votes arrive with validations throughout a ledger's lifetime and are
//! bucketed by ledger sequence. At ledger close, each validator's vote for
//! the closing ledger is folded into the initial position exactly once; a
//! per-ledger processed set guards against double-counting when the same
//! validation is seen twice. Buckets older than the retention window are
//! dropped.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use tracing::{debug, trace};

use meridian_types::{AccountId, Digest256, Feature, LedgerIndex, PublicKey};

use crate::ledger::LedgerView;
use crate::pseudo_tx::{InitialPosition, ValidatorVoteTx};

/// Ledgers of vote history kept after each close.
pub const VOTE_RETENTION_LEDGERS: LedgerIndex = 10;

/// One validator's vote, carried alongside its validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vote {
    pub validator_key: PublicKey,
    pub ledger_hash: Digest256,
    pub ledger_seq: LedgerIndex,
    pub validation_hash: Digest256,
    pub vote_time: Option<u64>,
    pub exclusion_add: Option<AccountId>,
    pub exclusion_remove: Option<AccountId>,
}

#[derive(Default)]
struct TrackerState {
    votes_by_ledger: HashMap<LedgerIndex, Vec<Vote>>,
    /// Validators already folded into a position, per ledger.
    processed: HashMap<LedgerIndex, BTreeSet<PublicKey>>,
}

/// Collects validator votes and emits pseudo-transactions at ledger close.
pub struct ValidatorVoteTracker {
    network_id: u32,
    state: Mutex<TrackerState>,
}

impl ValidatorVoteTracker {
    pub fn new(network_id: u32) -> Self {
        Self {
            network_id,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Record a vote seen with a validation. Votes are buffered as-is;
    /// deduplication happens at aggregation time.
    pub fn record_vote(&self, vote: Vote) {
        trace!(
            validator = %vote.validator_key,
            ledger_seq = vote.ledger_seq,
            "recording validator vote"
        );
        let mut state = self.state.lock().unwrap();
        state
            .votes_by_ledger
            .entry(vote.ledger_seq)
            .or_default()
            .push(vote);
    }

    /// Fold votes for the closing ledger into `position`.
    ///
    /// `parent_validations` are votes attached to validations of the parent
    /// ledger that arrived with the close; they are recorded first so they
    /// participate in this aggregation. Each validator contributes at most
    /// one pseudo-transaction per ledger, across repeated calls. Finishes by
    /// dropping buckets outside the retention window.
    pub fn do_voting(
        &self,
        view: &dyn LedgerView,
        parent_validations: &[Vote],
        position: &mut InitialPosition,
    ) {
        if !view.rules().enabled(Feature::ValidatorVoteTracking) {
            return;
        }
        for vote in parent_validations {
            self.record_vote(vote.clone());
        }

        let seq = view.seq();
        let mut state = self.state.lock().unwrap();
        let votes = state
            .votes_by_ledger
            .get(&seq)
            .cloned()
            .unwrap_or_default();
        let processed = state.processed.entry(seq).or_default();

        let mut emitted = 0usize;
        for vote in votes {
            if !processed.insert(vote.validator_key.clone()) {
                continue;
            }
            let tx = ValidatorVoteTx {
                network_id: self.network_id,
                validator_key: vote.validator_key,
                ledger_seq: vote.ledger_seq,
                ledger_hash: vote.ledger_hash,
                validation_hash: vote.validation_hash,
                vote_time: vote.vote_time,
                exclusion_add: vote.exclusion_add,
                exclusion_remove: vote.exclusion_remove,
            };
            position.insert(tx);
            emitted += 1;
        }
        debug!(seq, emitted, "validator votes folded into position");

        Self::cleanup(&mut state, seq);
    }

    /// Votes currently buffered for `seq`.
    pub fn votes_for(&self, seq: LedgerIndex) -> Vec<Vote> {
        self.state
            .lock()
            .unwrap()
            .votes_by_ledger
            .get(&seq)
            .cloned()
            .unwrap_or_default()
    }

    fn cleanup(state: &mut TrackerState, seq: LedgerIndex) {
        let cutoff = seq.saturating_sub(VOTE_RETENTION_LEDGERS);
        state.votes_by_ledger.retain(|&s, _| s > cutoff);
        state.processed.retain(|&s, _| s > cutoff);
    }
}
