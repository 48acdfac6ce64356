//! On-chain trust-list hash publications.
//!
//! A designated master account publishes the hash of the current trust list
//! by sending a transaction to a designated memo account, carrying a JSON
//! memo with the hash, the ledger at which it becomes effective, and a
//! strictly increasing sequence number. The watcher records the newest
//! accepted publication as pending; it becomes current only at a flag
//! ledger at or past its effective ledger.

use std::sync::Mutex;

use tracing::{debug, info, trace, warn};

use meridian_types::{
    is_flag_ledger, AccountId, Digest256, Feature, LedgerIndex, Memo, Rules, ValidatedTx,
};

/// One accepted hash publication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnlHashUpdate {
    pub hash: Digest256,
    pub effective_ledger: LedgerIndex,
    pub sequence: u32,
    pub version: u32,
}

#[derive(Default)]
struct WatcherState {
    current: Option<UnlHashUpdate>,
    pending: Option<UnlHashUpdate>,
    /// Highest sequence ever accepted, including publications that were
    /// superseded before promotion. Replays at or below this are dropped.
    highest_sequence: u32,
}

/// Watches validated transactions for trust-list hash publications.
pub struct UnlHashWatcher {
    master_account: Option<AccountId>,
    memo_account: Option<AccountId>,
    state: Mutex<WatcherState>,
}

impl UnlHashWatcher {
    pub fn new(master_account: Option<AccountId>, memo_account: Option<AccountId>) -> Self {
        if master_account.is_none() || memo_account.is_none() {
            info!("trust-list hash watcher not configured, publications ignored");
        }
        Self {
            master_account,
            memo_account,
            state: Mutex::new(WatcherState::default()),
        }
    }

    /// Whether both the master and memo accounts are configured.
    pub fn is_configured(&self) -> bool {
        self.master_account.is_some() && self.memo_account.is_some()
    }

    /// Inspect a validated transaction for a hash publication.
    ///
    /// Returns `true` when a publication was accepted as the new pending
    /// update. Publications from the wrong sender or to the wrong
    /// destination, malformed memos, and replayed sequence numbers are all
    /// ignored without error.
    pub fn process_transaction(&self, tx: &ValidatedTx, rules: &Rules) -> bool {
        if !rules.enabled(Feature::DynamicUnl) {
            return false;
        }
        let (Some(master), Some(memo_account)) = (self.master_account, self.memo_account)
        else {
            return false;
        };
        if tx.sender != master || tx.destination != Some(memo_account) {
            return false;
        }

        // The first parseable memo is the publication; later memos on the
        // same transaction are ignored.
        for memo in &tx.memos {
            let Some(update) = parse_hash_memo(memo) else {
                continue;
            };

            let mut state = self.state.lock().unwrap();
            if update.sequence <= state.highest_sequence {
                trace!(
                    sequence = update.sequence,
                    highest = state.highest_sequence,
                    "dropping replayed hash publication"
                );
                return false;
            }
            state.highest_sequence = update.sequence;
            info!(
                hash = %update.hash,
                effective_ledger = update.effective_ledger,
                sequence = update.sequence,
                "accepted trust-list hash publication"
            );
            state.pending = Some(update);
            return true;
        }
        false
    }

    /// Whether the pending update should be promoted when closing `seq`.
    ///
    /// Promotion happens only at a flag ledger at or past the update's
    /// effective ledger.
    pub fn should_apply_pending_update(&self, seq: LedgerIndex) -> bool {
        let state = self.state.lock().unwrap();
        match state.pending {
            Some(pending) => seq >= pending.effective_ledger && is_flag_ledger(seq),
            None => false,
        }
    }

    /// Promote the pending update to current.
    pub fn apply_pending_update(&self) {
        let mut state = self.state.lock().unwrap();
        match state.pending.take() {
            Some(update) => {
                info!(hash = %update.hash, sequence = update.sequence, "trust-list hash promoted");
                state.current = Some(update);
            }
            None => warn!("no pending trust-list hash to promote"),
        }
    }

    /// Whether `hash` matches the current promoted hash.
    ///
    /// With no current hash this is `false`: an unverifiable trust list is
    /// never applied.
    pub fn verify_hash(&self, hash: &Digest256) -> bool {
        let state = self.state.lock().unwrap();
        match &state.current {
            Some(current) => current.hash == *hash,
            None => {
                debug!(%hash, "no current trust-list hash, rejecting");
                false
            }
        }
    }

    pub fn current_hash(&self) -> Option<Digest256> {
        self.state.lock().unwrap().current.map(|u| u.hash)
    }

    pub fn pending_update(&self) -> Option<UnlHashUpdate> {
        self.state.lock().unwrap().pending
    }

    pub fn highest_sequence(&self) -> u32 {
        self.state.lock().unwrap().highest_sequence
    }
}

/// Parse a hash-publication memo.
///
/// The payload is a JSON object with a 64-character hex `hash`, integer
/// `effectiveLedger` and `sequence`, and an optional integer `version`
/// defaulting to 1. Anything else is not a publication.
fn parse_hash_memo(memo: &Memo) -> Option<UnlHashUpdate> {
    let value: serde_json::Value = serde_json::from_slice(&memo.data).ok()?;
    let obj = value.as_object()?;

    let hash = Digest256::from_hex(obj.get("hash")?.as_str()?).ok()?;
    let effective_ledger = u32::try_from(obj.get("effectiveLedger")?.as_u64()?).ok()?;
    let sequence = u32::try_from(obj.get("sequence")?.as_u64()?).ok()?;
    let version = match obj.get("version") {
        Some(v) => u32::try_from(v.as_u64()?).ok()?,
        None => 1,
    };

    Some(UnlHashUpdate {
        hash,
        effective_ledger,
        sequence,
        version,
    })
}
