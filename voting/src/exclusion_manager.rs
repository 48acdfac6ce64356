//! Reconciliation of configured exclusions against on-ledger state.
//!
//! The operator configures the validator public keys it wants excluded. At
//! initialization the manager derives their accounts, diffs them against
//! what the ledger already records for this validator, and queues the
//! changes. Changes drain one at a time, at most one per
//! [`CHANGE_INTERVAL`] ledgers, so the network absorbs them gradually.

use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use meridian_exclusion::RemoteExclusionFetcher;
use meridian_types::{AccountId, Feature, LedgerIndex, PublicKey};

use crate::ledger::LedgerView;

/// Minimum ledgers between two emitted exclusion changes.
pub const CHANGE_INTERVAL: LedgerIndex = 10;

/// One queued on-ledger exclusion change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExclusionChange {
    Add(AccountId),
    Remove(AccountId),
}

#[derive(Default)]
struct ManagerState {
    initialized: bool,
    queue: VecDeque<ExclusionChange>,
    last_change_ledger: LedgerIndex,
}

/// Drives the validator's own exclusion set toward its configured target.
pub struct ValidatorExclusionManager {
    our_account: AccountId,
    configured: Vec<PublicKey>,
    /// When present, initialization additionally waits for the remote
    /// fetcher to have a complete, fully accessible view, and remote
    /// exclusions join the target set.
    fetcher: Option<Arc<RemoteExclusionFetcher>>,
    state: Mutex<ManagerState>,
}

impl ValidatorExclusionManager {
    pub fn new(
        validator_key: &PublicKey,
        configured: Vec<PublicKey>,
        fetcher: Option<Arc<RemoteExclusionFetcher>>,
    ) -> Self {
        Self {
            our_account: AccountId::from_public_key(validator_key),
            configured,
            fetcher,
            state: Mutex::new(ManagerState::default()),
        }
    }

    /// Compute and queue the changes needed to reach the configured target.
    ///
    /// Idempotent after the first successful run. A no-op while the account
    /// exclusion rule is disabled, and while a guarded remote fetcher has
    /// not yet completed a fully accessible fetch cycle (call again at the
    /// next ledger).
    pub fn initialize(&self, view: &dyn LedgerView) {
        if !view.rules().enabled(Feature::AccountExclusion) {
            return;
        }
        if let Some(fetcher) = &self.fetcher {
            if !fetcher.initial_fetch_complete() || !fetcher.all_sources_accessible() {
                debug!("remote exclusion view incomplete, deferring initialization");
                return;
            }
        }
        if self.state.lock().unwrap().initialized {
            return;
        }

        // The diff reads the fetcher and the ledger view; no lock is held
        // across either call.
        let queue = self.compute_changes(view);

        let mut state = self.state.lock().unwrap();
        if state.initialized {
            return;
        }
        state.queue = queue;
        state.initialized = true;
        info!(
            queued = state.queue.len(),
            "exclusion manager initialized"
        );
    }

    /// Re-diff against the ledger when the remote exclusion set changed.
    ///
    /// Replaces the queue; already-emitted changes are reflected in ledger
    /// state and drop out of the diff naturally.
    pub fn refresh(&self, view: &dyn LedgerView) {
        let Some(fetcher) = &self.fetcher else {
            return;
        };
        if !self.state.lock().unwrap().initialized {
            return;
        }
        if !fetcher.has_been_modified(true) {
            return;
        }
        let queue = self.compute_changes(view);
        let mut state = self.state.lock().unwrap();
        state.queue = queue;
        info!(queued = state.queue.len(), "exclusion queue rebuilt");
    }

    /// Next change to emit when closing `seq`, if any is due.
    ///
    /// Returns `None` while uninitialized, while the queue is empty, or
    /// while within [`CHANGE_INTERVAL`] ledgers of the last emitted change.
    pub fn get_exclusion_change(&self, seq: LedgerIndex) -> Option<ExclusionChange> {
        let mut state = self.state.lock().unwrap();
        if !state.initialized {
            return None;
        }
        if seq < state.last_change_ledger + CHANGE_INTERVAL {
            return None;
        }
        let change = state.queue.pop_front()?;
        state.last_change_ledger = seq;
        debug!(?change, seq, "emitting exclusion change");
        Some(change)
    }

    pub fn pending_changes(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    /// Adds in target order first, then removes sorted by account.
    fn compute_changes(&self, view: &dyn LedgerView) -> VecDeque<ExclusionChange> {
        let mut target: Vec<AccountId> = self
            .configured
            .iter()
            .map(AccountId::from_public_key)
            .collect();
        if let Some(fetcher) = &self.fetcher {
            let mut remote: Vec<AccountId> =
                fetcher.combined_exclusions().into_iter().collect();
            remote.sort();
            target.extend(remote);
        }

        let on_ledger: BTreeSet<AccountId> = view
            .account_exclusions(&self.our_account)
            .into_iter()
            .collect();
        let target_set: BTreeSet<AccountId> = target.iter().copied().collect();

        let mut queue = VecDeque::new();
        let mut queued_adds = BTreeSet::new();
        for account in target {
            if !on_ledger.contains(&account) && queued_adds.insert(account) {
                queue.push_back(ExclusionChange::Add(account));
            }
        }
        for account in &on_ledger {
            if !target_set.contains(account) {
                queue.push_back(ExclusionChange::Remove(*account));
            }
        }
        queue
    }
}
