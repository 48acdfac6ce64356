//! Validator voting at ledger close.
//!
//! [`ValidatorExclusionManager`] reconciles the operator's configured
//! exclusion set against on-ledger state, one rate-limited change at a
//! time. [`ValidatorVoteTracker`] collects validator votes per ledger and
//! folds each validator's vote into the consensus initial position as a
//! pseudo-transaction, exactly once.

pub mod exclusion_manager;
pub mod ledger;
pub mod pseudo_tx;
pub mod vote_tracker;

pub use exclusion_manager::{ExclusionChange, ValidatorExclusionManager, CHANGE_INTERVAL};
pub use ledger::LedgerView;
pub use pseudo_tx::{InitialPosition, ValidatorVoteTx};
pub use vote_tracker::{ValidatorVoteTracker, Vote, VOTE_RETENTION_LEDGERS};
