//! Dynamic trust-set (UNL) management.
//!
//! Two cooperating pieces:
//!
//! * [`UnlHashWatcher`] observes validated transactions for trust-list hash
//!   publications from a configured master account and promotes them through
//!   a pending/current two-phase lifecycle at epoch boundaries.
//! * [`DynamicUnlManager`] turns a fetched trust-list document into a
//!   bounded validator selection, vetoed by the watcher's current hash.

pub mod manager;
pub mod watcher;

pub use manager::{DynamicUnlManager, ValidatorEntry, MAX_UNL_VALIDATORS};
pub use watcher::{UnlHashUpdate, UnlHashWatcher};
