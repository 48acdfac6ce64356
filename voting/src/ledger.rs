//! Read-only view of the closing ledger.

use meridian_types::{AccountId, LedgerIndex, Rules};

/// What the voting components need to see of a ledger.
///
/// The consensus engine implements this over its real ledger state; tests
/// implement it over fixtures.
pub trait LedgerView {
    /// Sequence number of the ledger being closed.
    fn seq(&self) -> LedgerIndex;

    /// Rules active for this ledger.
    fn rules(&self) -> &Rules;

    /// Accounts `account` currently excludes on-ledger.
    fn account_exclusions(&self, account: &AccountId) -> Vec<AccountId>;
}
