//! Ledger sequence numbers and epoch-boundary (flag ledger) helpers.

/// A ledger sequence number.
pub type LedgerIndex = u32;

/// Interval between flag ledgers. Network-wide parameter changes (trust set,
/// exclusions, fee votes) may only take effect at these boundaries.
pub const FLAG_LEDGER_INTERVAL: LedgerIndex = 256;

/// Whether `seq` is a flag ledger (epoch boundary).
pub fn is_flag_ledger(seq: LedgerIndex) -> bool {
    seq % FLAG_LEDGER_INTERVAL == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_ledgers_recur_on_interval() {
        assert!(is_flag_ledger(0));
        assert!(is_flag_ledger(256));
        assert!(is_flag_ledger(512));
        assert!(!is_flag_ledger(1));
        assert!(!is_flag_ledger(255));
        assert!(!is_flag_ledger(257));
    }
}
