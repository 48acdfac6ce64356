//! Trust-list document parsing and bounded validator selection.

use std::sync::Arc;

use tracing::{info, warn};

use meridian_crypto::sha512_half;

use crate::watcher::UnlHashWatcher;

/// Upper bound on the selected trust set. Larger published lists are cut to
/// the top scorers. The right bound for a growing network is an open
/// research question; keep this a single tunable.
pub const MAX_UNL_VALIDATORS: usize = 35;

/// One validator candidate from a published trust list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorEntry {
    pub pubkey: String,
    pub score: u32,
}

/// Turns fetched trust-list documents into validator selections, vetoed by
/// the on-chain published hash when a watcher is configured.
pub struct DynamicUnlManager {
    watcher: Arc<UnlHashWatcher>,
}

impl DynamicUnlManager {
    pub fn new(watcher: Arc<UnlHashWatcher>) -> Self {
        Self { watcher }
    }

    /// Process a fetched trust-list document.
    ///
    /// When the watcher is configured, the document's content hash must
    /// match the current on-chain published hash; a mismatch (or the absence
    /// of any promoted hash) rejects the document. An unconfigured watcher
    /// skips the veto entirely.
    pub fn process_fetched_unl(&self, raw: &str) -> Option<Vec<ValidatorEntry>> {
        if self.watcher.is_configured() {
            let content_hash = sha512_half(raw.as_bytes());
            if !self.watcher.verify_hash(&content_hash) {
                warn!(%content_hash, "trust-list content hash not verified, rejecting");
                return None;
            }
        }

        let entries = parse_unl_data(raw)?;
        let selected = select_top_validators(entries);
        info!(selected = selected.len(), "trust set selected");
        Some(selected)
    }
}

/// Parse a trust-list document.
///
/// The envelope is strict: the document must be a JSON object with an
/// integer `version` and a `validators` array. Entries are lenient: an entry
/// needs a non-empty string `pubkey` and an integer `score`; anything else
/// is skipped. A document with no usable entries fails as a whole.
pub fn parse_unl_data(raw: &str) -> Option<Vec<ValidatorEntry>> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(err) => {
            warn!(%err, "trust-list document is not valid JSON");
            return None;
        }
    };
    let obj = value.as_object()?;
    obj.get("version")?.as_u64()?;
    let validators = obj.get("validators")?.as_array()?;

    let mut entries = Vec::with_capacity(validators.len());
    for entry in validators {
        let Some(pubkey) = entry.get("pubkey").and_then(|v| v.as_str()) else {
            warn!("skipping trust-list entry without pubkey");
            continue;
        };
        if pubkey.is_empty() {
            warn!("skipping trust-list entry with empty pubkey");
            continue;
        }
        let Some(score) = entry
            .get("score")
            .and_then(|v| v.as_u64())
            .and_then(|s| u32::try_from(s).ok())
        else {
            warn!(pubkey, "skipping trust-list entry without a valid score");
            continue;
        };
        entries.push(ValidatorEntry {
            pubkey: pubkey.to_string(),
            score,
        });
    }

    if entries.is_empty() {
        warn!("trust-list document has no usable entries");
        return None;
    }
    Some(entries)
}

/// Select the top-scoring validators, at most [`MAX_UNL_VALIDATORS`].
///
/// The sort is stable, so entries with equal scores keep their document
/// order and the selection is deterministic across nodes.
pub fn select_top_validators(mut entries: Vec<ValidatorEntry>) -> Vec<ValidatorEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_UNL_VALIDATORS);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_types::{AccountId, Digest256, Rules, ValidatedTx};
    use proptest::prelude::*;

    fn entry(pubkey: &str, score: u32) -> ValidatorEntry {
        ValidatorEntry {
            pubkey: pubkey.into(),
            score,
        }
    }

    fn doc(entries: &[(&str, u32)]) -> String {
        let validators: Vec<String> = entries
            .iter()
            .map(|(k, s)| format!(r#"{{"pubkey":"{k}","score":{s}}}"#))
            .collect();
        format!(
            r#"{{"version":1,"validators":[{}]}}"#,
            validators.join(",")
        )
    }

    #[test]
    fn parses_and_orders_by_score() {
        let raw = doc(&[("a", 10), ("b", 30), ("c", 20)]);
        let entries = parse_unl_data(&raw).unwrap();
        let selected = select_top_validators(entries);
        let keys: Vec<&str> = selected.iter().map(|e| e.pubkey.as_str()).collect();
        assert_eq!(keys, ["b", "c", "a"]);
    }

    #[test]
    fn strict_envelope() {
        assert!(parse_unl_data("[]").is_none());
        assert!(parse_unl_data(r#"{"validators":[]}"#).is_none());
        assert!(parse_unl_data(r#"{"version":"1","validators":[]}"#).is_none());
        assert!(parse_unl_data(r#"{"version":1}"#).is_none());
        assert!(parse_unl_data(r#"{"version":1,"validators":{}}"#).is_none());
        assert!(parse_unl_data("garbage").is_none());
    }

    #[test]
    fn lenient_entries() {
        let raw = r#"{"version":1,"validators":[
            {"pubkey":"good","score":5},
            {"pubkey":"","score":5},
            {"pubkey":"noscore"},
            {"score":5},
            {"pubkey":"floatscore","score":1.5},
            {"pubkey":"negscore","score":-3},
            {"pubkey":"hugescore","score":4294967296},
            "not an object"
        ]}"#;
        let entries = parse_unl_data(raw).unwrap();
        assert_eq!(entries, vec![entry("good", 5)]);
    }

    #[test]
    fn all_entries_bad_fails_whole_document() {
        let raw = r#"{"version":1,"validators":[{"pubkey":""},{"score":1}]}"#;
        assert!(parse_unl_data(raw).is_none());
    }

    #[test]
    fn ties_keep_document_order() {
        let selected =
            select_top_validators(vec![entry("x", 5), entry("y", 5), entry("z", 9)]);
        let keys: Vec<&str> = selected.iter().map(|e| e.pubkey.as_str()).collect();
        assert_eq!(keys, ["z", "x", "y"]);
    }

    #[test]
    fn truncates_to_bound() {
        let entries: Vec<ValidatorEntry> = (0..50)
            .map(|i| entry(&format!("v{i}"), i as u32))
            .collect();
        let selected = select_top_validators(entries);
        assert_eq!(selected.len(), MAX_UNL_VALIDATORS);
        // Highest scores survive.
        assert_eq!(selected[0].score, 49);
        assert_eq!(selected.last().unwrap().score, 15);
    }

    #[test]
    fn unconfigured_watcher_skips_hash_veto() {
        let manager = DynamicUnlManager::new(Arc::new(UnlHashWatcher::new(None, None)));
        let raw = doc(&[("p1", 10), ("p2", 90)]);
        let selected = manager.process_fetched_unl(&raw).unwrap();
        assert_eq!(selected, vec![entry("p2", 90), entry("p1", 10)]);
    }

    #[test]
    fn configured_watcher_vetoes_until_hash_promoted() {
        let master = AccountId::new([1; 20]);
        let memo = AccountId::new([2; 20]);
        let watcher = Arc::new(UnlHashWatcher::new(Some(master), Some(memo)));
        let manager = DynamicUnlManager::new(Arc::clone(&watcher));

        let raw = doc(&[("a", 1), ("b", 2)]);

        // No promoted hash yet: reject.
        assert!(manager.process_fetched_unl(&raw).is_none());

        // Publish and promote the document's own content hash.
        let content_hash = sha512_half(raw.as_bytes());
        let payload = format!(
            r#"{{"hash":"{}","effectiveLedger":256,"sequence":1}}"#,
            content_hash.to_hex()
        );
        let tx = ValidatedTx::new(master, Some(memo)).with_memo(payload.into_bytes());
        assert!(watcher.process_transaction(&tx, &Rules::all()));
        watcher.apply_pending_update();

        let selected = manager.process_fetched_unl(&raw).unwrap();
        assert_eq!(selected[0].pubkey, "b");

        // A different document no longer matches the promoted hash.
        let other = doc(&[("c", 3)]);
        assert!(manager.process_fetched_unl(&other).is_none());
    }

    #[test]
    fn hash_mismatch_rejects() {
        let watcher = Arc::new(UnlHashWatcher::new(
            Some(AccountId::new([1; 20])),
            Some(AccountId::new([2; 20])),
        ));
        // Sanity: verify_hash against an arbitrary digest is closed.
        assert!(!watcher.verify_hash(&Digest256::new([9; 32])));
    }

    proptest! {
        #[test]
        fn selection_is_bounded_and_descending(
            scores in proptest::collection::vec(0u32..1000, 0..80)
        ) {
            let entries: Vec<ValidatorEntry> = scores
                .iter()
                .enumerate()
                .map(|(i, &s)| entry(&format!("v{i}"), s))
                .collect();
            let selected = select_top_validators(entries.clone());

            prop_assert!(selected.len() <= MAX_UNL_VALIDATORS);
            prop_assert!(selected.windows(2).all(|w| w[0].score >= w[1].score));

            // Every selected score is at least as large as every excluded one.
            if let Some(min_selected) = selected.iter().map(|e| e.score).min() {
                let selected_keys: std::collections::HashSet<&str> =
                    selected.iter().map(|e| e.pubkey.as_str()).collect();
                for e in &entries {
                    if !selected_keys.contains(e.pubkey.as_str()) {
                        prop_assert!(e.score <= min_selected);
                    }
                }
            }
        }
    }
}
