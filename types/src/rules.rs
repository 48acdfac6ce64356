//! Network rule gates.
//!
//! Each trust-set mechanism is independently toggleable by a network-wide
//! rule flag. Components check the relevant gate and no-op (never error)
//! when it is off.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A toggleable network rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    /// On-ledger account exclusion lists.
    AccountExclusion,
    /// On-chain UNL hash publication and dynamic trust-set selection.
    DynamicUnl,
    /// Validator-vote pseudo-transactions at ledger close.
    ValidatorVoteTracking,
}

/// The set of rules active for a ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rules {
    enabled: BTreeSet<Feature>,
}

impl Rules {
    /// No features enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// All features enabled.
    pub fn all() -> Self {
        Self::none()
            .with(Feature::AccountExclusion)
            .with(Feature::DynamicUnl)
            .with(Feature::ValidatorVoteTracking)
    }

    pub fn with(mut self, feature: Feature) -> Self {
        self.enabled.insert(feature);
        self
    }

    pub fn enabled(&self, feature: Feature) -> bool {
        self.enabled.contains(&feature)
    }
}
