//! Remote exclusion-list fetching and verification.
//!
//! A node refuses to transact with accounts on its exclusion set. The set is
//! assembled from N configured remote sources, each of which publishes a
//! signed JSON document. Every source is fetched periodically and in
//! parallel; only documents whose signature verifies against the source's
//! configured key may update that source's cache entry, and the combined set
//! is the union of all cached verified lists. A failing or unverifiable
//! source leaves its previous cached entry in place: stale-but-trusted wins
//! over unverified-but-fresh.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod list;

pub use config::{ExclusionFetchConfig, ExclusionSource};
pub use error::FetchError;
pub use fetcher::RemoteExclusionFetcher;
pub use list::{ExclusionEntry, ExclusionList};
