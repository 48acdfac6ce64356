//! Periodic remote exclusion-list fetcher.
//!
//! One tokio task drives the cycle: fetch every configured source in
//! parallel, verify each response, update the per-source cache for the
//! sources that succeeded, and recompute the combined union. Queries are
//! served from a single lock-guarded state snapshot and never suspend, so
//! they are safe to call from the consensus path.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures_util::future::join_all;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use meridian_crypto::sha512_half;
use meridian_types::AccountId;

use crate::config::{ExclusionFetchConfig, ExclusionSource};
use crate::error::FetchError;
use crate::list::{parse_exclusion_list, verify_list, ExclusionList};

type SourceFetchResult = Result<ExclusionList, FetchError>;

#[derive(Default)]
struct FetcherState {
    /// Most recent verified list per source URL. Entries are superseded on
    /// successful re-fetch, never mutated, and survive failed cycles.
    cached: HashMap<String, ExclusionList>,
    /// Union of all cached lists' accounts. Swapped as a whole snapshot.
    combined: HashSet<AccountId>,
    has_modifications: bool,
    all_sources_accessible: bool,
    initial_fetch_complete: bool,
    last_update: Option<Instant>,
    running: bool,
    stopping: bool,
}

/// Fetches signed exclusion lists from configured remote sources on a timer.
pub struct RemoteExclusionFetcher {
    config: ExclusionFetchConfig,
    client: reqwest::Client,
    state: Mutex<FetcherState>,
    stop_signal: Notify,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteExclusionFetcher {
    pub fn new(config: ExclusionFetchConfig) -> Arc<Self> {
        info!(
            sources = config.sources.len(),
            interval_secs = config.interval_secs,
            "remote exclusion fetcher initialized"
        );
        Arc::new(Self {
            config,
            client: reqwest::Client::new(),
            state: Mutex::new(FetcherState::default()),
            stop_signal: Notify::new(),
            task: Mutex::new(None),
        })
    }

    /// Start the periodic fetch loop. Fetches immediately, then every
    /// configured interval. Idempotent while running; a no-op when no
    /// sources are configured.
    pub fn start(self: &Arc<Self>) {
        {
            let mut state = self.state.lock().unwrap();
            if state.running {
                return;
            }
            if self.config.sources.is_empty() {
                info!("no remote exclusion sources configured");
                return;
            }
            state.running = true;
            state.stopping = false;
        }

        let fetcher = Arc::clone(self);
        let handle = tokio::spawn(async move {
            loop {
                fetcher.fetch_once().await;
                tokio::select! {
                    _ = fetcher.stop_signal.notified() => break,
                    _ = tokio::time::sleep(fetcher.config.interval()) => {}
                }
            }
        });
        *self.task.lock().unwrap() = Some(handle);

        info!(
            interval_secs = self.config.interval_secs,
            "remote exclusion fetcher started"
        );
    }

    /// Stop the fetch loop and cancel any in-flight requests. A cycle that
    /// races with stop re-checks the stopping flag under the state lock
    /// before touching the cache, so no mutation happens after this returns.
    pub fn stop(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if !state.running && !state.stopping {
                return;
            }
            state.running = false;
            state.stopping = true;
        }
        self.stop_signal.notify_waiters();
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
        info!("remote exclusion fetcher stopped");
    }

    /// Run a single fetch cycle: all sources in parallel, then one
    /// aggregation pass once every request has resolved.
    pub async fn fetch_once(&self) {
        if self.state.lock().unwrap().stopping {
            return;
        }

        debug!(sources = self.config.sources.len(), "fetching exclusion sources");
        let fetches = self.config.sources.iter().map(|s| self.fetch_source(s));
        let results = join_all(fetches).await;
        self.aggregate(results);
    }

    async fn fetch_source(&self, source: &ExclusionSource) -> SourceFetchResult {
        let response = self
            .client
            .get(&source.url)
            .timeout(self.config.request_timeout())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let content_hash = sha512_half(body.as_bytes());

        let mut list = parse_exclusion_list(&body).ok_or(FetchError::Parse)?;
        if !verify_list(&list, &body, source) {
            return Err(FetchError::Verification);
        }
        list.verified = true;

        info!(
            url = %source.url,
            entries = list.entries.len(),
            content_hash = %content_hash,
            "fetched and verified exclusion list"
        );
        Ok(list)
    }

    fn aggregate(&self, results: Vec<SourceFetchResult>) {
        let mut state = self.state.lock().unwrap();
        if state.stopping {
            return;
        }

        let mut all_accessible = true;
        for (source, result) in self.config.sources.iter().zip(results) {
            match result {
                Ok(list) => {
                    state.cached.insert(source.url.clone(), list);
                }
                Err(err) => {
                    all_accessible = false;
                    warn!(url = %source.url, %err, "source fetch failed, keeping cached entry");
                }
            }
        }

        let new_combined: HashSet<AccountId> = state
            .cached
            .values()
            .filter(|list| list.verified)
            .flat_map(|list| list.entries.iter().map(|e| e.address))
            .collect();

        if new_combined != state.combined {
            info!(
                total = new_combined.len(),
                sources = state.cached.len(),
                "combined exclusion set changed"
            );
            state.combined = new_combined;
            state.has_modifications = true;
            state.last_update = Some(Instant::now());
        } else {
            debug!(total = state.combined.len(), "combined exclusion set unchanged");
        }

        state.all_sources_accessible = all_accessible;
        state.initial_fetch_complete = true;
    }

    /// Snapshot of the current combined exclusion set.
    pub fn combined_exclusions(&self) -> HashSet<AccountId> {
        self.state.lock().unwrap().combined.clone()
    }

    /// Whether the combined set changed since the last check.
    /// Clears the flag when `reset` is true.
    pub fn has_been_modified(&self, reset: bool) -> bool {
        let mut state = self.state.lock().unwrap();
        let modified = state.has_modifications;
        if reset {
            state.has_modifications = false;
        }
        modified
    }

    /// Whether every source succeeded in the most recent cycle.
    pub fn all_sources_accessible(&self) -> bool {
        self.state.lock().unwrap().all_sources_accessible
    }

    /// Whether at least one fetch cycle has completed.
    pub fn initial_fetch_complete(&self) -> bool {
        self.state.lock().unwrap().initial_fetch_complete
    }

    pub fn last_update_time(&self) -> Option<Instant> {
        self.state.lock().unwrap().last_update
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().running
    }

    /// Reason and date-added per excluded account, aggregated across cached
    /// lists. Used by operator-facing status surfaces.
    pub fn exclusion_reasons(&self) -> HashMap<AccountId, (String, String)> {
        let state = self.state.lock().unwrap();
        let mut reasons = HashMap::new();
        for list in state.cached.values().filter(|l| l.verified) {
            for entry in &list.entries {
                reasons
                    .entry(entry.address)
                    .or_insert_with(|| (entry.reason.clone(), entry.date_added.clone()));
            }
        }
        reasons
    }
}

impl Drop for RemoteExclusionFetcher {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
        }
    }
}
