use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::state::ProgressState;
use crate::analysis::{fetch_progress, LoadOutcome, ProgressCache, ProgressSource};
use crate::types::CacheKey;

/// Loads progress data for one view, keeping only the latest request's result.
///
/// Every call to [`load`](Self::load) takes a new ticket and cancels the
/// request before it. A request commits its result only while its ticket is
/// still the latest and it has not been cancelled, so a slow response for an
/// earlier project never overwrites a newer one.
pub struct ProgressLoader {
    source: Arc<dyn ProgressSource>,
    cache: Arc<ProgressCache>,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<ProgressState>>,
    inflight: Mutex<Option<CancellationToken>>,
}

impl ProgressLoader {
    pub fn new(source: Arc<dyn ProgressSource>, cache: Arc<ProgressCache>) -> Self {
        let (state, _) = watch::channel(ProgressState::default());
        Self {
            source,
            cache,
            latest: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            inflight: Mutex::new(None),
        }
    }

    /// Snapshot of the current visible state
    pub fn state(&self) -> ProgressState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ProgressState> {
        self.state.subscribe()
    }

    fn replace_inflight(&self, token: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut inflight = self.inflight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *inflight, token)
    }

    /// Start loading `owner/repo` over the last `days` days.
    ///
    /// The state resets to loading right away. Cache hits and empty inputs
    /// settle synchronously and return `None`; otherwise the returned handle
    /// completes once the request has settled (committed or discarded).
    pub fn load(&self, owner: &str, repo: &str, days: u32) -> Option<JoinHandle<()>> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        if let Some(previous) = self.replace_inflight(Some(token.clone())) {
            previous.cancel();
        }
        self.state.send_replace(ProgressState::loading());

        let key = CacheKey::new(owner, repo, days);
        if let Some(cached) = self.cache.get(&key) {
            debug!(owner = %key.owner, repo = %key.repo, days, "progress cache hit");
            self.state.send_replace(ProgressState::from_cached(cached));
            return None;
        }
        if key.owner.is_empty() || key.repo.is_empty() {
            self.state.send_replace(ProgressState::default());
            return None;
        }

        let source = Arc::clone(&self.source);
        let cache = Arc::clone(&self.cache);
        let latest = Arc::clone(&self.latest);
        let state = Arc::clone(&self.state);
        let owner = owner.trim().to_string();
        let repo = repo.trim().to_string();

        Some(tokio::spawn(async move {
            let fetch = fetch_progress(source.as_ref(), &owner, &repo, days, Utc::now());
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!(ticket, %owner, %repo, "progress load cancelled");
                    return;
                }
                outcome = AssertUnwindSafe(fetch).catch_unwind() => outcome,
            };
            let outcome = outcome.unwrap_or_else(|_| {
                warn!(ticket, %owner, %repo, "progress load panicked");
                LoadOutcome {
                    error: Some("failed to load progress".to_string()),
                    ..Default::default()
                }
            });

            if !commit_outcome(&state, &cache, &latest, ticket, &token, key, outcome) {
                debug!(ticket, %owner, %repo, "discarding stale progress result");
            }
        }))
    }

    /// Load and wait for the request to settle, then return the state.
    pub async fn load_and_wait(&self, owner: &str, repo: &str, days: u32) -> ProgressState {
        if let Some(handle) = self.load(owner, repo, days) {
            if let Err(e) = handle.await {
                warn!(error = %e, "progress load task failed");
            }
        }
        self.state()
    }

    /// Stop caring about the in-flight request; its result will never be applied.
    pub fn teardown(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = self.replace_inflight(None) {
            token.cancel();
        }
    }
}

/// Publish a settled outcome for `ticket`.
///
/// Nothing changes when the request was cancelled or a newer ticket exists;
/// the check and the write happen under the channel's lock. Outcomes without
/// a commit error are cached. Returns whether the state was replaced.
pub(super) fn commit_outcome(
    state: &watch::Sender<ProgressState>,
    cache: &ProgressCache,
    latest: &AtomicU64,
    ticket: u64,
    token: &CancellationToken,
    key: CacheKey,
    outcome: LoadOutcome,
) -> bool {
    state.send_if_modified(|current| {
        if token.is_cancelled() || latest.load(Ordering::SeqCst) != ticket {
            return false;
        }
        let data = Arc::new(outcome.data);
        let data = if outcome.error.is_none() {
            cache.store(key, data)
        } else {
            data
        };
        *current = ProgressState::from_outcome(data, outcome.error);
        true
    })
}

impl Drop for ProgressLoader {
    fn drop(&mut self) {
        self.teardown();
    }
}
