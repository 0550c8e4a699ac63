//! Sync service: pass orchestration, manual resolution, periodic scheduling.

use crate::config::SyncConfig;
use crate::conflict::{ConflictEntry, ConflictQueue, Resolution};
use crate::error::{SyncError, SyncResult};
use crate::gateway::RemoteGateway;
use crate::merge::{merge_batch, MergeOutcome};
use parking_lot::{Condvar, Mutex, MutexGuard};
use quotesync_core::{now_millis, Quote, QuoteStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The current state of the sync service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No pass is in flight.
    Idle,
    /// A pass is running; ticks and resolutions arriving now are dropped.
    Syncing,
}

/// Options for one sync pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Suppress the user-facing pass events (scheduled passes run silent).
    pub silent: bool,
}

impl SyncOptions {
    /// Options for a background pass that should not notify.
    #[must_use]
    pub fn silent() -> Self {
        Self { silent: true }
    }
}

/// Counts reported by one completed sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Brand-new remote records appended to the store.
    pub added: usize,
    /// Local records updated from their remote counterpart.
    pub updated: usize,
    /// Divergences queued for manual resolution.
    pub conflicts: usize,
}

impl SyncReport {
    /// Renders a one-line human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "sync complete: {} added, {} updated, {} conflict(s)",
            self.added, self.updated, self.conflicts
        )
    }
}

struct Inner<G> {
    config: SyncConfig,
    gateway: G,
    store: Mutex<QuoteStore>,
    queue: Mutex<ConflictQueue>,
    in_flight: AtomicBool,
    stop: Mutex<bool>,
    stop_cv: Condvar,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Resets the in-flight flag when a pass settles, success or failure.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates sync passes over a quote store and a remote gateway.
///
/// One atomic in-flight flag serializes passes and manual conflict
/// resolution; a tick or request that arrives while a pass is running is
/// dropped with [`SyncError::SyncInProgress`] rather than queued. The store
/// is locked only after the fetch settles, so a pass never merges against a
/// snapshot taken before the network call.
///
/// The service is cheaply cloneable; clones share the same store, queue,
/// and scheduler.
pub struct SyncService<G: RemoteGateway> {
    inner: Arc<Inner<G>>,
}

impl<G: RemoteGateway> Clone for SyncService<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: RemoteGateway + 'static> SyncService<G> {
    /// Creates a service over the given store and gateway.
    pub fn new(config: SyncConfig, gateway: G, store: QuoteStore) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                gateway,
                store: Mutex::new(store),
                queue: Mutex::new(ConflictQueue::new()),
                in_flight: AtomicBool::new(false),
                stop: Mutex::new(false),
                stop_cv: Condvar::new(),
                worker: Mutex::new(None),
            }),
        }
    }

    /// Returns the configuration the service was built with.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SyncState {
        if self.inner.in_flight.load(Ordering::SeqCst) {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    /// Locks and returns the underlying quote store.
    ///
    /// Collaborators use this for local operations (add, filter, export);
    /// the guard must not be held across calls back into the service.
    pub fn store(&self) -> MutexGuard<'_, QuoteStore> {
        self.inner.store.lock()
    }

    /// Returns a snapshot of the unresolved conflicts in pass order.
    #[must_use]
    pub fn conflicts(&self) -> Vec<ConflictEntry> {
        self.inner.queue.lock().list().to_vec()
    }

    /// Returns the persisted timestamp of the last successful pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted state cannot be read.
    pub fn last_sync_at(&self) -> SyncResult<Option<u64>> {
        Ok(self.inner.store.lock().last_sync_at()?)
    }

    /// Runs one full sync pass: fetch, merge, push local-only quotes,
    /// refresh the conflict queue, record the timestamp.
    ///
    /// # Errors
    ///
    /// - [`SyncError::SyncInProgress`] when a pass is already in flight; the
    ///   store is untouched and the caller may simply retry later.
    /// - [`SyncError::Network`] when the fetch fails; the store, the queue,
    ///   and the last-sync timestamp keep their pre-call values.
    pub fn perform_sync(&self, options: SyncOptions) -> SyncResult<SyncReport> {
        if self.inner.in_flight.swap(true, Ordering::SeqCst) {
            return Err(SyncError::SyncInProgress);
        }
        let _guard = InFlightGuard(&self.inner.in_flight);

        let batch = match self.inner.gateway.fetch_batch() {
            Ok(batch) => batch,
            Err(e) => {
                if !options.silent {
                    warn!("sync pass aborted: {e}");
                }
                return Err(e);
            }
        };

        // The store is read only now, after the fetch has settled; a quote
        // added while the request was outstanding takes part in the merge.
        let MergeOutcome {
            added,
            updated,
            conflicts,
        } = {
            let mut store = self.inner.store.lock();
            merge_batch(&mut store, &batch)?
        };

        self.push_local_only();

        let report = SyncReport {
            added,
            updated,
            conflicts: conflicts.len(),
        };
        if !conflicts.is_empty() {
            // Each pass that finds conflicts replaces the queue wholesale.
            self.inner.queue.lock().replace_with(conflicts);
        }

        self.inner.store.lock().set_last_sync_at(now_millis())?;

        if !options.silent {
            info!(
                added = report.added,
                updated = report.updated,
                conflicts = report.conflicts,
                "sync pass complete"
            );
        }
        Ok(report)
    }

    /// Submits every local-only quote, attaching the returned remote ids.
    ///
    /// Individual failures are logged and skipped; the local records stay.
    fn push_local_only(&self) {
        let pending: Vec<String> = self
            .inner
            .store
            .lock()
            .all()
            .iter()
            .filter(|q| q.is_local_only())
            .map(|q| q.identity_key())
            .collect();

        for key in pending {
            // Re-acquire per record so the store is never held across the
            // network call.
            let quote = self.inner.store.lock().find_by_identity(&key).cloned();
            let Some(quote) = quote else { continue };
            if !quote.is_local_only() {
                continue;
            }

            match self.inner.gateway.submit(&quote) {
                Ok(remote_id) => {
                    let mut store = self.inner.store.lock();
                    if let Some(index) = store.position_by_identity(&key) {
                        if let Some(mut enriched) = store.get(index).cloned() {
                            enriched.remote_id = Some(remote_id);
                            if let Err(e) = store.set(index, enriched) {
                                warn!("failed to persist remote id {remote_id}: {e}");
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "submit failed for {:?}: {e}; keeping the local copy",
                        quote.text
                    );
                }
            }
        }
    }

    /// Adds a quote locally, then submits it to the remote endpoint.
    ///
    /// The submit is best-effort: a network failure leaves the quote in the
    /// store without a remote id and is reported only as a warning.
    ///
    /// # Errors
    ///
    /// Returns a validation or storage error from the local add; never a
    /// network error.
    pub fn add_quote(&self, text: &str, category: &str) -> SyncResult<Quote> {
        let quote = self.inner.store.lock().add(text, category)?;

        match self.inner.gateway.submit(&quote) {
            Ok(remote_id) => {
                let mut store = self.inner.store.lock();
                if let Some(index) = store.position_by_identity(&quote.identity_key()) {
                    if let Some(mut enriched) = store.get(index).cloned() {
                        enriched.remote_id = Some(remote_id);
                        store.set(index, enriched.clone())?;
                        return Ok(enriched);
                    }
                }
                Ok(quote)
            }
            Err(e) => {
                warn!("submit failed for {:?}: {e}; quote kept locally", quote.text);
                Ok(quote)
            }
        }
    }

    /// Resolves the queued conflict at `index` with the given choice.
    ///
    /// The chosen snapshot is written back at the position matching the
    /// entry's identity key or remote id (appended when neither matches any
    /// more), the store persists, and the entry leaves the queue. Returns
    /// the record as written.
    ///
    /// # Errors
    ///
    /// - [`SyncError::SyncInProgress`] when a pass is in flight.
    /// - [`SyncError::IndexOutOfRange`] for a stale index; the queue is
    ///   untouched.
    pub fn resolve_conflict(&self, index: usize, resolution: Resolution) -> SyncResult<Quote> {
        if self.inner.in_flight.swap(true, Ordering::SeqCst) {
            return Err(SyncError::SyncInProgress);
        }
        let _guard = InFlightGuard(&self.inner.in_flight);

        let (entry, len) = {
            let queue = self.inner.queue.lock();
            (queue.get(index).cloned(), queue.len())
        };
        let Some(entry) = entry else {
            return Err(SyncError::IndexOutOfRange { index, len });
        };

        let chosen = entry.chosen(resolution).clone();
        {
            let mut store = self.inner.store.lock();
            // The merge already applied the remote values, so the record may
            // now answer to the remote identity rather than the local one.
            let position = store
                .position_by_identity(&entry.identity_key)
                .or_else(|| store.position_by_identity(&entry.remote.identity_key()))
                .or_else(|| {
                    entry
                        .remote
                        .remote_id
                        .and_then(|id| store.position_by_remote_id(id))
                });
            match position {
                Some(at) => store.set(at, chosen.clone())?,
                None => store.append(chosen.clone())?,
            }
        }

        self.inner.queue.lock().remove(index)?;
        debug!(index, "conflict resolved");
        Ok(chosen)
    }

    /// Begins periodic syncing: an immediate pass, then one every
    /// `interval`. A tick that lands while a pass is still running is a
    /// no-op. Restarts the scheduler if one is already running.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Scheduler`] if the scheduler thread cannot be
    /// spawned.
    pub fn start_periodic(&self, interval: Duration) -> SyncResult<()> {
        self.stop_periodic();
        *self.inner.stop.lock() = false;

        let service = self.clone();
        let handle = std::thread::Builder::new()
            .name("quotesync-scheduler".to_string())
            .spawn(move || loop {
                match service.perform_sync(SyncOptions::silent()) {
                    Ok(report) => debug!(
                        added = report.added,
                        updated = report.updated,
                        conflicts = report.conflicts,
                        "scheduled pass finished"
                    ),
                    Err(SyncError::SyncInProgress) => {
                        debug!("pass already in flight; tick skipped")
                    }
                    Err(e) => warn!("scheduled pass failed: {e}"),
                }

                let mut stopped = service.inner.stop.lock();
                if *stopped {
                    break;
                }
                let _timed_out = service.inner.stop_cv.wait_for(&mut stopped, interval);
                if *stopped {
                    break;
                }
            })
            .map_err(|e| SyncError::Scheduler(e.to_string()))?;

        *self.inner.worker.lock() = Some(handle);
        Ok(())
    }

    /// Stops periodic syncing and waits for the scheduler thread to exit.
    /// A pass already in flight runs to completion first.
    pub fn stop_periodic(&self) {
        {
            let mut stopped = self.inner.stop.lock();
            *stopped = true;
        }
        self.inner.stop_cv.notify_all();

        let handle = self.inner.worker.lock().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}
