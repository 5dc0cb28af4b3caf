// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine: the caller-facing API and the sync state machine.
//!
//! The engine owns the write queue, the document store, the pending counter
//! and the offline data cache, all sharing one [`DurableStore`]. Pending work
//! is drained against a [`SyncTarget`]:
//! - explicitly, through [`SyncEngine::request_sync`]
//! - once per offline-to-online edge while work is pending
//! - shortly after a document save, coalescing bursts of saves
//!
//! A drain is all-or-nothing. The snapshot taken when it starts is removed
//! only if every batch was acknowledged; otherwise everything stays queued
//! for the next attempt.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch, Notify};
use tokio_util::sync::CancellationToken;

use crate::cache::OfflineCache;
use crate::clock::{ClockSource, MonotonicClock};
use crate::connectivity::{ConnectivityMonitor, Transition};
use crate::counter::PendingCounter;
use crate::documents::{Document, DocumentStore, NewDocument, StoredDocument};
use crate::error::{Error, Result};
use crate::queue::{PendingOperation, WriteQueue};
use crate::state::{SkipReason, SyncOutcome, SyncState, SyncStatus};
use crate::store::DurableStore;
use crate::target::{SyncTarget, TargetError, TargetResult};

/// Timing settings for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// How long `success` is shown before reverting to `idle`.
    pub success_display: Duration,
    /// How long `error` is shown before reverting to `idle`.
    pub error_display: Duration,
    /// Quiet period after a document save before a sync is requested.
    pub save_debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            success_display: Duration::from_secs(3),
            error_display: Duration::from_secs(5),
            save_debounce: Duration::from_secs(1),
        }
    }
}

/// Builder for [`SyncEngine`].
pub struct SyncEngineBuilder {
    store: Arc<dyn DurableStore>,
    target: Arc<dyn SyncTarget>,
    monitor: Option<Arc<ConnectivityMonitor>>,
    clock: Option<Arc<dyn ClockSource>>,
    config: SyncConfig,
}

impl SyncEngineBuilder {
    /// Uses a shared connectivity monitor. Defaults to one that assumes
    /// the device is online.
    pub fn monitor(mut self, monitor: Arc<ConnectivityMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Uses a custom clock for timestamps and generated ids.
    pub fn clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens the engine.
    ///
    /// Recomputes the pending count from persisted state. When called inside
    /// a tokio runtime, also starts the connectivity listener that drives
    /// automatic syncs; outside one, syncs only happen on request.
    pub fn open(self) -> Result<SyncEngine> {
        if !self.store.is_open() {
            return Err(Error::StoreClosed);
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::system()));
        let monitor = self
            .monitor
            .unwrap_or_else(|| Arc::new(ConnectivityMonitor::default()));

        let inner = Arc::new(Inner {
            queue: WriteQueue::new(Arc::clone(&self.store), Arc::clone(&clock)),
            documents: DocumentStore::new(Arc::clone(&self.store), clock),
            counter: PendingCounter::new(Arc::clone(&self.store)),
            cache: OfflineCache::new(Arc::clone(&self.store)),
            store: self.store,
            target: self.target,
            monitor,
            config: self.config,
            status: Mutex::new(StatusCell::default()),
            state_tx: watch::Sender::new(SyncState::default()),
            in_flight: AtomicBool::new(false),
            rerun_requested: AtomicBool::new(false),
            rerun: Arc::new(Notify::new()),
            sync_scheduled: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            runtime: Handle::try_current().ok(),
        });

        let pending = inner.recompute_pending()?;
        tracing::debug!(pending, online = inner.monitor.is_online(), "sync engine opened");

        if let Some(runtime) = &inner.runtime {
            runtime.spawn(listen(
                Arc::downgrade(&inner),
                inner.monitor.subscribe(),
                Arc::clone(&inner.rerun),
                inner.cancel.clone(),
            ));
        } else {
            tracing::debug!("no tokio runtime, automatic sync disabled");
        }

        Ok(SyncEngine { inner })
    }
}

/// Offline-first persistence and sync engine.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Inner>,
}

impl SyncEngine {
    /// Starts building an engine over `store`, syncing to `target`.
    pub fn builder(store: Arc<dyn DurableStore>, target: Arc<dyn SyncTarget>) -> SyncEngineBuilder {
        SyncEngineBuilder {
            store,
            target,
            monitor: None,
            clock: None,
            config: SyncConfig::default(),
        }
    }

    /// Queues an operation for the next sync. It is durable once this
    /// returns `Ok`.
    pub fn enqueue(&self, kind: &str, payload: Value) -> Result<PendingOperation> {
        let op = self.inner.queue.enqueue(kind, payload)?;
        self.inner.bump_pending();
        Ok(op)
    }

    /// Drains pending work now, if online and nothing else is draining.
    pub async fn request_sync(&self) -> SyncOutcome {
        self.inner.drain().await
    }

    /// Returns the number of queued operations plus unsynced documents.
    pub fn pending_count(&self) -> u64 {
        self.inner.counter.get()
    }

    /// Recounts pending work from the queue and documents, repairing the
    /// cached count.
    pub fn refresh_pending_count(&self) -> Result<u64> {
        self.inner.recompute_pending()
    }

    /// Returns the queued operations in enqueue order.
    pub fn pending_operations(&self) -> Vec<PendingOperation> {
        self.inner.queue.peek_all()
    }

    /// Persists a document and, when online, schedules a sync after the
    /// save debounce.
    pub fn save_document(&self, doc: NewDocument) -> Result<StoredDocument> {
        let stored = self.inner.documents.save(doc)?;
        if stored.newly_pending {
            self.inner.bump_pending();
        } else {
            self.inner.publish();
        }
        if self.inner.monitor.is_online() {
            self.inner.schedule_sync();
        }
        Ok(stored)
    }

    /// Returns documents of exactly `doc_type`, in save order.
    pub fn documents_by_type(&self, doc_type: &str) -> Vec<Document> {
        self.inner.documents.query(doc_type)
    }

    /// Returns documents not yet delivered.
    pub fn unsynced_documents(&self) -> Vec<Document> {
        self.inner.documents.unsynced()
    }

    /// Caches a value for offline reads. Not part of pending work.
    pub fn save_offline_data(&self, key: &str, value: Value) -> Result<()> {
        self.inner.cache.put(key, value)
    }

    pub fn offline_data(&self, key: &str) -> Option<Value> {
        self.inner.cache.get(key)
    }

    pub fn offline_data_keys(&self) -> Vec<String> {
        self.inner.cache.keys()
    }

    pub fn sync_state(&self) -> SyncState {
        self.inner.snapshot()
    }

    /// Subscribes to state changes. The receiver starts with the current
    /// state.
    pub fn subscribe_state(&self) -> watch::Receiver<SyncState> {
        self.inner.publish();
        self.inner.state_tx.subscribe()
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.inner.monitor
    }

    /// Stops background work and closes the store.
    ///
    /// A transmission in flight resolves as failed with its batch retained.
    /// Every later call fails or is skipped.
    pub fn close(&self) -> Result<()> {
        if self.inner.cancel.is_cancelled() {
            return Ok(());
        }
        self.inner.cancel.cancel();
        tracing::debug!("sync engine closed");
        self.inner.store.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

#[derive(Debug, Default)]
struct StatusCell {
    status: SyncStatus,
    last_error: Option<String>,
    /// Bumped on every status change so a stale revert timer does nothing.
    epoch: u64,
}

struct Inner {
    store: Arc<dyn DurableStore>,
    target: Arc<dyn SyncTarget>,
    monitor: Arc<ConnectivityMonitor>,
    queue: WriteQueue,
    documents: DocumentStore,
    counter: PendingCounter,
    cache: OfflineCache,
    config: SyncConfig,
    status: Mutex<StatusCell>,
    state_tx: watch::Sender<SyncState>,
    in_flight: AtomicBool,
    /// Set when a background sync found a drain in flight.
    rerun_requested: AtomicBool,
    /// Wakes the listener to run a deferred sync.
    rerun: Arc<Notify>,
    /// Set while a debounced sync is waiting to fire.
    sync_scheduled: AtomicBool,
    cancel: CancellationToken,
    runtime: Option<Handle>,
}

impl Inner {
    async fn drain(self: &Arc<Self>) -> SyncOutcome {
        if self.cancel.is_cancelled() {
            return skipped(SkipReason::Closed);
        }
        if !self.monitor.is_online() {
            return skipped(SkipReason::Offline);
        }
        let outcome = {
            let Some(_latch) = InFlightLatch::acquire(&self.in_flight) else {
                return skipped(SkipReason::InFlight);
            };
            self.drain_snapshot().await
        };
        if self.rerun_requested.swap(false, Ordering::SeqCst) {
            tracing::debug!("running sync deferred behind the last drain");
            self.rerun.notify_one();
        }
        outcome
    }

    /// Drains now, or once the drain in flight settles.
    ///
    /// Background requests go through here so work saved during a drain is
    /// not left waiting for the next online edge.
    async fn drain_or_defer(self: &Arc<Self>) -> SyncOutcome {
        loop {
            let outcome = self.drain().await;
            if !matches!(outcome, SyncOutcome::Skipped { reason: SkipReason::InFlight }) {
                return outcome;
            }
            self.rerun_requested.store(true, Ordering::SeqCst);
            // The latch holder takes the flag after releasing the latch. If it
            // already has released, whoever swaps the flag back runs the drain.
            if self.in_flight.load(Ordering::SeqCst)
                || !self.rerun_requested.swap(false, Ordering::SeqCst)
            {
                return outcome;
            }
        }
    }

    /// Transmits a snapshot of pending work while holding the latch.
    async fn drain_snapshot(self: &Arc<Self>) -> SyncOutcome {
        let ops = self.queue.peek_all();
        let docs = self.documents.unsynced();
        if ops.is_empty() && docs.is_empty() {
            return skipped(SkipReason::NothingPending);
        }

        self.set_status(SyncStatus::Syncing, None);
        tracing::debug!(operations = ops.len(), documents = docs.len(), "draining pending work");

        let sent = tokio::select! {
            _ = self.cancel.cancelled() => Err(TargetError::Cancelled),
            sent = self.transmit(&ops, &docs) => sent,
        };

        let result = match sent {
            Ok(()) => self.commit(&ops, &docs),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                tracing::info!(operations = ops.len(), documents = docs.len(), "sync complete");
                let epoch = self.set_status(SyncStatus::Success, None);
                self.schedule_revert(epoch, self.config.success_display);
                SyncOutcome::Synced {
                    operations: ops.len(),
                    documents: docs.len(),
                }
            }
            Err(reason) => {
                tracing::warn!(%reason, "sync failed, pending work retained");
                let epoch = self.set_status(SyncStatus::Error, Some(reason.clone()));
                self.schedule_revert(epoch, self.config.error_display);
                SyncOutcome::Failed { reason }
            }
        }
    }

    async fn transmit(&self, ops: &[PendingOperation], docs: &[Document]) -> TargetResult<()> {
        if !ops.is_empty() {
            self.target.send_operations(ops).await?;
        }
        if !docs.is_empty() {
            self.target.send_documents(docs).await?;
        }
        Ok(())
    }

    /// Drops a delivered snapshot from pending state.
    fn commit(
        &self,
        ops: &[PendingOperation],
        docs: &[Document],
    ) -> std::result::Result<(), String> {
        let persist = || -> Result<()> {
            self.queue.remove_first(ops.len())?;
            self.documents.mark_synced(docs)?;
            self.recompute_pending()?;
            Ok(())
        };
        persist().map_err(|e| format!("delivered but could not update local state: {e}"))
    }

    /// Moves to `status` and publishes. Returns the new epoch.
    fn set_status(&self, status: SyncStatus, error: Option<String>) -> u64 {
        let epoch = {
            let mut cell = self.status.lock().unwrap_or_else(|e| e.into_inner());
            if !cell.status.can_transition_to(status) {
                tracing::debug!(from = %cell.status, to = %status, "unexpected status transition");
            }
            tracing::debug!(from = %cell.status, to = %status, "sync status");
            cell.status = status;
            match status {
                SyncStatus::Success => cell.last_error = None,
                SyncStatus::Error => cell.last_error = error,
                SyncStatus::Idle | SyncStatus::Syncing => {}
            }
            cell.epoch += 1;
            cell.epoch
        };
        self.publish();
        epoch
    }

    /// Returns a display state to idle unless something happened since.
    fn revert_to_idle(&self, epoch: u64) {
        {
            let mut cell = self.status.lock().unwrap_or_else(|e| e.into_inner());
            if cell.epoch != epoch || !cell.status.can_transition_to(SyncStatus::Idle) {
                return;
            }
            tracing::debug!(from = %cell.status, "sync status reverting to idle");
            cell.status = SyncStatus::Idle;
            cell.epoch += 1;
        }
        self.publish();
    }

    fn schedule_revert(self: &Arc<Self>, epoch: u64, after: Duration) {
        let weak = Arc::downgrade(self);
        self.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(inner) = weak.upgrade() {
                inner.revert_to_idle(epoch);
            }
        });
    }

    /// Requests a sync after the save debounce; saves during the wait
    /// share the same request.
    fn schedule_sync(self: &Arc<Self>) {
        if self.sync_scheduled.swap(true, Ordering::AcqRel) {
            return;
        }
        let weak = Arc::downgrade(self);
        let delay = self.config.save_debounce;
        let spawned = self.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else { return };
            inner.sync_scheduled.store(false, Ordering::Release);
            let outcome = inner.drain_or_defer().await;
            tracing::debug!(%outcome, "debounced sync");
        });
        if !spawned {
            self.sync_scheduled.store(false, Ordering::Release);
        }
    }

    /// Runs `fut` on the engine's runtime until the engine closes.
    ///
    /// Returns false if there is no runtime to run it on.
    fn spawn<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            return false;
        };
        let cancel = self.cancel.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = fut => {}
            }
        });
        true
    }

    /// Adds one to the pending count after a new write.
    fn bump_pending(&self) {
        if let Err(e) = self.counter.increment() {
            tracing::warn!(error = %e, "could not update pending count");
        }
        self.publish();
    }

    fn recompute_pending(&self) -> Result<u64> {
        let count = (self.queue.len() + self.documents.unsynced_count()) as u64;
        self.counter.set(count)?;
        self.publish();
        Ok(count)
    }

    fn snapshot(&self) -> SyncState {
        // A closed store has nothing new to say about pending work
        let pending_count = if self.store.is_open() {
            self.counter.get()
        } else {
            self.state_tx.borrow().pending_count
        };
        let cell = self.status.lock().unwrap_or_else(|e| e.into_inner());
        SyncState {
            status: cell.status,
            is_online: self.monitor.is_online(),
            pending_count,
            last_error: cell.last_error.clone(),
        }
    }

    fn publish(&self) {
        let state = self.snapshot();
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }
}

/// Follows connectivity transitions, syncing once per online edge while
/// work is pending. Also runs syncs deferred behind an in-flight drain.
async fn listen(
    inner: Weak<Inner>,
    mut transitions: broadcast::Receiver<Transition>,
    rerun: Arc<Notify>,
    cancel: CancellationToken,
) {
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = rerun.notified() => {
                let Some(inner) = inner.upgrade() else { break };
                let outcome = inner.drain_or_defer().await;
                tracing::debug!(%outcome, "deferred sync");
                continue;
            }
            received = transitions.recv() => received,
        };
        let went_online = match received {
            Ok(transition) => transition.is_online(),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "connectivity transitions lagged");
                true
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        let Some(inner) = inner.upgrade() else { break };
        inner.publish();
        if went_online && inner.monitor.is_online() && inner.counter.get() > 0 {
            let outcome = inner.drain_or_defer().await;
            tracing::debug!(%outcome, "sync after reconnect");
        }
    }
}

fn skipped(reason: SkipReason) -> SyncOutcome {
    tracing::debug!(%reason, "sync skipped");
    SyncOutcome::Skipped { reason }
}

/// Holds the in-flight flag for the duration of one drain.
struct InFlightLatch<'a>(&'a AtomicBool);

impl<'a> InFlightLatch<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightLatch(flag))
    }
}

impl Drop for InFlightLatch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
