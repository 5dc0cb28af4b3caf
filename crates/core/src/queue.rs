// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Write queue for mutations made while (possibly) offline.
//!
//! The queue is a single JSON array stored under [`QUEUE_KEY`], rewritten
//! whole on every change. Entries keep enqueue order through persistence
//! and drain; only the sync engine removes them, and only after a batch has
//! been delivered.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{to_datetime, ClockSource};
use crate::error::{Error, Result};
use crate::store::{self, DurableStore};

/// Store key owned by the write queue.
pub const QUEUE_KEY: &str = "pending_sync";

/// One queued mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Discriminator chosen by the caller, e.g. `form_submission`.
    pub kind: String,
    /// Opaque caller data.
    pub payload: Value,
    /// When the operation was queued. Non-decreasing along the queue.
    pub enqueued_at: DateTime<Utc>,
}

/// Ordered, append-only log of pending operations.
pub struct WriteQueue {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn ClockSource>,
    /// Serializes read-modify-write cycles on the stored array.
    write_lock: Mutex<()>,
}

impl WriteQueue {
    /// Creates a queue persisting through `store`.
    pub fn new(store: Arc<dyn DurableStore>, clock: Arc<dyn ClockSource>) -> Self {
        WriteQueue {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Appends an operation. It is durable once this returns `Ok`.
    pub fn enqueue(&self, kind: &str, payload: Value) -> Result<PendingOperation> {
        if kind.trim().is_empty() {
            return Err(Error::InvalidInput("operation kind must not be empty".into()));
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut ops = self.peek_all();

        let mut enqueued_at = to_datetime(self.clock.now_ms());
        if let Some(last) = ops.last() {
            enqueued_at = enqueued_at.max(last.enqueued_at);
        }

        let op = PendingOperation {
            kind: kind.to_string(),
            payload,
            enqueued_at,
        };
        ops.push(op.clone());
        store::save(self.store.as_ref(), QUEUE_KEY, &ops)?;

        tracing::debug!(kind, queued = ops.len(), "enqueued operation");
        Ok(op)
    }

    /// Reads all queued operations in enqueue order without removing them.
    ///
    /// A missing or corrupt queue reads as empty.
    pub fn peek_all(&self) -> Vec<PendingOperation> {
        store::load(self.store.as_ref(), QUEUE_KEY).unwrap_or_default()
    }

    /// Returns the number of queued operations.
    pub fn len(&self) -> usize {
        self.peek_all().len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every queued operation.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.store.remove(QUEUE_KEY)
    }

    /// Removes the first `count` operations, keeping anything queued after
    /// them.
    ///
    /// Used after a drain so operations enqueued while the batch was in
    /// flight survive.
    pub fn remove_first(&self, count: usize) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let ops = self.peek_all();
        if count >= ops.len() {
            return self.store.remove(QUEUE_KEY);
        }

        store::save(self.store.as_ref(), QUEUE_KEY, &ops[count..])
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
