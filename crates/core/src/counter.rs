// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted pending-changes counter.
//!
//! A cache of "operations queued + documents unsynced". It is never the
//! source of truth; the engine recomputes it from the queue and document
//! collection on open and after every drain.

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::store::{self, DurableStore};

/// Store key owned by the counter.
pub const COUNTER_KEY: &str = "pending_changes";

pub struct PendingCounter {
    store: Arc<dyn DurableStore>,
    write_lock: Mutex<()>,
}

impl PendingCounter {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        PendingCounter {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the cached count; absent or corrupt reads as zero.
    pub fn get(&self) -> u64 {
        store::load(self.store.as_ref(), COUNTER_KEY).unwrap_or(0)
    }

    pub fn set(&self, count: u64) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        if count == 0 {
            self.store.remove(COUNTER_KEY)
        } else {
            store::save(self.store.as_ref(), COUNTER_KEY, &count)
        }
    }

    /// Adds one and returns the new count.
    pub fn increment(&self) -> Result<u64> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let count = self.get().saturating_add(1);
        store::save(self.store.as_ref(), COUNTER_KEY, &count)?;
        Ok(count)
    }
}

#[cfg(test)]
#[path = "counter_tests.rs"]
mod tests;
