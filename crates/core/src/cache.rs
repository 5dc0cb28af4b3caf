// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline data cache.
//!
//! A small keyed map of JSON values that callers keep locally for offline
//! reads (last-known lists, drafts). It is never synced.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::store::{self, DurableStore};

/// Store key owned by the cache.
pub const CACHE_KEY: &str = "offline_data";

pub struct OfflineCache {
    store: Arc<dyn DurableStore>,
    write_lock: Mutex<()>,
}

impl OfflineCache {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        OfflineCache {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn put(&self, key: &str, value: Value) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidInput("cache key must not be empty".into()));
        }
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.entries();
        entries.insert(key.to_string(), value);
        store::save(self.store.as_ref(), CACHE_KEY, &entries)
    }

    /// Returns the value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries().remove(key)
    }

    /// Returns the cached keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    fn entries(&self) -> Map<String, Value> {
        store::load(self.store.as_ref(), CACHE_KEY).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
