// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable key-value storage for whole JSON values.
//!
//! Every other component persists through a [`DurableStore`]. Each component
//! owns one key and never reads another component's key.
//!
//! Backends:
//! - [`MemoryStore`]: in-process, with export/import to simulate restarts
//! - [`FileStore`]: one JSON file per key, atomically replaced on write
//! - [`SqliteStore`]: a single `kv` table

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// A key-addressed store that survives process restarts.
///
/// Writes are all-or-nothing from the caller's point of view: a reader sees
/// either the previous value or the new one, never a partial write.
pub trait DurableStore: Send + Sync {
    /// Reads the raw serialized value stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Releases the backing resources. Later calls fail with
    /// [`Error::StoreClosed`].
    fn close(&self) -> Result<()>;

    /// Returns true until [`close`](DurableStore::close) is called.
    fn is_open(&self) -> bool;
}

/// Loads and deserializes the value under `key`.
///
/// Unreadable or corrupt values are treated as absent.
pub fn load<T: DeserializeOwned>(store: &dyn DurableStore, key: &str) -> Option<T> {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt stored value, treating as absent");
            None
        }
    }
}

/// Serializes `value` and stores it under `key`.
pub fn save<T: Serialize + ?Sized>(store: &dyn DurableStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.write(key, &json)
}

/// Validates that a key is safe to use as a file name.
pub(crate) fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
