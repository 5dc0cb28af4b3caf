// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory durable store.
//!
//! Not durable on its own: [`MemoryStore::export`] hands out the backing
//! bytes so a caller (or a test) can persist them and rebuild the store with
//! [`MemoryStore::from_export`].

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{check_key, DurableStore};
use crate::error::{Error, Result};

/// A [`DurableStore`] kept in a map of serialized values.
#[derive(Debug)]
pub struct MemoryStore {
    /// `None` once closed.
    entries: Mutex<Option<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Opens an empty store.
    pub fn open() -> Self {
        Self::from_export(BTreeMap::new())
    }

    /// Opens a store over previously exported entries.
    pub fn from_export(entries: BTreeMap<String, String>) -> Self {
        MemoryStore {
            entries: Mutex::new(Some(entries)),
        }
    }

    /// Returns a copy of every stored key and its serialized value.
    pub fn export(&self) -> BTreeMap<String, String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clone().unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::open()
    }
}

impl DurableStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entries = entries.as_ref().ok_or(Error::StoreClosed)?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entries = entries.as_mut().ok_or(Error::StoreClosed)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        check_key(key)?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entries = entries.as_mut().ok_or(Error::StoreClosed)?;
        entries.remove(key);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        *entries = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}
