// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Document store for domain records awaiting sync.
//!
//! Documents live as one JSON array under [`DOCUMENTS_KEY`]. Each carries a
//! `type` used for retrieval and a `synced` flag that starts out false and is
//! flipped by the sync engine once the document has been delivered.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::{to_datetime, ClockSource};
use crate::error::{Error, Result};
use crate::store::{self, DurableStore};

/// Store key owned by the document store.
pub const DOCUMENTS_KEY: &str = "pending_data";

/// Field names the store manages itself; callers cannot set them via fields.
const RESERVED_FIELDS: &[&str] = &["id", "type", "timestamp", "synced"];

/// A persisted domain record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Creation (or last save) time.
    pub timestamp: DateTime<Utc>,
    pub synced: bool,
    /// Caller payload, stored flat alongside the fields above.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A document as submitted by a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDocument {
    /// Caller-chosen id; generated as `{type}_{millis}` when absent.
    pub id: Option<String>,
    pub doc_type: String,
    pub fields: Map<String, Value>,
}

impl NewDocument {
    /// Creates an empty document of the given type.
    pub fn new(doc_type: impl Into<String>) -> Self {
        NewDocument {
            id: None,
            doc_type: doc_type.into(),
            fields: Map::new(),
        }
    }

    /// Sets an explicit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds one field.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Replaces all fields.
    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        self.fields = fields;
        self
    }
}

/// Result of a save.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub document: Document,
    /// True if the save added to the number of unsynced documents.
    pub newly_pending: bool,
}

/// Typed view over the documents collection.
pub struct DocumentStore {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn ClockSource>,
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Creates a document store persisting through `store`.
    pub fn new(store: Arc<dyn DurableStore>, clock: Arc<dyn ClockSource>) -> Self {
        DocumentStore {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Persists a document, marking it unsynced.
    ///
    /// Saving with the id of an existing document replaces that document, so
    /// ids stay unique.
    pub fn save(&self, new: NewDocument) -> Result<StoredDocument> {
        if new.doc_type.trim().is_empty() {
            return Err(Error::InvalidInput("document type must not be empty".into()));
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut docs = self.all();
        let now_ms = self.clock.now_ms();

        let id = match new.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => generate_id(&docs, &new.doc_type, now_ms),
        };

        let mut fields = new.fields;
        for reserved in RESERVED_FIELDS {
            if fields.remove(*reserved).is_some() {
                tracing::debug!(field = reserved, "ignoring reserved document field");
            }
        }

        let document = Document {
            id,
            doc_type: new.doc_type,
            timestamp: to_datetime(now_ms),
            synced: false,
            fields,
        };

        let newly_pending = match docs.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => {
                let was_synced = existing.synced;
                *existing = document.clone();
                was_synced
            }
            None => {
                docs.push(document.clone());
                true
            }
        };
        store::save(self.store.as_ref(), DOCUMENTS_KEY, &docs)?;

        tracing::debug!(id = %document.id, doc_type = %document.doc_type, "saved document");
        Ok(StoredDocument {
            document,
            newly_pending,
        })
    }

    /// Returns documents whose type matches `doc_type` exactly, in save order.
    pub fn query(&self, doc_type: &str) -> Vec<Document> {
        self.all().into_iter().filter(|d| d.doc_type == doc_type).collect()
    }

    /// Returns every document. A missing or corrupt collection reads as empty.
    pub fn all(&self) -> Vec<Document> {
        store::load(self.store.as_ref(), DOCUMENTS_KEY).unwrap_or_default()
    }

    /// Returns documents not yet delivered.
    pub fn unsynced(&self) -> Vec<Document> {
        self.all().into_iter().filter(|d| !d.synced).collect()
    }

    /// Returns the number of documents not yet delivered.
    pub fn unsynced_count(&self) -> usize {
        self.all().iter().filter(|d| !d.synced).count()
    }

    /// Flags the given documents as synced.
    ///
    /// A stored document only matches a delivered one that is equal in every
    /// field, so a re-save that happened after the batch was taken stays
    /// unsynced even when it lands in the same millisecond.
    /// Returns the number of documents flipped.
    pub fn mark_synced(&self, delivered: &[Document]) -> Result<usize> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut docs = self.all();
        let mut flipped = 0;

        for doc in docs.iter_mut().filter(|d| !d.synced) {
            if delivered.contains(doc) {
                doc.synced = true;
                flipped += 1;
            }
        }

        if flipped > 0 {
            store::save(self.store.as_ref(), DOCUMENTS_KEY, &docs)?;
        }
        Ok(flipped)
    }
}

/// Builds a `{type}_{millis}` id, bumping the millis until it is unused.
fn generate_id(existing: &[Document], doc_type: &str, now_ms: u64) -> String {
    let mut ms = now_ms;
    loop {
        let candidate = format!("{doc_type}_{ms}");
        if !existing.iter().any(|d| d.id == candidate) {
            return candidate;
        }
        ms += 1;
    }
}

#[cfg(test)]
#[path = "documents_tests.rs"]
mod tests;
