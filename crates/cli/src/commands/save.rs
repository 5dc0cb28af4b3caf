// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offsync_core::{NewDocument, SyncEngine};

use super::parse_json_object;
use crate::error::Result;

pub fn run(
    engine: &SyncEngine,
    doc_type: &str,
    fields: Option<&str>,
    id: Option<String>,
) -> Result<()> {
    let fields = parse_json_object(fields, "document fields", "{\"title\":\"sunset\"}")?;
    let mut doc = NewDocument::new(doc_type).with_fields(fields);
    if let Some(id) = id {
        doc = doc.with_id(id);
    }

    let stored = engine.save_document(doc)?;
    println!("Saved {}", stored.document.id);
    Ok(())
}

#[cfg(test)]
#[path = "save_tests.rs"]
mod tests;
