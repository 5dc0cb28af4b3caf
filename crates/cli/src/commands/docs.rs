// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offsync_core::{Document, SyncEngine};

use crate::cli::OutputFormat;
use crate::error::Result;

pub fn run(engine: &SyncEngine, doc_type: &str, output: OutputFormat) -> Result<()> {
    let docs = engine.documents_by_type(doc_type);
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string(&docs)?),
        OutputFormat::Text => {
            if docs.is_empty() {
                println!("No {doc_type} documents");
            }
            for doc in &docs {
                println!("{}", format_document_line(doc));
            }
        }
    }
    Ok(())
}

/// One line per document: id, sync state, creation time.
pub(crate) fn format_document_line(doc: &Document) -> String {
    let state = if doc.synced { "synced" } else { "pending" };
    format!(
        "{}  {:<7}  {}",
        doc.id,
        state,
        doc.timestamp.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
#[path = "docs_tests.rs"]
mod tests;
