// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offsync_core::{PendingOperation, SyncEngine};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

#[derive(Serialize)]
struct PendingReport {
    pending_count: u64,
    operations: Vec<PendingOperation>,
}

pub fn run(engine: &SyncEngine, output: OutputFormat) -> Result<()> {
    let report = PendingReport {
        pending_count: engine.pending_count(),
        operations: engine.pending_operations(),
    };
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::Text => {
            for op in &report.operations {
                println!("{}", format_operation_line(op));
            }
            println!("{} pending", report.pending_count);
        }
    }
    Ok(())
}

pub(crate) fn format_operation_line(op: &PendingOperation) -> String {
    format!(
        "{}  {}  {}",
        op.enqueued_at.format("%Y-%m-%d %H:%M:%S"),
        op.kind,
        op.payload
    )
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
