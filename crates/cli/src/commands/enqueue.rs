// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offsync_core::SyncEngine;

use super::parse_json_arg;
use crate::error::Result;

pub fn run(engine: &SyncEngine, kind: &str, payload: Option<&str>) -> Result<()> {
    let payload = parse_json_arg(payload, "payload", "{\"name\":\"Ada\"}")?;
    let op = engine.enqueue(kind, payload)?;
    println!("Queued {} ({} pending)", op.kind, engine.pending_count());
    Ok(())
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
