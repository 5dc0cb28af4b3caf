// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offsync_core::{SyncEngine, SyncOutcome};

use crate::error::{Error, Result};

/// Drains pending work once. A failed drain is an error so the exit code
/// tells scripts to retry.
pub async fn run(engine: &SyncEngine) -> Result<()> {
    let outcome = engine.request_sync().await;
    match outcome {
        SyncOutcome::Failed { .. } => Err(Error::SyncFailed(outcome.to_string())),
        SyncOutcome::Synced { .. } | SyncOutcome::Skipped { .. } => {
            println!("{outcome}");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
