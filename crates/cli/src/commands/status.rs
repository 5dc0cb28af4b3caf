// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offsync_core::{SyncEngine, SyncState};

use crate::cli::OutputFormat;
use crate::error::Result;

pub fn run(engine: &SyncEngine, output: OutputFormat) -> Result<()> {
    let state = engine.sync_state();
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string(&state)?),
        OutputFormat::Text => println!("{}", format_state(&state)),
    }
    Ok(())
}

pub(crate) fn format_state(state: &SyncState) -> String {
    let mut out = format!(
        "status: {}\nonline: {}\npending: {}",
        state.status,
        if state.is_online { "yes" } else { "no" },
        state.pending_count
    );
    if let Some(error) = &state.last_error {
        out.push_str(&format!("\nlast error: {error}"));
    }
    out
}

/// Single-line form used while watching.
pub(crate) fn format_state_line(state: &SyncState) -> String {
    let online = if state.is_online { "online" } else { "offline" };
    match &state.last_error {
        Some(error) if state.status == offsync_core::SyncStatus::Error => format!(
            "{} ({online}, {} pending): {error}",
            state.status, state.pending_count
        ),
        _ => format!("{} ({online}, {} pending)", state.status, state.pending_count),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
