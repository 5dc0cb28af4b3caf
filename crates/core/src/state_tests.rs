// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    idle_to_syncing = { SyncStatus::Idle, SyncStatus::Syncing, true },
    success_to_syncing = { SyncStatus::Success, SyncStatus::Syncing, true },
    error_to_syncing = { SyncStatus::Error, SyncStatus::Syncing, true },
    syncing_to_success = { SyncStatus::Syncing, SyncStatus::Success, true },
    syncing_to_error = { SyncStatus::Syncing, SyncStatus::Error, true },
    success_to_idle = { SyncStatus::Success, SyncStatus::Idle, true },
    error_to_idle = { SyncStatus::Error, SyncStatus::Idle, true },
    idle_to_success = { SyncStatus::Idle, SyncStatus::Success, false },
    idle_to_error = { SyncStatus::Idle, SyncStatus::Error, false },
    syncing_to_idle = { SyncStatus::Syncing, SyncStatus::Idle, false },
    syncing_to_syncing = { SyncStatus::Syncing, SyncStatus::Syncing, false },
    idle_to_idle = { SyncStatus::Idle, SyncStatus::Idle, false },
)]
fn test_transitions(from: SyncStatus, to: SyncStatus, allowed: bool) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[parameterized(
    idle = { SyncStatus::Idle, "idle" },
    syncing = { SyncStatus::Syncing, "syncing" },
    success = { SyncStatus::Success, "success" },
    error = { SyncStatus::Error, "error" },
)]
fn test_status_names(status: SyncStatus, name: &str) {
    assert_eq!(status.to_string(), name);
    assert_eq!(serde_json::to_string(&status).unwrap(), format!("\"{name}\""));
}

#[test]
fn test_default_state_is_idle_and_empty() {
    let state = SyncState::default();
    assert_eq!(state.status, SyncStatus::Idle);
    assert_eq!(state.pending_count, 0);
    assert!(state.last_error.is_none());
}

#[test]
fn test_state_json_omits_missing_error() {
    let state = SyncState {
        is_online: true,
        pending_count: 2,
        ..SyncState::default()
    };
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["status"], "idle");
    assert_eq!(json["pending_count"], 2);
    assert!(json.get("last_error").is_none());
}

#[test]
fn test_outcome_json_shape() {
    let skipped = SyncOutcome::Skipped {
        reason: SkipReason::NothingPending,
    };
    let json = serde_json::to_value(&skipped).unwrap();
    assert_eq!(json["outcome"], "skipped");
    assert_eq!(json["reason"], "nothing_pending");

    let synced = SyncOutcome::Synced {
        operations: 2,
        documents: 1,
    };
    assert!(synced.is_synced());
    assert_eq!(synced.to_string(), "synced 2 operation(s), 1 document(s)");
}

#[test]
fn test_failed_outcome_display() {
    let failed = SyncOutcome::Failed {
        reason: "connection closed".into(),
    };
    assert!(failed.is_failed());
    assert!(!failed.is_synced());
    assert_eq!(failed.to_string(), "sync failed: connection closed");
}
