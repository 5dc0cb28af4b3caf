// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Observable sync state and the outcomes of a sync request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of the sync engine.
///
/// `Success` and `Error` are display states: the engine reverts them to
/// `Idle` after a configured delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

impl SyncStatus {
    /// Returns true if the engine may move from `self` to `next`.
    pub fn can_transition_to(self, next: SyncStatus) -> bool {
        use SyncStatus::*;
        matches!(
            (self, next),
            (Idle | Success | Error, Syncing)
                | (Syncing, Success | Error)
                | (Success | Error, Idle)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of everything the application shows about sync.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SyncState {
    pub status: SyncStatus,
    pub is_online: bool,
    /// Queued operations plus unsynced documents.
    pub pending_count: u64,
    /// Message of the most recent failed drain, cleared by the next success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Why a sync request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Offline,
    NothingPending,
    /// Another drain is already running.
    InFlight,
    /// The engine has been closed.
    Closed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::Offline => "offline",
            SkipReason::NothingPending => "nothing pending",
            SkipReason::InFlight => "sync already in progress",
            SkipReason::Closed => "engine closed",
        })
    }
}

/// Result of [`SyncEngine::request_sync`](crate::SyncEngine::request_sync).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Nothing was attempted; status is unchanged.
    Skipped { reason: SkipReason },
    /// The whole snapshot was delivered and removed from pending state.
    Synced { operations: usize, documents: usize },
    /// Delivery failed; everything was retained.
    Failed { reason: String },
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            SyncOutcome::Synced {
                operations,
                documents,
            } => write!(f, "synced {operations} operation(s), {documents} document(s)"),
            SyncOutcome::Failed { reason } => write!(f, "sync failed: {reason}"),
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
