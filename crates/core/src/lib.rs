// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! offsync-core: offline-first persistence and sync engine
//!
//! Writes are accepted whether or not the device is online, made durable in
//! a [`DurableStore`], and reconciled with a remote [`SyncTarget`] when
//! connectivity allows. [`SyncEngine`] is the entry point.

pub mod cache;
pub mod clock;
pub mod connectivity;
pub mod counter;
pub mod documents;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod queue;
pub mod state;
pub mod store;
pub mod target;

#[cfg(test)]
mod test_helpers;

pub use clock::{ClockSource, ManualClock, MonotonicClock, SystemClock};
pub use connectivity::{ConnectivityMonitor, PollConfig, ReachabilityProbe, TcpProbe, Transition};
pub use documents::{Document, NewDocument, StoredDocument};
pub use engine::{SyncConfig, SyncEngine, SyncEngineBuilder};
pub use error::{Error, Result};
pub use queue::PendingOperation;
pub use state::{SkipReason, SyncOutcome, SyncState, SyncStatus};
pub use store::{DurableStore, FileStore, MemoryStore, SqliteStore};
pub use target::{OutboxTarget, SyncTarget, TargetError, WebSocketTarget};
