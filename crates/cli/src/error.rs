// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors reported by the `offsync` command line.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'offsync init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid {what}: {reason}\n  hint: pass a JSON value, e.g. '{example}'")]
    InvalidJson {
        what: &'static str,
        reason: String,
        example: &'static str,
    },

    #[error("invalid remote URL '{0}'\n  hint: use outbox:<path>, ws://... or wss://...")]
    InvalidRemote(String),

    #[error("no cached value for '{0}'")]
    CacheMiss(String),

    #[error("{0}\n  hint: pending work was kept and will be retried on the next sync")]
    SyncFailed(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] offsync_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
