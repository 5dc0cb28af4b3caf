// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for offsync-core operations.

use thiserror::Error;

/// All possible errors that can occur in offsync-core operations.
///
/// Storage corruption and transmission failures never show up here: the
/// former is read back as an absent value, the latter is folded into the
/// engine's sync status. What remains are failures to make a write durable.
#[derive(Debug, Error)]
pub enum Error {
    #[error("store is closed\n  hint: reopen the store before writing to it")]
    StoreClosed,

    #[error("store at {0} is locked\n  hint: another offsync process has it open")]
    StoreLocked(String),

    #[error("invalid store key: '{0}'\n  hint: keys use letters, digits, '_', '-' and '.'")]
    InvalidKey(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for offsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
