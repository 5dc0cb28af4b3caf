// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns the value of `OFFSYNC_DIR` if set and non-empty.
pub fn project_dir() -> Option<PathBuf> {
    std::env::var(vars::OFFSYNC_DIR)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Returns `true` if `OFFSYNC_OFFLINE=1`.
pub fn force_offline() -> bool {
    std::env::var(vars::OFFSYNC_OFFLINE).is_ok_and(|v| v == "1")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
