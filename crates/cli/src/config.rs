// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.offsync/config.toml` and includes:
//! - `backend`: which durable store holds pending work (`file` or `sqlite`)
//! - `[remote]`: where pending work is delivered
//! - `[connectivity]`: how reachability is detected
//! - `[sync]`: status display and save debounce timings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use offsync_core::{PollConfig, SyncConfig};

use crate::error::{Error, Result};

pub const WORK_DIR_NAME: &str = ".offsync";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_DIR_NAME: &str = "store";
const STORE_DB_NAME: &str = "store.db";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.offsync/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Durable store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per key under `.offsync/store/`
    #[default]
    File,
    /// A single SQLite database at `.offsync/store.db`
    Sqlite,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Backend::File => "file",
            Backend::Sqlite => "sqlite",
        })
    }
}

/// Where pending work is delivered.
///
/// Supports two remote types:
/// - Outbox: `outbox:<path>` - JSONL file, relative paths resolve against `.offsync/`
/// - WebSocket: `ws://...` or `wss://...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_url")]
    pub url: String,
    /// Max time for one batch exchange in seconds (default: 10).
    /// Only relevant for WebSocket remotes.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// The type of remote, resolved from its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteType {
    Outbox(PathBuf),
    WebSocket(String),
}

impl RemoteConfig {
    /// Resolves the remote type. Outbox paths are resolved against `work_dir`.
    pub fn remote_type(&self, work_dir: &Path) -> Result<RemoteType> {
        let url = self.url.trim();
        if url.starts_with("ws://") || url.starts_with("wss://") {
            return Ok(RemoteType::WebSocket(url.to_string()));
        }
        match url.strip_prefix("outbox:") {
            Some(path) if !path.is_empty() => Ok(RemoteType::Outbox(work_dir.join(path))),
            _ => Err(Error::InvalidRemote(self.url.clone())),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: default_remote_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Reachability detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// `host:port` to probe with a TCP connect. Absent means assume online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<String>,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Consecutive disagreeing probes before the state flips (default: 2).
    #[serde(default = "default_debounce_samples")]
    pub debounce_samples: u32,
}

impl ConnectivityConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            debounce_samples: self.debounce_samples,
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            probe: None,
            probe_timeout_ms: default_probe_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            debounce_samples: default_debounce_samples(),
        }
    }
}

/// Sync engine timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,
}

impl SyncSettings {
    pub fn engine_config(&self) -> SyncConfig {
        SyncConfig {
            success_display: Duration::from_millis(self.success_display_ms),
            error_display: Duration::from_millis(self.error_display_ms),
            save_debounce: Duration::from_millis(self.save_debounce_ms),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            success_display_ms: default_success_display_ms(),
            error_display_ms: default_error_display_ms(),
            save_debounce_ms: default_save_debounce_ms(),
        }
    }
}

fn default_remote_url() -> String {
    "outbox:outbox.jsonl".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_probe_timeout_ms() -> u64 {
    1_500
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_debounce_samples() -> u32 {
    2
}

fn default_success_display_ms() -> u64 {
    3_000
}

fn default_error_display_ms() -> u64 {
    5_000
}

fn default_save_debounce_ms() -> u64 {
    1_000
}

impl Config {
    /// Loads configuration from the given `.offsync/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let path = work_dir.join(CONFIG_FILE_NAME);
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Saves configuration to the given `.offsync/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("cannot serialize config: {e}")))?;
        fs::write(work_dir.join(CONFIG_FILE_NAME), text)?;
        Ok(())
    }

    /// Returns where the configured backend keeps its data.
    pub fn store_path(&self, work_dir: &Path) -> PathBuf {
        match self.backend {
            Backend::File => work_dir.join(STORE_DIR_NAME),
            Backend::Sqlite => work_dir.join(STORE_DB_NAME),
        }
    }
}

/// Find the .offsync directory by walking up from `start`
pub fn find_work_dir(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(WORK_DIR_NAME))
        .find(|candidate| candidate.is_dir())
        .ok_or(Error::NotInitialized)
}

/// Initialize a new .offsync directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    // Reject a bad remote before anything touches the disk
    config.remote.remote_type(&work_dir)?;

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// Pending work and the outbox are device-local; only the config is shared.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    fs::write(
        work_dir.join(GITIGNORE_FILE_NAME),
        "# Device-local pending work\nstore/\nstore.db\n*.jsonl\n",
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
