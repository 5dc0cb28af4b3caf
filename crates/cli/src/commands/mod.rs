// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod cache;
pub mod docs;
pub mod enqueue;
pub mod init;
pub mod pending;
pub mod save;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use offsync_core::{
    ConnectivityMonitor, DurableStore, FileStore, OutboxTarget, ReachabilityProbe, SqliteStore,
    SyncEngine, SyncTarget, TcpProbe, WebSocketTarget,
};
use serde_json::{Map, Value};

use crate::config::{Backend, Config, RemoteType};
use crate::env;
use crate::error::{Error, Result};

/// Opens the sync engine for a project.
///
/// Must be called inside a tokio runtime so the engine can run its timers
/// and connectivity listener.
pub async fn open_engine(work_dir: &Path, config: &Config) -> Result<SyncEngine> {
    let store_path = config.store_path(work_dir);
    let store: Arc<dyn DurableStore> = match config.backend {
        Backend::File => Arc::new(FileStore::open(&store_path)?),
        Backend::Sqlite => Arc::new(SqliteStore::open(&store_path)?),
    };

    let target = open_target(work_dir, config)?;
    let monitor = Arc::new(ConnectivityMonitor::new(initial_reachability(config).await));

    let engine = SyncEngine::builder(store, target)
        .monitor(monitor)
        .config(config.sync.engine_config())
        .open()?;
    Ok(engine)
}

/// Builds the configured remote target.
pub fn open_target(work_dir: &Path, config: &Config) -> Result<Arc<dyn SyncTarget>> {
    let target: Arc<dyn SyncTarget> = match config.remote.remote_type(work_dir)? {
        RemoteType::Outbox(path) => Arc::new(OutboxTarget::new(path)),
        RemoteType::WebSocket(url) => Arc::new(WebSocketTarget::new(url, config.remote.timeout())),
    };
    Ok(target)
}

/// First connectivity reading for a fresh process.
///
/// `None` (no signal) makes the monitor assume it is online.
async fn initial_reachability(config: &Config) -> Option<bool> {
    if env::force_offline() {
        return Some(false);
    }
    match &config.connectivity.probe {
        Some(addr) => {
            let probe = TcpProbe::new(addr.clone(), config.connectivity.probe_timeout());
            Some(probe.probe().await)
        }
        None => None,
    }
}

/// Parses an optional JSON argument, defaulting to an empty object.
pub fn parse_json_arg(
    raw: Option<&str>,
    what: &'static str,
    example: &'static str,
) -> Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Object(Map::new()));
    };
    serde_json::from_str(raw).map_err(|e| Error::InvalidJson {
        what,
        reason: e.to_string(),
        example,
    })
}

/// Parses an optional JSON object argument.
pub fn parse_json_object(
    raw: Option<&str>,
    what: &'static str,
    example: &'static str,
) -> Result<Map<String, Value>> {
    match parse_json_arg(raw, what, example)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidJson {
            what,
            reason: format!("expected an object, got {}", json_kind(&other)),
            example,
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
