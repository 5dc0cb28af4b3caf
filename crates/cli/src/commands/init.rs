// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use offsync_core::{DurableStore, FileStore, SqliteStore};

use crate::config::{init_work_dir, Backend, Config, RemoteConfig};
use crate::error::Result;

pub fn run(path: &Path, backend: Backend, remote: Option<String>) -> Result<()> {
    let mut config = Config {
        backend,
        ..Config::default()
    };
    if let Some(url) = remote {
        config.remote = RemoteConfig {
            url,
            ..RemoteConfig::default()
        };
    }

    let work_dir = init_work_dir(path, &config)?;

    // Create the store up front so a broken backend shows up here
    let store_path = config.store_path(&work_dir);
    let store: Box<dyn DurableStore> = match backend {
        Backend::File => Box::new(FileStore::open(&store_path)?),
        Backend::Sqlite => Box::new(SqliteStore::open(&store_path)?),
    };
    store.close()?;

    println!("Initialized offsync at {}", work_dir.display());
    println!("Backend: {}", config.backend);
    println!("Remote: {}", config.remote.url);
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
