// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offsync_core::SyncEngine;

use super::parse_json_arg;
use crate::error::{Error, Result};

pub fn set(engine: &SyncEngine, key: &str, value: &str) -> Result<()> {
    let value = parse_json_arg(Some(value), "cache value", "{\"theme\":\"dark\"}")?;
    engine.save_offline_data(key, value)?;
    println!("Cached {key}");
    Ok(())
}

pub fn get(engine: &SyncEngine, key: &str) -> Result<()> {
    let value = engine
        .offline_data(key)
        .ok_or_else(|| Error::CacheMiss(key.to_string()))?;
    println!("{value}");
    Ok(())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
