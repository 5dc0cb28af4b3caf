// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The `offsync` binary with a clean environment.
pub fn offsync() -> Command {
    let mut cmd = cargo_bin_cmd!("offsync");
    cmd.env_remove("OFFSYNC_DIR")
        .env_remove("OFFSYNC_OFFLINE")
        .env_remove("OFFSYNC_LOG");
    cmd
}

/// `offsync` run inside `temp`.
pub fn offsync_in(temp: &TempDir) -> Command {
    let mut cmd = offsync();
    cmd.current_dir(temp.path());
    cmd
}

/// Helper to create an initialized temp directory (file backend, outbox remote)
pub fn init_temp() -> TempDir {
    init_temp_with(&[])
}

/// Helper to create an initialized temp directory with extra init args
pub fn init_temp_with(args: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    offsync_in(&temp)
        .arg("init")
        .args(args)
        .assert()
        .success();
    temp
}

/// Reads the outbox as parsed JSON lines.
pub fn outbox_lines(temp: &TempDir) -> Vec<serde_json::Value> {
    let path = temp.path().join(".offsync/outbox.jsonl");
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// Runs a command with `-o json` and parses stdout.
pub fn json_output(temp: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = offsync_in(temp)
        .args(args)
        .args(["-o", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).unwrap()
}
