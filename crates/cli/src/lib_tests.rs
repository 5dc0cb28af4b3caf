// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

//! Tests for the public `run()` function.

use super::*;
use clap::Parser;
use tempfile::TempDir;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["offsync"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_explicit_directory_wins() {
    let root = project_root(Some(PathBuf::from("/explicit"))).unwrap();
    assert_eq!(root, PathBuf::from("/explicit"));
}

#[test]
fn test_commands_require_init() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();

    let err = run(cli(&["-C", dir, "status"])).unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
}

#[test]
fn test_run_init_then_enqueue() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();

    run(cli(&["-C", dir, "init"])).unwrap();
    run(cli(&["-C", dir, "enqueue", "form_submission", r#"{"a":1}"#])).unwrap();

    let queue_file = temp.path().join(".offsync/store/pending_sync.json");
    let queued: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(queue_file).unwrap()).unwrap();
    assert_eq!(queued[0]["kind"], "form_submission");
}

#[test]
fn test_init_twice_fails() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();

    run(cli(&["-C", dir, "init"])).unwrap();
    let err = run(cli(&["-C", dir, "init"])).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized(_)));
}

#[test]
fn test_store_lock_is_released_between_runs() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_str().unwrap();

    run(cli(&["-C", dir, "init"])).unwrap();
    for _ in 0..3 {
        run(cli(&["-C", dir, "enqueue", "ping"])).unwrap();
    }
    run(cli(&["-C", dir, "pending"])).unwrap();
}
