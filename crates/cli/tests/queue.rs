// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

mod common;
use common::*;

#[test]
fn enqueue_reports_pending_count() {
    let temp = init_temp();

    offsync_in(&temp)
        .args(["enqueue", "form_submission", r#"{"name":"Ada"}"#])
        .assert()
        .success()
        .stdout("Queued form_submission (1 pending)\n");

    offsync_in(&temp)
        .args(["enqueue", "form_submission"])
        .assert()
        .success()
        .stdout("Queued form_submission (2 pending)\n");
}

#[test]
fn enqueue_rejects_invalid_json() {
    let temp = init_temp();

    offsync_in(&temp)
        .args(["enqueue", "form_submission", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid payload"));

    let pending = json_output(&temp, &["pending"]);
    assert_eq!(pending["pending_count"], 0);
}

#[test]
fn queue_survives_between_processes_in_order() {
    let temp = init_temp();
    for kind in ["first", "second", "third"] {
        offsync_in(&temp).args(["enqueue", kind]).assert().success();
    }

    let pending = json_output(&temp, &["pending"]);
    let kinds: Vec<_> = pending["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["first", "second", "third"]);
    assert_eq!(pending["pending_count"], 3);
}

#[test]
fn sync_delivers_fifo_batch_to_outbox() {
    let temp = init_temp();
    for kind in ["a", "b", "c"] {
        offsync_in(&temp).args(["enqueue", kind]).assert().success();
    }

    offsync_in(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("synced 3 operation(s), 0 document(s)"));

    let lines = outbox_lines(&temp);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["type"], "operations");
    let kinds: Vec<_> = lines[0]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["a", "b", "c"]);

    assert_eq!(json_output(&temp, &["pending"])["pending_count"], 0);
}

#[test]
fn sync_with_nothing_pending_is_a_no_op() {
    let temp = init_temp();

    offsync_in(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: nothing pending"));

    assert!(outbox_lines(&temp).is_empty());
}

#[test]
fn sync_while_offline_keeps_queue() {
    let temp = init_temp();
    offsync_in(&temp).args(["enqueue", "a"]).assert().success();

    offsync_in(&temp)
        .env("OFFSYNC_OFFLINE", "1")
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: offline"));

    assert!(outbox_lines(&temp).is_empty());
    assert_eq!(json_output(&temp, &["pending"])["pending_count"], 1);
}

#[test]
fn failed_sync_exits_nonzero_and_keeps_queue() {
    let temp = init_temp_with(&["--remote", "outbox:blocked/outbox.jsonl"]);
    // A file where the outbox directory should be
    std::fs::write(temp.path().join(".offsync/blocked"), "").unwrap();
    offsync_in(&temp).args(["enqueue", "a"]).assert().success();

    offsync_in(&temp)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("sync failed"))
        .stderr(predicate::str::contains("will be retried"));

    assert_eq!(json_output(&temp, &["pending"])["pending_count"], 1);
}

#[test]
fn sqlite_backend_round_trips_queue() {
    let temp = init_temp_with(&["--backend", "sqlite"]);
    offsync_in(&temp).args(["enqueue", "a"]).assert().success();
    offsync_in(&temp).args(["enqueue", "b"]).assert().success();

    offsync_in(&temp).arg("sync").assert().success();

    assert_eq!(outbox_lines(&temp)[0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(json_output(&temp, &["pending"])["pending_count"], 0);
}
