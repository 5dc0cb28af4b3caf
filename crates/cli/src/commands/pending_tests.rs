// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use serde_json::json;

#[test]
fn test_format_operation_line() {
    let op: PendingOperation = serde_json::from_value(json!({
        "kind": "form_submission",
        "payload": {"a": 1},
        "enqueued_at": "2023-11-14T22:13:20Z",
    }))
    .unwrap();

    assert_eq!(
        format_operation_line(&op),
        r#"2023-11-14 22:13:20  form_submission  {"a":1}"#
    );
}

#[tokio::test]
async fn test_pending_report_counts_documents_too() {
    let ctx = TestContext::offline();
    ctx.engine.enqueue("a", json!({})).unwrap();
    ctx.engine
        .save_document(offsync_core::NewDocument::new("media"))
        .unwrap();

    let report = PendingReport {
        pending_count: ctx.engine.pending_count(),
        operations: ctx.engine.pending_operations(),
    };
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["pending_count"], 2);
    assert_eq!(value["operations"].as_array().unwrap().len(), 1);

    run(&ctx.engine, OutputFormat::Text).unwrap();
}
