// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::error::Error;
use serde_json::json;

#[tokio::test]
async fn test_enqueue_with_payload() {
    let ctx = TestContext::offline();
    run(&ctx.engine, "form_submission", Some(r#"{"name":"Ada"}"#)).unwrap();

    let ops = ctx.engine.pending_operations();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].kind, "form_submission");
    assert_eq!(ops[0].payload, json!({"name": "Ada"}));
}

#[tokio::test]
async fn test_enqueue_defaults_to_empty_object() {
    let ctx = TestContext::offline();
    run(&ctx.engine, "ping", None).unwrap();

    assert_eq!(ctx.engine.pending_operations()[0].payload, json!({}));
}

#[tokio::test]
async fn test_enqueue_rejects_bad_json() {
    let ctx = TestContext::offline();
    let err = run(&ctx.engine, "ping", Some("{nope")).unwrap_err();

    assert!(matches!(err, Error::InvalidJson { what: "payload", .. }));
    assert_eq!(ctx.engine.pending_count(), 0);
}

#[tokio::test]
async fn test_enqueue_rejects_empty_kind() {
    let ctx = TestContext::offline();
    let err = run(&ctx.engine, " ", None).unwrap_err();

    assert!(matches!(err, Error::Core(offsync_core::Error::InvalidInput(_))));
}
