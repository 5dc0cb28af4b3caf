// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    store_closed = { Error::StoreClosed, "closed" },
    store_locked = { Error::StoreLocked("/tmp/store".into()), "/tmp/store" },
    invalid_key = { Error::InvalidKey("../etc".into()), "../etc" },
    invalid_input = { Error::InvalidInput("kind must not be empty".into()), "kind must not be empty" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

fn read_missing() -> Result<String> {
    Ok(std::fs::read_to_string("/nonexistent/offsync/value.json")?)
}

fn parse_garbage() -> Result<serde_json::Value> {
    Ok(serde_json::from_str("{not json")?)
}

#[test]
fn io_failures_propagate_through_question_mark() {
    assert!(matches!(read_missing(), Err(Error::Io(_))));
}

#[test]
fn json_failures_propagate_through_question_mark() {
    let err = parse_garbage().unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    assert!(err.to_string().starts_with("json error:"));
}

#[test]
fn hints_are_on_their_own_line() {
    let msg = Error::StoreLocked("x".into()).to_string();
    assert!(msg.contains("\n  hint: "));
}
