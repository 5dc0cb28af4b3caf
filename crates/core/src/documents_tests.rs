// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::clock::ManualClock;
use crate::store::MemoryStore;
use serde_json::json;
use yare::parameterized;

fn make_store(now_ms: u64) -> (DocumentStore, Arc<ManualClock>, Arc<MemoryStore>) {
    let backing = Arc::new(MemoryStore::open());
    let clock = Arc::new(ManualClock::new(now_ms));
    let docs = DocumentStore::new(backing.clone(), clock.clone());
    (docs, clock, backing)
}

#[test]
fn save_generates_type_timestamp_id() {
    let (docs, _, _) = make_store(1_700_000_000_000);

    let stored = docs
        .save(NewDocument::new("media").field("caption", json!("flood")))
        .unwrap();

    assert_eq!(stored.document.id, "media_1700000000000");
    assert!(!stored.document.synced);
    assert!(stored.newly_pending);
    assert_eq!(stored.document.fields["caption"], "flood");
}

#[test]
fn save_keeps_caller_id() {
    let (docs, _, _) = make_store(1000);

    let stored = docs.save(NewDocument::new("report").with_id("r-1")).unwrap();

    assert_eq!(stored.document.id, "r-1");
}

#[parameterized(
    empty = { "" },
    blank = { "   " },
)]
fn save_generates_id_for_blank_caller_id(id: &str) {
    let (docs, _, _) = make_store(42);

    let stored = docs.save(NewDocument::new("report").with_id(id)).unwrap();

    assert_eq!(stored.document.id, "report_42");
}

#[test]
fn save_rejects_empty_type() {
    let (docs, _, _) = make_store(1000);

    let err = docs.save(NewDocument::new(" ")).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn generated_ids_stay_unique_within_one_millisecond() {
    let (docs, _, _) = make_store(5000);

    let a = docs.save(NewDocument::new("media")).unwrap();
    let b = docs.save(NewDocument::new("media")).unwrap();

    assert_eq!(a.document.id, "media_5000");
    assert_eq!(b.document.id, "media_5001");
    assert_eq!(docs.all().len(), 2);
}

#[test]
fn saving_existing_id_replaces_document() {
    let (docs, clock, _) = make_store(1000);

    docs.save(NewDocument::new("report").with_id("r-1").field("v", json!(1)))
        .unwrap();
    clock.advance(10);
    let stored = docs
        .save(NewDocument::new("report").with_id("r-1").field("v", json!(2)))
        .unwrap();

    assert!(!stored.newly_pending);
    let all = docs.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].fields["v"], 2);
}

#[test]
fn resaving_synced_document_makes_it_pending_again() {
    let (docs, clock, _) = make_store(1000);

    let first = docs.save(NewDocument::new("report").with_id("r-1")).unwrap();
    docs.mark_synced(&[first.document]).unwrap();
    clock.advance(10);

    let again = docs.save(NewDocument::new("report").with_id("r-1")).unwrap();

    assert!(again.newly_pending);
    assert_eq!(docs.unsynced_count(), 1);
}

#[test]
fn reserved_fields_are_ignored() {
    let (docs, _, _) = make_store(1000);

    let stored = docs
        .save(
            NewDocument::new("media")
                .field("synced", json!(true))
                .field("type", json!("other"))
                .field("note", json!("kept")),
        )
        .unwrap();

    assert!(!stored.document.synced);
    assert_eq!(stored.document.doc_type, "media");
    assert_eq!(stored.document.fields.len(), 1);
}

#[test]
fn query_matches_type_exactly() {
    let (docs, clock, _) = make_store(1000);

    docs.save(NewDocument::new("media")).unwrap();
    clock.advance(1);
    docs.save(NewDocument::new("media_extra")).unwrap();
    clock.advance(1);
    docs.save(NewDocument::new("med")).unwrap();
    clock.advance(1);
    docs.save(NewDocument::new("media")).unwrap();

    let media = docs.query("media");
    assert_eq!(media.len(), 2);
    assert!(media.iter().all(|d| d.doc_type == "media"));
    assert_eq!(media[0].id, "media_1000");
    assert_eq!(media[1].id, "media_1003");
    assert!(docs.query("unknown").is_empty());
}

#[test]
fn stored_layout_is_flat() {
    let (docs, _, backing) = make_store(0);

    docs.save(NewDocument::new("media").field("caption", json!("x")))
        .unwrap();

    let raw = backing.read(DOCUMENTS_KEY).unwrap().unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["type"], "media");
    assert_eq!(value[0]["caption"], "x");
    assert_eq!(value[0]["synced"], false);
    assert!(value[0]["timestamp"].as_str().unwrap().starts_with("1970-01-01T00:00:00"));
}

#[test]
fn mark_synced_flips_only_delivered_versions() {
    let (docs, clock, _) = make_store(1000);

    let a = docs.save(NewDocument::new("media").with_id("a")).unwrap();
    let b = docs.save(NewDocument::new("media").with_id("b")).unwrap();
    let snapshot = vec![a.document, b.document];

    // "b" is edited after the snapshot was taken.
    clock.advance(5);
    docs.save(NewDocument::new("media").with_id("b")).unwrap();

    let flipped = docs.mark_synced(&snapshot).unwrap();

    assert_eq!(flipped, 1);
    let unsynced: Vec<_> = docs.unsynced().into_iter().map(|d| d.id).collect();
    assert_eq!(unsynced, vec!["b"]);
}

#[test]
fn mark_synced_ignores_same_millisecond_edit() {
    let (docs, _, _) = make_store(1000);

    let sent = docs
        .save(NewDocument::new("note").with_id("n1").field("v", json!(1)))
        .unwrap()
        .document;
    // Clock has not moved, so only the fields differ
    docs.save(NewDocument::new("note").with_id("n1").field("v", json!(2)))
        .unwrap();

    assert_eq!(docs.mark_synced(&[sent]).unwrap(), 0);
    let stored = docs.query("note");
    assert_eq!(stored[0].fields["v"], 2);
    assert!(!stored[0].synced);
}

#[test]
fn corrupt_collection_reads_as_empty() {
    let (docs, _, backing) = make_store(0);
    backing.write(DOCUMENTS_KEY, "not json").unwrap();

    assert!(docs.all().is_empty());
    assert!(docs.query("media").is_empty());
    assert_eq!(docs.unsynced_count(), 0);
}
