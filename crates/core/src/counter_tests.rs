// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::store::MemoryStore;

#[test]
fn starts_at_zero() {
    let counter = PendingCounter::new(Arc::new(MemoryStore::open()));
    assert_eq!(counter.get(), 0);
}

#[test]
fn increment_persists() {
    let backing = Arc::new(MemoryStore::open());
    let counter = PendingCounter::new(backing.clone());

    assert_eq!(counter.increment().unwrap(), 1);
    assert_eq!(counter.increment().unwrap(), 2);

    let reloaded = PendingCounter::new(Arc::new(MemoryStore::from_export(backing.export())));
    assert_eq!(reloaded.get(), 2);
}

#[test]
fn set_zero_removes_key() {
    let backing = Arc::new(MemoryStore::open());
    let counter = PendingCounter::new(backing.clone());

    counter.set(3).unwrap();
    counter.set(0).unwrap();

    assert_eq!(counter.get(), 0);
    assert!(backing.read(COUNTER_KEY).unwrap().is_none());
}

#[test]
fn corrupt_count_reads_as_zero() {
    let backing = Arc::new(MemoryStore::open());
    backing.write(COUNTER_KEY, "\"three\"").unwrap();

    let counter = PendingCounter::new(backing);
    assert_eq!(counter.get(), 0);
    assert_eq!(counter.increment().unwrap(), 1);
}
