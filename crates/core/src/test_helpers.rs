// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for engine tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::documents::Document;
use crate::queue::PendingOperation;
use crate::target::{BoxFuture, SyncTarget, TargetError, TargetResult};

/// In-memory sync target that records every batch it accepts.
#[derive(Default)]
pub struct RecordingTarget {
    operations: Mutex<Vec<Vec<PendingOperation>>>,
    documents: Mutex<Vec<Vec<Document>>>,
    failures: Mutex<VecDeque<TargetError>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl RecordingTarget {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates a target whose sends block until `gate` is notified.
    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(RecordingTarget {
            gate: Some(gate),
            ..Self::default()
        })
    }

    /// Makes the next send fail with `error`.
    pub fn fail_next(&self, error: TargetError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Number of send calls, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Operation batches accepted so far.
    pub fn operation_batches(&self) -> Vec<Vec<PendingOperation>> {
        self.operations.lock().unwrap().clone()
    }

    /// Document batches accepted so far.
    pub fn document_batches(&self) -> Vec<Vec<Document>> {
        self.documents.lock().unwrap().clone()
    }

    async fn accept(&self) -> TargetResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl SyncTarget for RecordingTarget {
    fn send_operations<'a>(
        &'a self,
        batch: &'a [PendingOperation],
    ) -> BoxFuture<'a, TargetResult<()>> {
        Box::pin(async move {
            self.accept().await?;
            self.operations.lock().unwrap().push(batch.to_vec());
            Ok(())
        })
    }

    fn send_documents<'a>(&'a self, batch: &'a [Document]) -> BoxFuture<'a, TargetResult<()>> {
        Box::pin(async move {
            self.accept().await?;
            self.documents.lock().unwrap().push(batch.to_vec());
            Ok(())
        })
    }
}

/// Yields until `target` has seen `calls` sends.
pub async fn wait_for_calls(target: &RecordingTarget, calls: usize) {
    while target.calls() < calls {
        tokio::task::yield_now().await;
    }
}
