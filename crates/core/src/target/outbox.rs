// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local outbox target.
//!
//! Each delivered batch becomes one [`ClientMessage`] line in a JSONL file.
//! Useful when another process (or a USB stick) carries the data onward.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{BoxFuture, SyncTarget, TargetError, TargetResult};
use crate::documents::Document;
use crate::protocol::ClientMessage;
use crate::queue::PendingOperation;

/// A [`SyncTarget`] appending batches to a JSONL file.
#[derive(Debug)]
pub struct OutboxTarget {
    path: PathBuf,
    seq: AtomicU64,
}

impl OutboxTarget {
    /// Creates an outbox writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OutboxTarget {
            path: path.into(),
            seq: AtomicU64::new(0),
        }
    }

    /// Returns the outbox file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back every batch delivered so far.
    ///
    /// A line that does not parse (a write torn by a crash) is skipped.
    pub fn delivered(&self) -> crate::Result<Vec<ClientMessage>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut batches = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(msg) => batches.push(msg),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "skipping unreadable outbox line"
                ),
            }
        }
        Ok(batches)
    }

    fn next_batch_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        format!("outbox-{}-{seq}", std::process::id())
    }

    /// Appends `msg` on the blocking pool so the fsync does not stall the
    /// runtime thread.
    async fn deliver(&self, msg: ClientMessage) -> TargetResult<()> {
        let mut line =
            serde_json::to_string(&msg).map_err(|e| TargetError::Serialization(e.to_string()))?;
        line.push('\n');
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_line(&path, &line))
            .await
            .map_err(|e| TargetError::Io(e.to_string()))?
            .map_err(|e| TargetError::Io(e.to_string()))?;
        tracing::debug!(
            path = %self.path.display(),
            batch_id = msg.batch_id(),
            items = msg.len(),
            "wrote batch to outbox"
        );
        Ok(())
    }
}

impl SyncTarget for OutboxTarget {
    fn send_operations<'a>(
        &'a self,
        batch: &'a [PendingOperation],
    ) -> BoxFuture<'a, TargetResult<()>> {
        Box::pin(async move {
            let msg = ClientMessage::operations(self.next_batch_id(), batch.to_vec());
            self.deliver(msg).await
        })
    }

    fn send_documents<'a>(&'a self, batch: &'a [Document]) -> BoxFuture<'a, TargetResult<()>> {
        Box::pin(async move {
            let msg = ClientMessage::documents(self.next_batch_id(), batch.to_vec());
            self.deliver(msg).await
        })
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    // One write per batch keeps a crash from interleaving two batches
    file.write_all(line.as_bytes())?;
    file.sync_data()
}

#[cfg(test)]
#[path = "outbox_tests.rs"]
mod tests;
