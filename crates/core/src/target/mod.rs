// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sync targets.
//!
//! A [`SyncTarget`] accepts a whole batch and answers success or failure for
//! the batch as a unit. There is no per-item acknowledgement.
//!
//! - [`WebSocketTarget`]: sends each batch over a WebSocket and waits for
//!   the server's `ack` / `reject`
//! - [`OutboxTarget`]: appends each batch to a local JSONL file for another
//!   process to pick up

mod outbox;
mod websocket;

pub use outbox::OutboxTarget;
pub use websocket::WebSocketTarget;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::documents::Document;
use crate::queue::PendingOperation;

/// Boxed future returned by [`SyncTarget`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for transmission to a sync target.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed before the batch was acknowledged.
    #[error("connection closed before acknowledgement")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// The target refused the batch.
    #[error("batch rejected: {0}")]
    Rejected(String),

    /// No answer within the configured time.
    #[error("no acknowledgement within {0:?}")]
    Timeout(Duration),

    /// The engine was closed while the batch was in flight.
    #[error("cancelled")]
    Cancelled,

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Local I/O failed.
    #[error("io error: {0}")]
    Io(String),
}

/// Result type for transmission.
pub type TargetResult<T> = Result<T, TargetError>;

/// The remote authority pending work is reconciled with.
pub trait SyncTarget: Send + Sync {
    /// Delivers a batch of operations, in order.
    fn send_operations<'a>(
        &'a self,
        batch: &'a [PendingOperation],
    ) -> BoxFuture<'a, TargetResult<()>>;

    /// Delivers a batch of documents.
    fn send_documents<'a>(&'a self, batch: &'a [Document]) -> BoxFuture<'a, TargetResult<()>>;
}
