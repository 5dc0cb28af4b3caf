// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket sync target using tokio-tungstenite.
//!
//! Each batch opens its own connection, sends one [`ClientMessage`] and
//! waits for the [`ServerMessage`] carrying the same batch id. Connections
//! are not kept between drains; drains are rare and usually follow a
//! connectivity change that would have broken a cached socket anyway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use super::{BoxFuture, SyncTarget, TargetError, TargetResult};
use crate::documents::Document;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::queue::PendingOperation;

/// A [`SyncTarget`] speaking the batch protocol over WebSocket.
#[derive(Debug)]
pub struct WebSocketTarget {
    url: String,
    timeout: Duration,
    seq: AtomicU64,
}

impl WebSocketTarget {
    /// Creates a target for `url` (`ws://` or `wss://`).
    ///
    /// `timeout` bounds a whole exchange: connect, send and acknowledgement.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        WebSocketTarget {
            url: url.into(),
            timeout,
            seq: AtomicU64::new(0),
        }
    }

    /// Returns the server URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_batch_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        format!("batch-{}-{seq}", std::process::id())
    }

    async fn deliver(&self, msg: ClientMessage) -> TargetResult<()> {
        match tokio::time::timeout(self.timeout, self.exchange(&msg)).await {
            Ok(result) => result,
            Err(_) => Err(TargetError::Timeout(self.timeout)),
        }
    }

    async fn exchange(&self, msg: &ClientMessage) -> TargetResult<()> {
        let (mut ws, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| TargetError::ConnectionFailed(e.to_string()))?;

        let json = msg
            .encode()
            .map_err(|e| TargetError::Serialization(e.to_string()))?;
        ws.send(Message::Text(json.into()))
            .await
            .map_err(|e| TargetError::SendFailed(e.to_string()))?;
        tracing::debug!(
            url = %self.url,
            batch_id = msg.batch_id(),
            items = msg.len(),
            "sent batch"
        );

        let reply = loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    let reply = ServerMessage::decode(&text)
                        .map_err(|e| TargetError::Serialization(e.to_string()))?;
                    if reply.batch_id() == msg.batch_id() {
                        break reply;
                    }
                    tracing::debug!(got = reply.batch_id(), "ignoring reply for another batch");
                }
                Some(Ok(Message::Close(_))) | None => return Err(TargetError::ConnectionClosed),
                // Ping/pong are answered by tungstenite
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TargetError::ReceiveFailed(e.to_string())),
            }
        };

        let _ = ws.close(None).await;

        match reply {
            ServerMessage::Ack { .. } => Ok(()),
            ServerMessage::Reject { reason, .. } => Err(TargetError::Rejected(reason)),
        }
    }
}

impl SyncTarget for WebSocketTarget {
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

#[cfg(test)]
#[path = "websocket_tests.rs"]
mod tests;
