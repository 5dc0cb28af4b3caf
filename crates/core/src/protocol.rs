// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire messages exchanged with a remote sync target.
//!
//! The protocol is one request, one reply:
//! - Client sends a whole batch (operations or documents) under a batch id
//! - Server answers `ack` or `reject` for that batch id

use serde::{Deserialize, Serialize};

use crate::documents::Document;
use crate::queue::PendingOperation;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A batch of queued operations, in enqueue order.
    Operations {
        batch_id: String,
        items: Vec<PendingOperation>,
    },

    /// A batch of unsynced documents.
    Documents {
        batch_id: String,
        items: Vec<Document>,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The whole batch was accepted.
    Ack { batch_id: String },

    /// The batch was refused; the client keeps it for a later retry.
    Reject {
        batch_id: String,
        /// Human-readable reason.
        reason: String,
    },
}

impl ClientMessage {
    /// Creates an Operations message.
    pub fn operations(batch_id: impl Into<String>, items: Vec<PendingOperation>) -> Self {
        ClientMessage::Operations {
            batch_id: batch_id.into(),
            items,
        }
    }

    /// Creates a Documents message.
    pub fn documents(batch_id: impl Into<String>, items: Vec<Document>) -> Self {
        ClientMessage::Documents {
            batch_id: batch_id.into(),
            items,
        }
    }

    /// Returns the batch id.
    pub fn batch_id(&self) -> &str {
        match self {
            ClientMessage::Operations { batch_id, .. }
            | ClientMessage::Documents { batch_id, .. } => batch_id,
        }
    }

    /// Returns the number of items in the batch.
    pub fn len(&self) -> usize {
        match self {
            ClientMessage::Operations { items, .. } => items.len(),
            ClientMessage::Documents { items, .. } => items.len(),
        }
    }

    /// Returns true if the batch carries no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the message as one text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a text frame.
    pub fn decode(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}

impl ServerMessage {
    /// Creates an Ack message.
    pub fn ack(batch_id: impl Into<String>) -> Self {
        ServerMessage::Ack {
            batch_id: batch_id.into(),
        }
    }

    /// Creates a Reject message.
    pub fn reject(batch_id: impl Into<String>, reason: impl Into<String>) -> Self {
        ServerMessage::Reject {
            batch_id: batch_id.into(),
            reason: reason.into(),
        }
    }

    /// Returns the batch id this reply refers to.
    pub fn batch_id(&self) -> &str {
        match self {
            ServerMessage::Ack { batch_id } | ServerMessage::Reject { batch_id, .. } => batch_id,
        }
    }

    /// Encodes the message as one text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a text frame.
    pub fn decode(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
