// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Bounded channels between the bus-facing tasks and the IP-side surface.
//!
//! MQTT and HTTP transports live outside this crate; these message types are
//! their contract. Overflow on any queue drops the newest message with a
//! warning, the same way the wire-side queues behave.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::warn;

/// Depth of the command queue.
pub const COMMAND_QUEUE_DEPTH: usize = 16;

/// Depth of the egress queue. One state change fans out into a publication
/// per dispatch-table entity plus the snapshot, so this must comfortably
/// hold a full fan-out.
pub const EGRESS_QUEUE_DEPTH: usize = 64;

/// A `(topic, value)` command from any IP-side producer towards the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub topic: String,
    pub value: String,
}

/// Everything the bridge wants published or subscribed on the broker.
#[derive(Debug, Clone, PartialEq)]
pub enum ToMqtt {
    Publish { topic: String, payload: String },
    Subscribe { topic: String },
    /// Full snapshot JSON for the broker-side state topic.
    State(Value),
}

/// Sender half of the egress queue with the drop-newest discipline.
#[derive(Debug, Clone)]
pub struct EgressTx {
    tx: mpsc::Sender<ToMqtt>,
}

impl EgressTx {
    pub fn send(&self, msg: ToMqtt) {
        if let Err(mpsc::error::TrySendError::Full(msg)) = self.tx.try_send(msg) {
            warn!(?msg, "egress queue full, dropping");
        }
    }

    pub fn publish(&self, topic: String, payload: String) {
        self.send(ToMqtt::Publish { topic, payload });
    }

    pub fn subscribe(&self, topic: String) {
        self.send(ToMqtt::Subscribe { topic });
    }
}

/// Sender half of the command queue with the drop-newest discipline.
#[derive(Debug, Clone)]
pub struct CommandTx {
    tx: mpsc::Sender<Command>,
}

impl CommandTx {
    pub fn send(&self, cmd: Command) {
        if let Err(mpsc::error::TrySendError::Full(cmd)) = self.tx.try_send(cmd) {
            warn!(topic = %cmd.topic, "command queue full, dropping");
        }
    }
}

pub fn egress_channel() -> (EgressTx, mpsc::Receiver<ToMqtt>) {
    let (tx, rx) = mpsc::channel(EGRESS_QUEUE_DEPTH);
    (EgressTx { tx }, rx)
}

pub fn command_channel() -> (CommandTx, mpsc::Receiver<Command>) {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
    (CommandTx { tx }, rx)
}
