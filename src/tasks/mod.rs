// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

pub mod announce;
pub mod pool;
pub mod requester;

use tracing::{debug, error};

use crate::{
    datalink,
    link::TxQueue,
    network::{self, msg::MsgKind},
};

/// Builds a payload-free request and queues it for the next transmit
/// opportunity.
pub fn queue_req(tx_q: &TxQueue, kind: MsgKind) {
    let Some(msg) = network::msg::request_msg(kind) else {
        error!(?kind, "not a request kind");
        return;
    };
    match network::create_pkt(&msg) {
        Ok(pkt) => {
            debug!(?kind, "queueing request");
            datalink::tx::tx_pkt_queue(tx_q, pkt);
        },
        Err(e) => error!(?kind, "building request failed: {e}"),
    }
}
