// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The task owning the RS-485 side: it alone reads from and writes to the
//! transceiver.
//!
//! Every loop iteration services the IP-side command queue, drives the RX
//! pipeline up through the state store, and, when the controller's broadcast
//! opens a transmit window, drains one queued frame onto the wire.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::{sync::mpsc, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    datalink::{pkt::DatalinkPkt, rx::Packetizer, tx::tx_pkt_queue},
    hass,
    ipc::{Command, EgressTx},
    link::{Link, Transceiver, TxQueue},
    network::{self, msg::MsgKind},
    poolstate::store::PoolStateStore,
    tasks::queue_req,
};

pub struct PoolTask<T> {
    link: Link<T>,
    packetizer: Packetizer,
    store: Arc<PoolStateStore>,
    board: String,
    commands: mpsc::Receiver<Command>,
    egress: EgressTx,
    cancel: CancellationToken,
}

impl<T: Transceiver> PoolTask<T> {
    pub fn new(
        link: Link<T>,
        store: Arc<PoolStateStore>,
        board: String,
        commands: mpsc::Receiver<Command>,
        egress: EgressTx,
        cancel: CancellationToken,
    ) -> Self {
        let packetizer =
            Packetizer::new(network::msg::ic_data_len, link.read_timeout());
        Self { link, packetizer, store, board, commands, egress, cancel }
    }

    /// A producer handle for other tasks to queue outbound frames.
    pub fn tx_queue(&self) -> TxQueue {
        self.link.tx_queue()
    }

    /// Runs until cancelled. Transport errors are logged and retried; the
    /// bus carries idempotent broadcasts, so nothing is lost by waiting for
    /// the next one.
    pub async fn run(mut self) {
        // request some initial information from the controller
        let tx_q = self.link.tx_queue();
        queue_req(&tx_q, MsgKind::CtrlVersionReq);
        queue_req(&tx_q, MsgKind::CtrlTimeReq);
        info!(board = %self.board, "pool task up");

        while !self.cancel.is_cancelled() {
            if let Err(e) = self.iterate().await {
                warn!("link error: {e}; retrying");
                sleep(Duration::from_secs(1)).await;
            }
        }
    }

    async fn iterate(&mut self) -> Result<()> {
        self.service_commands();

        // read from the bus until there is a packet, then move it up the
        // stack; a completed controller broadcast doubles as permission to
        // transmit one queued frame
        if let Some(pkt) = self.packetizer.rx_pkt(&mut self.link).await? {
            let tx_opportunity = self.decode_and_update(&pkt);
            if tx_opportunity {
                self.forward_queued_pkt().await?;
            }
        }
        Ok(())
    }

    /// Maps pending `(topic, value)` commands to bus messages and queues
    /// them. Non-blocking: drains whatever is there right now.
    fn service_commands(&mut self) {
        while let Ok(cmd) = self.commands.try_recv() {
            match hass::rx_set(&cmd.topic, &cmd.value, &self.store) {
                Some(msg) => match network::create_pkt(&msg) {
                    Ok(pkt) => tx_pkt_queue(&self.link.tx_queue(), pkt),
                    Err(e) => warn!(topic = %cmd.topic, "encoding command failed: {e}"),
                },
                None => warn!(topic = %cmd.topic, "ignoring unknown command"),
            }
        }
    }

    /// Decode, update the store, publish on change. Returns whether the
    /// packet flagged a transmit opportunity.
    fn decode_and_update(&mut self, pkt: &DatalinkPkt) -> bool {
        let decoded = network::rx_msg(pkt);
        if let Some(msg) = decoded.msg {
            debug!(kind = ?msg.kind(), "rx");
            if crate::poolstate::rx::rx_update(&self.store, &msg) {
                let (state, _valid) = self.store.get();
                hass::tx_state(&state, &self.board, &self.egress);
            }
        }
        decoded.tx_opportunity
    }

    /// Writes one queued frame to the wire under the RTS discipline, then
    /// feeds it back through decode-and-update so local commands observably
    /// change the snapshot without waiting for a controller echo.
    async fn forward_queued_pkt(&mut self) -> Result<()> {
        let Some(pkt) = self.link.dequeue() else {
            return Ok(());
        };
        self.link.set_tx_mode(true).await?;
        let res = self.link.write_bytes(pkt.frame()).await;
        self.link.set_tx_mode(false).await?;
        res?;

        self.decode_and_update(&pkt);
        Ok(())
    }
}
