// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Drives the complete pool task over an in-memory wire: frames in, frames
//! out, state snapshots to the egress queue.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use hex_literal::hex;
use pool_bridge_rs::{
    ipc::{self, Command, ToMqtt},
    link::Link,
    poolstate::store::PoolStateStore,
    tasks::pool::PoolTask,
};
use tokio::{io::AsyncWriteExt, sync::mpsc, time::sleep};
use tokio_util::sync::CancellationToken;

use super::common::{read_frame, test_config};

// Controller state broadcast (src CTRL, dst ALL): spa active, checksum 0x02EB.
const STATE_BCAST: [u8; 39] = hex!(
    "00 FF A5 01 0F 10 02 1D 0F 20 01 02 00 00 00 00 00 00 00 00 00 40 37 28 4A 03 4D 50 4B 00 01 00 00 00 00 00 00 02 EB"
);

const VERSION_REQ_FRAME: [u8; 11] = hex!("FF 00 FF A5 01 10 22 FD 00 01 D5");
const TIME_REQ_FRAME: [u8; 11] = hex!("FF 00 FF A5 01 10 22 C5 00 01 9D");
const AUX1_SET_FRAME: [u8; 13] = hex!("FF 00 FF A5 01 10 22 86 02 02 01 01 63");

struct Harness {
    wire: tokio::io::DuplexStream,
    commands: ipc::CommandTx,
    egress: mpsc::Receiver<ToMqtt>,
    store: Arc<PoolStateStore>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

fn spawn_pool_task() -> Harness {
    let cfg = test_config();
    let (near, wire) = tokio::io::duplex(4096);
    let store = Arc::new(PoolStateStore::new());
    let cancel = CancellationToken::new();
    let (egress_tx, egress_rx) = ipc::egress_channel();
    let (command_tx, command_rx) = ipc::command_channel();

    let pool = PoolTask::new(
        Link::new(near, &cfg),
        Arc::clone(&store),
        cfg.board.name.clone(),
        command_rx,
        egress_tx,
        cancel.clone(),
    );
    let task = tokio::spawn(pool.run());

    Harness { wire, commands: command_tx, egress: egress_rx, store, cancel, task }
}

fn drain_egress(rx: &mut mpsc::Receiver<ToMqtt>) -> Vec<ToMqtt> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn snapshot_of(msgs: &[ToMqtt]) -> Option<&serde_json::Value> {
    msgs.iter().find_map(|m| match m {
        ToMqtt::State(v) => Some(v),
        _ => None,
    })
}

#[tokio::test]
async fn test_full_loop_windows_commands_and_suppression() -> Result<()> {
    let mut h = spawn_pool_task();

    // window 1: the broadcast updates the store and opens a window; the
    // startup version request queued first must come out first
    h.wire.write_all(&STATE_BCAST).await?;
    let frame = read_frame(&mut h.wire, VERSION_REQ_FRAME.len()).await?;
    assert_eq!(frame, VERSION_REQ_FRAME);

    sleep(Duration::from_millis(50)).await;
    let msgs = drain_egress(&mut h.egress);
    let snapshot = snapshot_of(&msgs).expect("state change published");
    assert_eq!(snapshot["circuits"]["active"], serde_json::json!(["spa"]));
    assert_eq!(snapshot["temps"]["air"], 77);

    let (state, valid) = h.store.get();
    assert!(valid);
    assert_eq!(state.system.tod.time.hour, 15);

    // window 2: identical broadcast; the time request follows in FIFO
    // order and the unchanged state is not re-published
    h.wire.write_all(&STATE_BCAST).await?;
    let frame = read_frame(&mut h.wire, TIME_REQ_FRAME.len()).await?;
    assert_eq!(frame, TIME_REQ_FRAME);

    sleep(Duration::from_millis(50)).await;
    let msgs = drain_egress(&mut h.egress);
    assert!(snapshot_of(&msgs).is_none(), "duplicate broadcast must not publish");

    // a command from the IP side gets queued...
    h.commands.send(Command {
        topic: "homeassistant/switch/poolbridge/aux1_circuit/set".to_string(),
        value: "ON".to_string(),
    });
    sleep(Duration::from_millis(100)).await;

    // ...window 3 puts it on the wire, and the loopback decode makes the
    // snapshot reflect it without waiting for a controller echo
    h.wire.write_all(&STATE_BCAST).await?;
    let frame = read_frame(&mut h.wire, AUX1_SET_FRAME.len()).await?;
    assert_eq!(frame, AUX1_SET_FRAME);

    sleep(Duration::from_millis(50)).await;
    let msgs = drain_egress(&mut h.egress);
    let snapshot = snapshot_of(&msgs).expect("loopback decode publishes");
    assert_eq!(snapshot["circuits"]["active"], serde_json::json!(["spa", "aux1"]));

    let (state, _) = h.store.get();
    assert!(state.circuits.active[1], "aux1 active after loopback decode");

    h.cancel.cancel();
    let _ = h.task.await;
    Ok(())
}

#[tokio::test]
async fn test_no_transmit_without_window() -> Result<()> {
    let mut h = spawn_pool_task();

    // a pump status response is not a controller broadcast: src 0x60,
    // dst 0x10, typ 0x07, checksum 0x0344
    let pump_status = hex!(
        "00 FF A5 01 10 60 07 0F 0A 00 04 01 F4 0D AC 28 00 00 00 00 05 0F 20 03 44"
    );
    h.wire.write_all(&pump_status).await?;

    sleep(Duration::from_millis(150)).await;
    // the pump data reached the store...
    let (state, _) = h.store.get();
    assert!(state.pump.running);
    assert_eq!(state.pump.rpm, 3500);

    // ...but the startup requests are still queued: no window, no write.
    // reading would hang; instead verify the next window flushes the queue
    h.wire.write_all(&STATE_BCAST).await?;
    let frame = read_frame(&mut h.wire, VERSION_REQ_FRAME.len()).await?;
    assert_eq!(frame, VERSION_REQ_FRAME);

    h.cancel.cancel();
    let _ = h.task.await;
    Ok(())
}
