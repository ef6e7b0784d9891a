// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use anyhow::{Context, Result};
use pool_bridge_rs::{
    cfg::{cli::resolve_config_path, config::Config, logger::init_logger},
    ipc::{self, ToMqtt},
    link::{Link, connect_bridge},
    poolstate::store::PoolStateStore,
    tasks::{announce::announce_task, pool::PoolTask, requester::requester_task},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let _logger = init_logger("config_logger.yaml")?;

    let cfg = resolve_config_path("config.yaml")
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    let io = connect_bridge(&cfg)
        .await
        .with_context(|| format!("cannot reach bridge at {}", cfg.link.bridge_address))?;
    info!(bridge = %cfg.link.bridge_address, "transceiver attached");

    let store = Arc::new(PoolStateStore::new());
    let cancel = CancellationToken::new();

    let (egress_tx, mut egress_rx) = ipc::egress_channel();
    let (_command_tx, command_rx) = ipc::command_channel();

    let link = Link::new(io, &cfg);
    let pool = PoolTask::new(
        link,
        Arc::clone(&store),
        cfg.board.name.clone(),
        command_rx,
        egress_tx.clone(),
        cancel.clone(),
    );

    tokio::spawn(requester_task(
        pool.tx_queue(),
        cfg.cadence.request_period,
        cancel.clone(),
    ));
    tokio::spawn(announce_task(
        cfg.board.name.clone(),
        egress_tx,
        cfg.cadence.announce_period,
        cancel.clone(),
    ));

    // The MQTT/HTTP transports are external; until one is attached, drain
    // the egress queue into the log so the bridge stays observable.
    let data_topic = cfg.mqtt.data_topic.clone();
    tokio::spawn(async move {
        while let Some(msg) = egress_rx.recv().await {
            match msg {
                ToMqtt::Publish { topic, payload } => debug!(%topic, %payload, "egress"),
                ToMqtt::Subscribe { topic } => debug!(%topic, "egress subscribe"),
                ToMqtt::State(json) => debug!(topic = %data_topic, %json, "egress state"),
            }
        }
    });

    let pool_handle = tokio::spawn(pool.run());

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("shutting down");
    cancel.cancel();
    pool_handle.await.context("pool task panicked")?;

    Ok(())
}
