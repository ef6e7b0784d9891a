// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use anyhow::{Context, Result};
use pool_bridge_rs::cfg::{
    config::{BoardConfig, CadenceConfig, Config, LinkConfig, MqttConfig},
    enums::RtsMode,
};
use tokio::io::{AsyncReadExt, DuplexStream};

pub fn test_config() -> Config {
    let mut cfg = Config {
        link: LinkConfig {
            bridge_address: "127.0.0.1:4001".to_string(),
            read_timeout_ms: 20,
            tx_done_timeout_ms: 20,
            rts_mode: RtsMode::Auto,
            tx_queue_depth: 5,
        },
        mqtt: MqttConfig {
            url: "mqtt://localhost:1883".to_string(),
            ctrl_topic: "pool/ctrl".to_string(),
            data_topic: "pool/data".to_string(),
        },
        board: BoardConfig { name: "poolbridge".to_string() },
        cadence: CadenceConfig::default(),
    };
    cfg.validate_and_normalize().expect("test config must validate");
    cfg
}

/// Reads exactly `n` bytes from the far end of the wire, with a deadline so
/// a silent bridge fails the test instead of hanging it.
pub async fn read_frame(wire: &mut DuplexStream, n: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; n];
    tokio::time::timeout(Duration::from_secs(2), wire.read_exact(&mut buf))
        .await
        .context("no frame within deadline")??;
    Ok(buf)
}
