// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::cfg::enums::RtsMode;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Everything concerning the RS-485 attachment.
    pub link: LinkConfig,
    /// Broker-side identity and topics.
    pub mqtt: MqttConfig,
    /// Device identity reported on the `who` control topic.
    pub board: BoardConfig,
    /// Cadences of the background request/announce tasks.
    #[serde(default)]
    pub cadence: CadenceConfig,
}

/// RS-485 attachment settings.
///
/// The UART itself lives behind the `link::Transceiver` seam; what is
/// configured here is how to reach it and the half-duplex timing budget.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LinkConfig {
    #[serde(rename = "BridgeAddress")]
    /// `host:port` of the serial bridge the transceiver is attached to.
    pub bridge_address: String,

    #[serde(rename = "ReadTimeoutMs", default = "default_read_timeout_ms")]
    /// Per-read budget of the RX state machine, in milliseconds.
    pub read_timeout_ms: u64,

    #[serde(rename = "TxDoneTimeoutMs", default = "default_read_timeout_ms")]
    /// Budget for waiting until the TX FIFO drained, in milliseconds.
    pub tx_done_timeout_ms: u64,

    #[serde(rename = "RtsMode", default)]
    /// Who toggles the transmit-enable line.
    pub rts_mode: RtsMode,

    #[serde(rename = "TxQueueDepth", default = "default_tx_queue_depth")]
    /// Slots in the outbound frame queue; overflow drops the newest frame.
    pub tx_queue_depth: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MqttConfig {
    #[serde(rename = "Url")]
    pub url: String,

    #[serde(rename = "CtrlTopic", default = "default_ctrl_topic")]
    /// Topic accepting the literal `restart` / `who` control strings.
    pub ctrl_topic: String,

    #[serde(rename = "DataTopic", default = "default_data_topic")]
    /// Topic the full snapshot JSON is published to after every change.
    pub data_topic: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BoardConfig {
    #[serde(rename = "Name")]
    /// Device name used in discovery topics and the `who` reply.
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CadenceConfig {
    #[serde(rename = "RequestSecs", with = "serde_secs", default = "default_request_period")]
    /// Interval between periodic HEAT/SCHED request bursts.
    pub request_period: Duration,

    #[serde(rename = "AnnounceSecs", with = "serde_secs", default = "default_announce_period")]
    /// Interval between discovery config re-publications.
    pub announce_period: Duration,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            request_period: default_request_period(),
            announce_period: default_announce_period(),
        }
    }
}

fn default_read_timeout_ms() -> u64 {
    100
}

fn default_tx_queue_depth() -> usize {
    5
}

fn default_ctrl_topic() -> String {
    "pool/ctrl".to_string()
}

fn default_data_topic() -> String {
    "pool/data".to_string()
}

fn default_request_period() -> Duration {
    Duration::from_secs(30)
}

fn default_announce_period() -> Duration {
    Duration::from_secs(5 * 60)
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config =
            serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            !self.link.bridge_address.is_empty(),
            "BridgeAddress must not be empty"
        );
        ensure!(self.link.read_timeout_ms > 0, "ReadTimeoutMs must be > 0");
        ensure!(self.link.tx_queue_depth >= 1, "TxQueueDepth must be >= 1");
        ensure!(!self.board.name.is_empty(), "board Name must not be empty");

        // The device name becomes a topic path segment.
        ensure!(
            !self.board.name.contains(['/', '#', '+']),
            "board Name must not contain MQTT topic separators"
        );

        ensure!(
            self.cadence.request_period >= Duration::from_secs(1),
            "RequestSecs must be >= 1"
        );

        Ok(())
    }

    #[inline]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.link.read_timeout_ms)
    }

    #[inline]
    pub fn tx_done_timeout(&self) -> Duration {
        Duration::from_millis(self.link.tx_done_timeout_ms)
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
