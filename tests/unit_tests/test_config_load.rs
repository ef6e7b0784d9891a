// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use pool_bridge_rs::cfg::config::Config;

fn parse(yaml: &str) -> anyhow::Result<Config> {
    let mut cfg: Config = serde_yaml::from_str(yaml)?;
    cfg.validate_and_normalize()?;
    Ok(cfg)
}

const MINIMAL: &str = r#"
link:
  BridgeAddress: "192.168.1.50:4001"
mqtt:
  Url: "mqtt://broker.local:1883"
board:
  Name: "poolbridge"
"#;

#[test]
fn test_minimal_config_gets_defaults() -> anyhow::Result<()> {
    let cfg = parse(MINIMAL)?;
    assert_eq!(cfg.link.read_timeout_ms, 100);
    assert_eq!(cfg.link.tx_queue_depth, 5);
    assert_eq!(cfg.mqtt.ctrl_topic, "pool/ctrl");
    assert_eq!(cfg.mqtt.data_topic, "pool/data");
    assert_eq!(cfg.cadence.request_period.as_secs(), 30);
    assert_eq!(cfg.cadence.announce_period.as_secs(), 300);
    Ok(())
}

#[test]
fn test_validation_rejects_bad_values() {
    let empty_addr = MINIMAL.replace("\"192.168.1.50:4001\"", "\"\"");
    assert!(parse(&empty_addr).is_err());

    let slash_name = MINIMAL.replace("\"poolbridge\"", "\"pool/bridge\"");
    assert!(parse(&slash_name).is_err());

    let bad = r#"
link:
  BridgeAddress: "192.168.1.50:4001"
  ReadTimeoutMs: 0
mqtt:
  Url: "mqtt://broker.local:1883"
board:
  Name: "poolbridge"
"#;
    assert!(parse(bad).is_err());
}

#[test]
fn test_repo_config_parses() -> anyhow::Result<()> {
    // the example config shipped at the repo root must stay loadable
    let cfg = Config::load_from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config.yaml"))?;
    assert_eq!(cfg.board.name, "poolbridge");
    Ok(())
}
