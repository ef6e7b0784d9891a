// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use pool_bridge_rs::{
    hass,
    ipc::{self, ToMqtt},
    network::msg::{HeatSrc, NetworkMsg},
    poolstate::{PoolState, ThermoKind, store::PoolStateStore},
};
use serde_json::Value;

fn drain(rx: &mut tokio::sync::mpsc::Receiver<ToMqtt>) -> Vec<ToMqtt> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

#[test]
fn test_announce_publishes_configs_and_subscribes_once() {
    let (tx, mut rx) = ipc::egress_channel();
    hass::announce("poolbridge", true, &tx);
    let msgs = drain(&mut rx);

    let subs: Vec<&str> = msgs
        .iter()
        .filter_map(|m| match m {
            ToMqtt::Subscribe { topic } => Some(topic.as_str()),
            _ => None,
        })
        .collect();
    assert!(subs.contains(&"homeassistant/switch/poolbridge/pool_circuit/set"));
    assert!(subs.contains(&"homeassistant/climate/poolbridge/pool_heater/set_mode"));
    assert!(subs.contains(&"homeassistant/climate/poolbridge/spa_heater/set_temp"));

    let configs: Vec<(&str, Value)> = msgs
        .iter()
        .filter_map(|m| match m {
            ToMqtt::Publish { topic, payload } if topic.ends_with("/config") => {
                Some((topic.as_str(), serde_json::from_str(payload).expect("valid json")))
            },
            _ => None,
        })
        .collect();
    assert!(!configs.is_empty());

    let (_, switch_cfg) = configs
        .iter()
        .find(|(t, _)| *t == "homeassistant/switch/poolbridge/pool_circuit/config")
        .expect("switch discovery config");
    assert_eq!(switch_cfg["cmd_t"], "~/set");
    assert_eq!(switch_cfg["stat_t"], "~/state");

    let (_, climate_cfg) = configs
        .iter()
        .find(|(t, _)| *t == "homeassistant/climate/poolbridge/pool_heater/config")
        .expect("climate discovery config");
    assert_eq!(climate_cfg["modes"], serde_json::json!(["off", "heat"]));

    // a re-announce must not subscribe again
    hass::announce("poolbridge", false, &tx);
    let msgs = drain(&mut rx);
    assert!(!msgs.iter().any(|m| matches!(m, ToMqtt::Subscribe { .. })));
}

#[test]
fn test_tx_state_publishes_entities_and_snapshot() {
    let mut state = PoolState::default();
    state.circuits.active[5] = true; // pool on
    state.thermos[ThermoKind::Pool as usize].set_point = 70;
    state.thermos[ThermoKind::Pool as usize].temp = 55;
    state.thermos[ThermoKind::Pool as usize].heat_src = HeatSrc::Heater;
    state.temps[0].temp = 75;

    let (tx, mut rx) = ipc::egress_channel();
    hass::tx_state(&state, "poolbridge", &tx);
    let msgs = drain(&mut rx);

    let find = |topic: &str| -> Option<&str> {
        msgs.iter().find_map(|m| match m {
            ToMqtt::Publish { topic: t, payload } if t == topic => Some(payload.as_str()),
            _ => None,
        })
    };

    assert_eq!(find("homeassistant/switch/poolbridge/pool_circuit/state"), Some("ON"));
    assert_eq!(find("homeassistant/switch/poolbridge/spa_circuit/state"), Some("OFF"));
    assert_eq!(find("homeassistant/sensor/poolbridge/air_temp/state"), Some("75"));

    let climate: Value = serde_json::from_str(
        find("homeassistant/climate/poolbridge/pool_heater/state").expect("climate state"),
    )
    .expect("valid json");
    assert_eq!(climate["mode"], "heat");
    assert_eq!(climate["target_temp"], 70);
    assert_eq!(climate["current_temp"], 55);

    // the full snapshot rides along
    let snapshot = msgs.iter().find_map(|m| match m {
        ToMqtt::State(v) => Some(v),
        _ => None,
    });
    let snapshot = snapshot.expect("snapshot json");
    assert_eq!(snapshot["circuits"]["active"], serde_json::json!(["pool"]));
    assert_eq!(snapshot["temps"]["air"], 75);
}

#[test]
fn test_rx_set_switch_on() {
    let store = PoolStateStore::new();
    let msg = hass::rx_set(
        "homeassistant/switch/poolbridge/pool_circuit/set",
        "ON",
        &store,
    );
    match msg {
        Some(NetworkMsg::CtrlCircuitSet(set)) => {
            assert_eq!(set.circuit, 6); // pool, 1-based on the wire
            assert_eq!(set.value, 1);
        },
        other => panic!("expected a circuit set, got {other:?}"),
    }

    let msg = hass::rx_set(
        "homeassistant/switch/poolbridge/spa_circuit/set",
        "OFF",
        &store,
    );
    match msg {
        Some(NetworkMsg::CtrlCircuitSet(set)) => {
            assert_eq!(set.circuit, 1);
            assert_eq!(set.value, 0);
        },
        other => panic!("expected a circuit set, got {other:?}"),
    }
}

#[test]
fn test_rx_set_climate_merges_current_state() {
    let store = PoolStateStore::new();
    let mut state = PoolState::default();
    state.thermos[ThermoKind::Pool as usize].set_point = 70;
    state.thermos[ThermoKind::Pool as usize].heat_src = HeatSrc::Heater;
    state.thermos[ThermoKind::Spa as usize].set_point = 102;
    state.thermos[ThermoKind::Spa as usize].heat_src = HeatSrc::Solar;
    store.set(&state);

    // temp-only update keeps both heat sources and the spa set point
    let msg = hass::rx_set(
        "homeassistant/climate/poolbridge/pool_heater/set_temp",
        "75",
        &store,
    );
    match msg {
        Some(NetworkMsg::CtrlHeatSet(set)) => {
            assert_eq!(set.pool_set_point, 75);
            assert_eq!(set.spa_set_point, 102);
            assert_eq!(set.heat_src, 0x01 | 0x03 << 2);
        },
        other => panic!("expected a heat set, got {other:?}"),
    }

    // mode-only update keeps both set points
    let msg = hass::rx_set(
        "homeassistant/climate/poolbridge/spa_heater/set_mode",
        "off",
        &store,
    );
    match msg {
        Some(NetworkMsg::CtrlHeatSet(set)) => {
            assert_eq!(set.pool_set_point, 70);
            assert_eq!(set.spa_set_point, 102);
            assert_eq!(set.heat_src, 0x01); // spa source cleared, pool kept
        },
        other => panic!("expected a heat set, got {other:?}"),
    }
}

#[test]
fn test_rx_set_rejects_unknown_topics() {
    let store = PoolStateStore::new();
    assert!(hass::rx_set("homeassistant/switch/poolbridge/nope/set", "ON", &store).is_none());
    assert!(hass::rx_set("not/a/topic", "ON", &store).is_none());
    // sensors are read-only
    assert!(
        hass::rx_set("homeassistant/sensor/poolbridge/air_temp/set", "1", &store).is_none()
    );
    // unknown climate subtopic
    assert!(
        hass::rx_set("homeassistant/climate/poolbridge/pool_heater/set_x", "1", &store)
            .is_none()
    );
}

#[test]
fn test_who_json_reports_identity() {
    let mut state = PoolState::default();
    state.system.version.major = 2;
    state.system.version.minor = 80;
    let who = hass::who_json("poolbridge", &state);
    assert_eq!(who["name"], "poolbridge");
    assert_eq!(who["firmware"], "v2.80");
}
