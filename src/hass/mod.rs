// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Declarative bridge between the pool state and the Home-Assistant style
//! topic surface.
//!
//! One table drives everything: discovery announcements, the set-topic
//! subscriptions, per-entity state publications, and the decoding of
//! inbound set commands into bus messages.

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{
    ipc::EgressTx,
    network::msg::{Circuit, CtrlCircuitSet, CtrlHeatSet, HeatSrc, NetworkMsg},
    poolstate::{PoolState, TempKind, ThermoKind, json::{time_str, version_str}, store::PoolStateStore},
    utils::minutes_str,
};

/// Home-Assistant device classes the bridge exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevTyp {
    Switch,
    Sensor,
    Climate,
}

impl DevTyp {
    pub fn name(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Sensor => "sensor",
            Self::Climate => "climate",
        }
    }
}

/// What a table row is bound to on the pool side.
#[derive(Clone, Copy)]
enum Binding {
    /// A relay the switch toggles.
    Circuit(Circuit),
    /// A thermostat the climate entity controls.
    Thermostat(ThermoKind),
    /// A read-only scalar.
    Value(fn(&PoolState) -> String),
}

pub struct Dispatch {
    dev_typ: DevTyp,
    id: &'static str,
    name: &'static str,
    unit: Option<&'static str>,
    binding: Binding,
}

fn sched_minutes(state: &PoolState, circuit: Circuit, stop: bool) -> String {
    state
        .scheds
        .iter()
        .find(|s| s.circuit == circuit as u8)
        .map(|s| minutes_str(if stop { s.stop } else { s.start }))
        .unwrap_or_else(|| "-".to_string())
}

/// The dispatch table: every entity the bridge announces and serves.
pub const DISPATCHES: &[Dispatch] = &[
    Dispatch { dev_typ: DevTyp::Switch, id: "pool_circuit", name: "pool circuit", unit: None,
               binding: Binding::Circuit(Circuit::Pool) },
    Dispatch { dev_typ: DevTyp::Switch, id: "spa_circuit", name: "spa circuit", unit: None,
               binding: Binding::Circuit(Circuit::Spa) },
    Dispatch { dev_typ: DevTyp::Switch, id: "aux1_circuit", name: "aux1 circuit", unit: None,
               binding: Binding::Circuit(Circuit::Aux1) },
    Dispatch { dev_typ: DevTyp::Climate, id: "pool_heater", name: "pool heater", unit: None,
               binding: Binding::Thermostat(ThermoKind::Pool) },
    Dispatch { dev_typ: DevTyp::Climate, id: "spa_heater", name: "spa heater", unit: None,
               binding: Binding::Thermostat(ThermoKind::Spa) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "pool_start", name: "pool start", unit: None,
               binding: Binding::Value(|s| sched_minutes(s, Circuit::Pool, false)) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "pool_stop", name: "pool stop", unit: None,
               binding: Binding::Value(|s| sched_minutes(s, Circuit::Pool, true)) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "spa_start", name: "spa start", unit: None,
               binding: Binding::Value(|s| sched_minutes(s, Circuit::Spa, false)) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "spa_stop", name: "spa stop", unit: None,
               binding: Binding::Value(|s| sched_minutes(s, Circuit::Spa, true)) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "air_temp", name: "air temp", unit: Some("°F"),
               binding: Binding::Value(|s| s.temps[TempKind::Air as usize].temp.to_string()) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "water_temp", name: "water temp", unit: Some("°F"),
               binding: Binding::Value(|s| s.thermos[ThermoKind::Pool as usize].temp.to_string()) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "system_time", name: "time", unit: None,
               binding: Binding::Value(|s| time_str(&s.system.tod.time)) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "pump_pwr", name: "pump pwr", unit: Some("W"),
               binding: Binding::Value(|s| s.pump.pwr.to_string()) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "pump_speed", name: "pump speed", unit: Some("rpm"),
               binding: Binding::Value(|s| s.pump.rpm.to_string()) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "pump_status", name: "pump status", unit: None,
               binding: Binding::Value(|s| s.pump.state.to_string()) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "chlor_pct", name: "chlor pct", unit: Some("%"),
               binding: Binding::Value(|s| s.chlor.pct.to_string()) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "chlor_salt", name: "chlor salt", unit: Some("ppm"),
               binding: Binding::Value(|s| s.chlor.salt.to_string()) },
    Dispatch { dev_typ: DevTyp::Sensor, id: "chlor_status", name: "chlor status", unit: None,
               binding: Binding::Value(|s| s.chlor.status.name().to_string()) },
];

fn base_topic(row: &Dispatch, board: &str) -> String {
    format!("homeassistant/{}/{}/{}", row.dev_typ.name(), board, row.id)
}

/// Discovery config and the set topics a row wants subscribed.
fn announce_row(row: &Dispatch, board: &str) -> (Vec<String>, String, Value) {
    let base = base_topic(row, board);
    let cfg_topic = format!("{base}/config");
    match row.dev_typ {
        DevTyp::Switch => (
            vec![format!("{base}/set")],
            cfg_topic,
            json!({
                "~": base,
                "name": format!("Pool {}", row.name),
                "cmd_t": "~/set",
                "stat_t": "~/state",
            }),
        ),
        DevTyp::Sensor => (
            vec![],
            cfg_topic,
            json!({
                "~": base,
                "name": format!("Pool {}", row.name),
                "stat_t": "~/state",
                "unit_of_meas": row.unit.unwrap_or(""),
            }),
        ),
        DevTyp::Climate => (
            vec![format!("{base}/set_mode"), format!("{base}/set_temp")],
            cfg_topic,
            json!({
                "~": base,
                "name": format!("Pool {}", row.name),
                "mode_cmd_t": "~/set_mode",
                "temp_cmd_t": "~/set_temp",
                "mode_stat_t": "~/state",
                "mode_stat_tpl": "{{ value_json.mode }}",
                "temp_stat_t": "~/state",
                "temp_stat_tpl": "{{ value_json.target_temp }}",
                "curr_temp_t": "~/state",
                "curr_temp_tpl": "{{ value_json.current_temp }}",
                "min_temp": 15,
                "max_temp": 110,
                "temp_step": 1,
                "avty_t": "~/available",
                "pl_avail": "online",
                "pl_not_avail": "offline",
                "modes": ["off", "heat"],
            }),
        ),
    }
}

/// Publishes every row's discovery config; subscribes the set topics when
/// asked to (once, at boot).
pub fn announce(board: &str, subscribe: bool, egress: &EgressTx) {
    for row in DISPATCHES {
        let (set_topics, cfg_topic, cfg) = announce_row(row, board);
        if subscribe {
            for topic in set_topics {
                egress.subscribe(topic);
            }
        }
        egress.publish(cfg_topic, cfg.to_string());
    }
}

/// Publishes the per-entity states followed by the full snapshot JSON.
pub fn tx_state(state: &PoolState, board: &str, egress: &EgressTx) {
    for row in DISPATCHES {
        let base = base_topic(row, board);
        match row.binding {
            Binding::Circuit(circuit) => {
                let on = state.circuits.active[circuit as usize];
                let payload = if on { "ON" } else { "OFF" };
                egress.publish(format!("{base}/state"), payload.to_string());
            },
            Binding::Value(value) => {
                egress.publish(format!("{base}/state"), value(state));
            },
            Binding::Thermostat(kind) => {
                let thermo = &state.thermos[kind as usize];
                let mode = match thermo.heat_src {
                    HeatSrc::None => "off",
                    _ => "heat",
                };
                let payload = json!({
                    "mode": mode,
                    "target_temp": thermo.set_point,
                    "current_temp": thermo.temp,
                });
                egress.publish(format!("{base}/state"), payload.to_string());
                egress.publish(format!("{base}/available"), "online".to_string());
            },
        }
    }
    egress.send(crate::ipc::ToMqtt::State(crate::poolstate::json::to_json(state)));
}

/// Decodes an inbound set command into the bus message it asks for.
///
/// Climate commands carry only one half of the heat setting; the other half
/// is merged in from the current snapshot so a mode-only or temp-only update
/// preserves its sibling.
pub fn rx_set(topic: &str, value: &str, store: &PoolStateStore) -> Option<NetworkMsg> {
    let args: Vec<&str> = topic.split('/').collect();
    if args.len() < 5 {
        warn!(%topic, "unparseable command topic");
        return None;
    }
    let (dev_typ, id, subtopic) = (args[1], args[3], args[4]);

    let row = DISPATCHES
        .iter()
        .find(|row| row.dev_typ.name() == dev_typ && row.id == id)?;

    match row.binding {
        Binding::Circuit(circuit) => {
            let value = u8::from(value == "ON");
            debug!(circuit = circuit.name(), value, "circuit set");
            Some(NetworkMsg::CtrlCircuitSet(CtrlCircuitSet {
                circuit: circuit as u8 + 1,
                value,
            }))
        },
        Binding::Thermostat(kind) => thermostat_set(kind, subtopic, value, store),
        Binding::Value(_) => None,
    }
}

fn thermostat_set(
    kind: ThermoKind,
    subtopic: &str,
    value: &str,
    store: &PoolStateStore,
) -> Option<NetworkMsg> {
    let (state, _valid) = store.get();

    let mut pool_set_point = state.thermos[ThermoKind::Pool as usize].set_point;
    let mut pool_heat_src = state.thermos[ThermoKind::Pool as usize].heat_src;
    let mut spa_set_point = state.thermos[ThermoKind::Spa as usize].set_point;
    let mut spa_heat_src = state.thermos[ThermoKind::Spa as usize].heat_src;

    match subtopic {
        "set_mode" => {
            let src = HeatSrc::from_name(value)?;
            match kind {
                ThermoKind::Pool => pool_heat_src = src,
                ThermoKind::Spa => spa_heat_src = src,
            }
        },
        "set_temp" => {
            let sp = value.trim().parse::<f32>().ok()? as u8;
            match kind {
                ThermoKind::Pool => pool_set_point = sp,
                ThermoKind::Spa => spa_set_point = sp,
            }
        },
        other => {
            warn!(subtopic = other, "unknown climate subtopic");
            return None;
        },
    }

    Some(NetworkMsg::CtrlHeatSet(CtrlHeatSet::new(
        pool_set_point,
        spa_set_point,
        pool_heat_src,
        spa_heat_src,
    )))
}

/// Device identity for the `who` control request and the HTTP surface.
pub fn who_json(board: &str, state: &PoolState) -> Value {
    json!({
        "name": board,
        "firmware": version_str(&state.system.version),
    })
}
