// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Renders the snapshot as the JSON published to the broker-side state
//! topic and served by the HTTP surface.

use serde_json::{Value, json};

use crate::{
    network::msg::{Circuit, pump_mode_name, sys_mode_name},
    poolstate::{Date, PoolState, Sched, TempKind, Thermo, ThermoKind, Time, Version},
    utils::minutes_str,
};

pub fn time_str(time: &Time) -> String {
    format!("{:02}:{:02}", time.hour, time.minute)
}

pub fn date_str(date: &Date) -> String {
    format!("20{:02}-{:02}-{:02}", date.year, date.month, date.day)
}

pub fn version_str(version: &Version) -> String {
    format!("v{}.{:02}", version.major, version.minor)
}

fn thermo_json(thermo: &Thermo) -> Value {
    json!({
        "temp": thermo.temp,
        "sp": thermo.set_point,
        "src": thermo.heat_src.name(),
        "heating": thermo.heating,
    })
}

fn sched_json(sched: &Sched) -> Value {
    let circuit = Circuit::from_index(sched.circuit).map_or("unknown", Circuit::name);
    json!({
        "circuit": circuit,
        "start": minutes_str(sched.start),
        "stop": minutes_str(sched.stop),
    })
}

/// Names of the circuits whose bit is set.
fn active_names(flags: &[bool]) -> Vec<&'static str> {
    flags
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .filter_map(|(ii, _)| Circuit::from_index(ii as u8).map(Circuit::name))
        .collect()
}

/// The full snapshot as one JSON tree.
pub fn to_json(state: &PoolState) -> Value {
    let modes: Vec<&str> = state
        .modes
        .set
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .map(|(ii, _)| sys_mode_name(ii))
        .collect();

    json!({
        "system": {
            "tod": {
                "time": time_str(&state.system.tod.time),
                "date": date_str(&state.system.tod.date),
            },
            "firmware": version_str(&state.system.version),
        },
        "temps": {
            "air": state.temps[TempKind::Air as usize].temp,
            "solar": state.temps[TempKind::Solar as usize].temp,
        },
        "thermos": {
            "pool": thermo_json(&state.thermos[ThermoKind::Pool as usize]),
            "spa": thermo_json(&state.thermos[ThermoKind::Spa as usize]),
        },
        "scheds": [
            sched_json(&state.scheds[0]),
            sched_json(&state.scheds[1]),
        ],
        "modes": modes,
        "circuits": {
            "active": active_names(&state.circuits.active),
            "delay": active_names(&state.circuits.delay),
        },
        "pump": {
            "time": time_str(&state.pump.time),
            "mode": pump_mode_name(state.pump.mode),
            "running": state.pump.running,
            "state": state.pump.state,
            "pwr": state.pump.pwr,
            "rpm": state.pump.rpm,
            "gpm": state.pump.gpm,
            "pct": state.pump.pct,
            "err": state.pump.err,
            "timer": state.pump.timer,
        },
        "chlor": {
            "name": state.chlor.name.as_str(),
            "pct": state.chlor.pct,
            "salt": state.chlor.salt,
            "status": state.chlor.status.name(),
        },
    })
}
