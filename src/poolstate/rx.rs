// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Per-message-kind mutation rules for the pool-state snapshot.

use tracing::debug;

use crate::{
    network::msg::{
        CIRCUIT_COUNT, ChlorErr, ChlorLevelResp, ChlorNameResp, Circuit, CtrlCircuitSet,
        CtrlHeatResp, CtrlHeatSet, CtrlSchedResp, CtrlStateBcast, CtrlTime,
        CtrlVersionResp, HeatSrc, NetworkMsg, PumpMode, PumpRun, PumpStatusResp,
        SYS_MODE_COUNT,
    },
    poolstate::{ChlorStatus, PoolState, TempKind, ThermoKind, store::PoolStateStore},
};

/// Applies a decoded message to a fresh clone of the snapshot; the store is
/// only written when the clone ends up different. Returns whether it did.
pub fn rx_update(store: &PoolStateStore, msg: &NetworkMsg) -> bool {
    let (old_state, _valid) = store.get();
    let mut state = old_state.clone();
    apply(msg, &mut state);

    let changed = state != old_state;
    if changed {
        debug!(kind = ?msg.kind(), "state changed");
        store.set(&state);
    }
    changed
}

/// The per-kind update rules. Kinds without a rule leave the snapshot
/// untouched (requests, acknowledgements, pings).
pub fn apply(msg: &NetworkMsg, state: &mut PoolState) {
    match msg {
        NetworkMsg::CtrlCircuitSet(m) => ctrl_circuit_set(m, state),
        NetworkMsg::CtrlSchedResp(m) => ctrl_sched_resp(m, state),
        NetworkMsg::CtrlStateBcast(m) | NetworkMsg::CtrlStateSet(m) => ctrl_state(m, state),
        NetworkMsg::CtrlTimeResp(m) | NetworkMsg::CtrlTimeSet(m) => ctrl_time(m, state),
        NetworkMsg::CtrlHeatResp(m) => ctrl_heat_resp(m, state),
        NetworkMsg::CtrlHeatSet(m) => ctrl_heat_set(m, state),
        NetworkMsg::CtrlVersionResp(m) => ctrl_version_resp(m, state),
        NetworkMsg::PumpModeSet(m) | NetworkMsg::PumpModeResp(m) => pump_mode(m, state),
        NetworkMsg::PumpRunSet(m) | NetworkMsg::PumpRunResp(m) => pump_run(m, state),
        NetworkMsg::PumpStatusResp(m) => pump_status(m, state),
        NetworkMsg::ChlorNameResp(m) => chlor_name_resp(m, state),
        NetworkMsg::ChlorLevelSet(m) => state.chlor.pct = m.pct,
        NetworkMsg::ChlorLevelResp(m) => chlor_level_resp(m, state),
        _ => {},
    }
}

fn ctrl_time(msg: &CtrlTime, state: &mut PoolState) {
    state.system.tod.time.minute = msg.minute;
    state.system.tod.time.hour = msg.hour;
    state.system.tod.date.day = msg.day;
    state.system.tod.date.month = msg.month;
    state.system.tod.date.year = msg.year;
}

fn ctrl_heat_resp(msg: &CtrlHeatResp, state: &mut PoolState) {
    let pool = &mut state.thermos[ThermoKind::Pool as usize];
    pool.temp = msg.pool_temp;
    pool.set_point = msg.pool_set_point;
    pool.heat_src = HeatSrc::from_bits(msg.heat_src);
    let spa = &mut state.thermos[ThermoKind::Spa as usize];
    spa.temp = msg.spa_temp;
    spa.set_point = msg.spa_set_point;
    spa.heat_src = HeatSrc::from_bits(msg.heat_src >> 2);
}

fn ctrl_heat_set(msg: &CtrlHeatSet, state: &mut PoolState) {
    let pool = &mut state.thermos[ThermoKind::Pool as usize];
    pool.set_point = msg.pool_set_point;
    pool.heat_src = HeatSrc::from_bits(msg.heat_src);
    let spa = &mut state.thermos[ThermoKind::Spa as usize];
    spa.set_point = msg.spa_set_point;
    spa.heat_src = HeatSrc::from_bits(msg.heat_src >> 2);
}

fn ctrl_circuit_set(msg: &CtrlCircuitSet, state: &mut PoolState) {
    // the wire numbers circuits 1-based
    let Some(idx) = msg.circuit.checked_sub(1).map(usize::from) else {
        return;
    };
    if idx < CIRCUIT_COUNT {
        state.circuits.active[idx] = msg.value != 0;
    }
}

fn ctrl_sched_resp(msg: &CtrlSchedResp, state: &mut PoolState) {
    for (state_sched, msg_sched) in state.scheds.iter_mut().zip(&msg.scheds) {
        state_sched.circuit = msg_sched.circuit.saturating_sub(1);
        state_sched.start = msg_sched.start_minutes();
        state_sched.stop = msg_sched.stop_minutes();
    }
}

fn ctrl_state(msg: &CtrlStateBcast, state: &mut PoolState) {
    let active = msg.active_bitmap();
    for (ii, state_active) in state.circuits.active.iter_mut().enumerate() {
        *state_active = active & (1 << ii) != 0;
    }
    // if both SPA and POOL bits are set, only SPA runs
    if state.circuits.active[Circuit::Spa as usize] {
        state.circuits.active[Circuit::Pool as usize] = false;
    }

    for (ii, state_delay) in state.circuits.delay.iter_mut().enumerate() {
        *state_delay = ii < 8 && msg.delay & (1 << ii) != 0;
    }

    // the shared water sensor reads whichever body is circulating
    if state.circuits.active[Circuit::Spa as usize] {
        state.thermos[ThermoKind::Spa as usize].temp = msg.pool_temp;
    }
    if state.circuits.active[Circuit::Pool as usize] {
        state.thermos[ThermoKind::Pool as usize].temp = msg.pool_temp;
    }

    state.thermos[ThermoKind::Pool as usize].heating = msg.heat_status & 0x04 != 0;
    state.thermos[ThermoKind::Spa as usize].heating = msg.heat_status & 0x08 != 0;

    state.thermos[ThermoKind::Pool as usize].heat_src = HeatSrc::from_bits(msg.heat_src);
    state.thermos[ThermoKind::Spa as usize].heat_src =
        HeatSrc::from_bits(msg.heat_src >> 2);

    for ii in 0..SYS_MODE_COUNT {
        state.modes.set[ii] = msg.mode & (1 << ii) != 0;
    }

    // the date arrives through the time message
    state.system.tod.time.minute = msg.minute;
    state.system.tod.time.hour = msg.hour;

    state.temps[TempKind::Air as usize].temp = msg.air_temp;
    state.temps[TempKind::Solar as usize].temp = msg.solar_temp;
}

fn ctrl_version_resp(msg: &CtrlVersionResp, state: &mut PoolState) {
    state.system.version.major = msg.major;
    state.system.version.minor = msg.minor;
}

fn pump_mode(msg: &PumpMode, state: &mut PoolState) {
    state.pump.mode = msg.mode;
}

/// Any raw value other than 0x0A (running) or 0x04 (stopped) leaves the
/// flag as it was.
fn pump_running(raw: u8) -> Option<bool> {
    match raw {
        0x0A => Some(true),
        0x04 => Some(false),
        _ => None,
    }
}

fn pump_run(msg: &PumpRun, state: &mut PoolState) {
    if let Some(running) = pump_running(msg.running) {
        state.pump.running = running;
    }
}

fn pump_status(msg: &PumpStatusResp, state: &mut PoolState) {
    let Some(running) = pump_running(msg.running) else {
        return;
    };
    state.pump.running = running;
    state.pump.mode = msg.mode;
    state.pump.state = msg.state;
    state.pump.pwr = msg.power_watt();
    state.pump.rpm = msg.rpm();
    state.pump.gpm = u16::from(msg.gpm);
    state.pump.pct = u16::from(msg.pct);
    state.pump.err = msg.err;
    state.pump.timer = msg.timer;
    state.pump.time.hour = msg.hour;
    state.pump.time.minute = msg.minute;
}

fn chlor_name_resp(msg: &ChlorNameResp, state: &mut PoolState) {
    state.chlor.salt = u16::from(msg.salt) * 50;
    state.chlor.name = msg.name_str().to_string();
}

fn chlor_level_resp(msg: &ChlorLevelResp, state: &mut PoolState) {
    state.chlor.salt = u16::from(msg.salt) * 50;

    let err = ChlorErr::from_bits_retain(msg.err);
    state.chlor.status = if err.contains(ChlorErr::LOW_FLOW) {
        ChlorStatus::LowFlow
    } else if err.contains(ChlorErr::LOW_SALT) {
        ChlorStatus::LowSalt
    } else if err.contains(ChlorErr::HIGH_SALT) {
        ChlorStatus::HighSalt
    } else if err.contains(ChlorErr::CLEAN_CELL) {
        ChlorStatus::CleanCell
    } else if err.contains(ChlorErr::COLD) {
        ChlorStatus::Cold
    } else if err.contains(ChlorErr::OK) {
        ChlorStatus::Ok
    } else {
        ChlorStatus::Other
    };
}
