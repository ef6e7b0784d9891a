// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use pool_bridge_rs::{
    network::msg::{
        ChlorLevelResp, ChlorNameResp, CtrlCircuitSet, CtrlHeatResp, CtrlHeatSet,
        CtrlSchedResp, CtrlSchedSub, CtrlStateBcast, CtrlTime, CtrlVersionResp, HeatSrc,
        NetworkMsg, PumpStatusResp,
    },
    poolstate::{ChlorStatus, PoolState, TempKind, ThermoKind, rx::rx_update, store::PoolStateStore},
};

fn state_bcast() -> CtrlStateBcast {
    CtrlStateBcast {
        hour: 15,
        minute: 32,
        active_lo: 0x21, // SPA (bit 0) and POOL (bit 5)
        active_hi: 0x00,
        mode: 0x01, // service
        heat_status: 0x04,
        delay: 0x02,
        pool_temp: 55,
        spa_temp: 40,
        major: 2,
        minor: 80,
        air_temp: 75,
        solar_temp: 80,
        heat_src: 0x05, // pool heater, spa heater
        ..Default::default()
    }
}

#[test]
fn test_store_starts_invalid() {
    let store = PoolStateStore::new();
    let (state, valid) = store.get();
    assert!(!valid);
    assert_eq!(state, PoolState::default());

    store.set(&state);
    let (_, valid) = store.get();
    assert!(valid);
}

#[test]
fn test_spa_supersedes_pool() {
    let store = PoolStateStore::new();
    let changed = rx_update(&store, &NetworkMsg::CtrlStateBcast(state_bcast()));
    assert!(changed);

    let (state, _) = store.get();
    assert!(state.circuits.active[0], "spa stays active");
    assert!(!state.circuits.active[5], "pool is cleared when spa runs");
    assert!(state.circuits.active[..].iter().filter(|b| **b).count() == 1);
}

#[test]
fn test_shared_sensor_follows_circulating_body() {
    let store = PoolStateStore::new();
    rx_update(&store, &NetworkMsg::CtrlStateBcast(state_bcast()));

    let (state, _) = store.get();
    // spa circulates, so the water reading belongs to the spa thermostat
    assert_eq!(state.thermos[ThermoKind::Spa as usize].temp, 55);
    assert_eq!(state.thermos[ThermoKind::Pool as usize].temp, 0);

    // pool-only broadcast moves the reading to the pool thermostat
    let msg = CtrlStateBcast { active_lo: 0x20, pool_temp: 61, ..state_bcast() };
    rx_update(&store, &NetworkMsg::CtrlStateBcast(msg));
    let (state, _) = store.get();
    assert_eq!(state.thermos[ThermoKind::Pool as usize].temp, 61);
    assert_eq!(state.thermos[ThermoKind::Spa as usize].temp, 55);
}

#[test]
fn test_state_bcast_fields() {
    let store = PoolStateStore::new();
    rx_update(&store, &NetworkMsg::CtrlStateBcast(state_bcast()));
    let (state, _) = store.get();

    assert_eq!(state.system.tod.time.hour, 15);
    assert_eq!(state.system.tod.time.minute, 32);
    assert_eq!(state.temps[TempKind::Air as usize].temp, 75);
    assert_eq!(state.temps[TempKind::Solar as usize].temp, 80);
    assert!(state.modes.set[0], "service mode bit");
    assert!(state.circuits.delay[1], "aux1 delayed");
    assert!(state.thermos[ThermoKind::Pool as usize].heating);
    assert!(!state.thermos[ThermoKind::Spa as usize].heating);
    assert_eq!(state.thermos[ThermoKind::Pool as usize].heat_src, HeatSrc::Heater);
    assert_eq!(state.thermos[ThermoKind::Spa as usize].heat_src, HeatSrc::Heater);
    // the broadcast carries no date and no firmware version
    assert_eq!(state.system.tod.date.day, 0);
    assert_eq!(state.system.version.major, 0);
}

#[test]
fn test_identical_update_is_suppressed() {
    let store = PoolStateStore::new();
    let msg = NetworkMsg::CtrlStateBcast(state_bcast());
    assert!(rx_update(&store, &msg), "first update changes the store");
    assert!(!rx_update(&store, &msg), "identical update must not re-publish");
}

#[test]
fn test_time_updates_clock_and_date() {
    let store = PoolStateStore::new();
    let msg = NetworkMsg::CtrlTimeResp(CtrlTime {
        hour: 14,
        minute: 49,
        day: 23,
        month: 5,
        year: 15,
        ..Default::default()
    });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert_eq!(state.system.tod.time.hour, 14);
    assert_eq!(state.system.tod.date.day, 23);
    assert_eq!(state.system.tod.date.month, 5);
    assert_eq!(state.system.tod.date.year, 15);
}

#[test]
fn test_heat_resp_splits_heat_src() {
    let store = PoolStateStore::new();
    let msg = NetworkMsg::CtrlHeatResp(CtrlHeatResp {
        pool_temp: 55,
        spa_temp: 98,
        air_temp: 75,
        pool_set_point: 70,
        spa_set_point: 102,
        heat_src: 0x0D, // pool = heater (01), spa = solar (11)
        ..Default::default()
    });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    let pool = state.thermos[ThermoKind::Pool as usize];
    let spa = state.thermos[ThermoKind::Spa as usize];
    assert_eq!((pool.temp, pool.set_point, pool.heat_src), (55, 70, HeatSrc::Heater));
    assert_eq!((spa.temp, spa.set_point, spa.heat_src), (98, 102, HeatSrc::Solar));
}

#[test]
fn test_heat_set_leaves_temps_alone() {
    let store = PoolStateStore::new();
    rx_update(&store, &NetworkMsg::CtrlStateBcast(state_bcast()));
    let (before, _) = store.get();

    let msg = NetworkMsg::CtrlHeatSet(CtrlHeatSet::new(72, 100, HeatSrc::Solar, HeatSrc::None));
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert_eq!(state.thermos[ThermoKind::Pool as usize].set_point, 72);
    assert_eq!(state.thermos[ThermoKind::Pool as usize].heat_src, HeatSrc::Solar);
    assert_eq!(
        state.thermos[ThermoKind::Spa as usize].temp,
        before.thermos[ThermoKind::Spa as usize].temp
    );
}

#[test]
fn test_circuit_set_flips_single_bit() {
    let store = PoolStateStore::new();
    let msg = NetworkMsg::CtrlCircuitSet(CtrlCircuitSet { circuit: 6, value: 1 });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert!(state.circuits.active[5], "wire circuit 6 is pool (index 5)");

    let msg = NetworkMsg::CtrlCircuitSet(CtrlCircuitSet { circuit: 6, value: 0 });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert!(!state.circuits.active[5]);

    // out-of-range circuit numbers are ignored
    let msg = NetworkMsg::CtrlCircuitSet(CtrlCircuitSet { circuit: 0, value: 1 });
    assert!(!rx_update(&store, &msg));
    let msg = NetworkMsg::CtrlCircuitSet(CtrlCircuitSet { circuit: 10, value: 1 });
    assert!(!rx_update(&store, &msg));
}

#[test]
fn test_sched_resp_stores_minutes() {
    let store = PoolStateStore::new();
    let msg = NetworkMsg::CtrlSchedResp(CtrlSchedResp {
        scheds: [
            CtrlSchedSub {
                circuit: 6, // pool
                start_hi: 0x01,
                start_lo: 0xE0, // 480 = 08:00
                stop_hi: 0x04,
                stop_lo: 0x1A, // 1050 = 17:30
                ..Default::default()
            },
            CtrlSchedSub {
                circuit: 1, // spa
                start_hi: 0x02,
                start_lo: 0x58, // 600 = 10:00
                stop_hi: 0x02,
                stop_lo: 0xBC, // 700 = 11:40
                ..Default::default()
            },
        ],
        ..Default::default()
    });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert_eq!(state.scheds[0].circuit, 5);
    assert_eq!(state.scheds[0].start, 480);
    assert_eq!(state.scheds[0].stop, 1050);
    assert_eq!(state.scheds[1].circuit, 0);
    assert_eq!(state.scheds[1].start, 600);
    assert_eq!(state.scheds[1].stop, 700);
}

#[test]
fn test_version_resp() {
    let store = PoolStateStore::new();
    let msg = NetworkMsg::CtrlVersionResp(CtrlVersionResp {
        major: 2,
        minor: 80,
        ..Default::default()
    });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert_eq!(state.system.version.major, 2);
    assert_eq!(state.system.version.minor, 80);
}

#[test]
fn test_pump_status_updates_and_gates_on_running_byte() {
    let store = PoolStateStore::new();
    let msg = NetworkMsg::PumpStatusResp(PumpStatusResp {
        running: 0x0A,
        mode: 0,
        state: 4,
        pwr_hi: 0x01,
        pwr_lo: 0xF4, // 500 W
        rpm_hi: 0x0D,
        rpm_lo: 0xAC, // 3500 rpm
        gpm: 40,
        pct: 0,
        timer: 5,
        hour: 15,
        minute: 32,
        ..Default::default()
    });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert!(state.pump.running);
    assert_eq!(state.pump.pwr, 500);
    assert_eq!(state.pump.rpm, 3500);
    assert_eq!(state.pump.gpm, 40);
    assert_eq!(state.pump.time.hour, 15);

    // an unrecognized running byte leaves the whole pump substate alone
    let msg = NetworkMsg::PumpStatusResp(PumpStatusResp {
        running: 0x07,
        pwr_hi: 0xFF,
        ..Default::default()
    });
    assert!(!rx_update(&store, &msg));
    let (state, _) = store.get();
    assert!(state.pump.running);
    assert_eq!(state.pump.pwr, 500);
}

#[test]
fn test_chlor_name_and_salt_scaling() {
    let store = PoolStateStore::new();
    let mut name = [0u8; 16];
    name[..12].copy_from_slice(b"Intellichlor");
    let msg = NetworkMsg::ChlorNameResp(ChlorNameResp { salt: 80, name });
    assert!(rx_update(&store, &msg));
    let (state, _) = store.get();
    assert_eq!(state.chlor.salt, 4000);
    assert_eq!(state.chlor.name, "Intellichlor");
}

#[test]
fn test_chlor_status_priority() {
    let store = PoolStateStore::new();

    // low flow wins over low salt
    let msg = NetworkMsg::ChlorLevelResp(ChlorLevelResp { salt: 50, err: 0x03 });
    rx_update(&store, &msg);
    let (state, _) = store.get();
    assert_eq!(state.chlor.status, ChlorStatus::LowFlow);
    assert_eq!(state.chlor.salt, 2500);

    let cases = [
        (0x02, ChlorStatus::LowSalt),
        (0x04, ChlorStatus::HighSalt),
        (0x10, ChlorStatus::CleanCell),
        (0x40, ChlorStatus::Cold),
        (0x80, ChlorStatus::Ok),
        (0x20, ChlorStatus::Other),
    ];
    for (err, expected) in cases {
        let msg = NetworkMsg::ChlorLevelResp(ChlorLevelResp { salt: 50, err });
        rx_update(&store, &msg);
        let (state, _) = store.get();
        assert_eq!(state.chlor.status, expected, "err bits 0x{err:02x}");
    }
}

#[test]
fn test_requests_do_not_mutate() {
    let store = PoolStateStore::new();
    assert!(!rx_update(&store, &NetworkMsg::CtrlHeatReq));
    assert!(!rx_update(&store, &NetworkMsg::CtrlVersionReq));
    assert!(!rx_update(&store, &NetworkMsg::PumpStatusReq));
    let (_, valid) = store.get();
    assert!(!valid, "no-op updates must not mark the store valid");
}
