// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! The pool-state snapshot: one process-wide value describing everything the
//! bus has told us about the pool, updated message by message.

pub mod json;
pub mod rx;
pub mod store;

use serde::Serialize;

use crate::network::msg::{CIRCUIT_COUNT, HeatSrc, SYS_MODE_COUNT};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Date {
    pub day: u8,
    pub month: u8,
    pub year: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tod {
    pub date: Date,
    pub time: Time,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct System {
    pub tod: Tod,
    pub version: Version,
}

/// Index into [`PoolState::thermos`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermoKind {
    Pool = 0,
    Spa = 1,
}

pub const THERMO_COUNT: usize = 2;

/// Index into [`PoolState::temps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempKind {
    Air = 0,
    Solar = 1,
}

pub const TEMP_COUNT: usize = 2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Temp {
    pub temp: u8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thermo {
    pub temp: u8,
    pub set_point: u8,
    pub heat_src: HeatSrc,
    pub heating: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sched {
    /// 0-based circuit index.
    pub circuit: u8,
    /// Minutes since midnight.
    pub start: u16,
    /// Minutes since midnight.
    pub stop: u16,
}

pub const SCHED_COUNT: usize = 2;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Modes {
    pub set: [bool; SYS_MODE_COUNT],
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Circuits {
    pub active: [bool; CIRCUIT_COUNT],
    pub delay: [bool; CIRCUIT_COUNT],
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pump {
    pub time: Time,
    pub mode: u8,
    pub running: bool,
    pub state: u8,
    /// Watt.
    pub pwr: u16,
    /// Gallons per minute.
    pub gpm: u16,
    pub rpm: u16,
    pub pct: u16,
    pub err: u8,
    /// Minutes.
    pub timer: u8,
}

/// Chlorinator health, highest-priority error bit wins.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChlorStatus {
    #[default]
    Ok,
    LowFlow,
    LowSalt,
    HighSalt,
    CleanCell,
    Cold,
    Other,
}

impl ChlorStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::LowFlow => "low_flow",
            Self::LowSalt => "low_salt",
            Self::HighSalt => "high_salt",
            Self::CleanCell => "clean_cell",
            Self::Cold => "cold",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Chlor {
    pub name: String,
    pub pct: u8,
    /// Parts per million; good range is 2600 to 4500.
    pub salt: u16,
    pub status: ChlorStatus,
}

/// Everything the bus has told us, in one snapshot.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct PoolState {
    pub system: System,
    pub temps: [Temp; TEMP_COUNT],
    pub thermos: [Thermo; THERMO_COUNT],
    pub scheds: [Sched; SCHED_COUNT],
    pub modes: Modes,
    pub circuits: Circuits,
    pub pump: Pump,
    pub chlor: Chlor,
}
