// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Typed network-layer messages and the declarative table tying each one to
//! its wire identity.
//!
//! The table is the single source of truth for both codec directions: the
//! encoder looks up `(prot, prot_typ, payload size)` by message kind, the
//! decoder checks received payload sizes against it.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::datalink::Prot;

/// A5 message types spoken by the controller.
///
/// The controller derives request/set codes from the broadcast code:
/// `SET = typ | 0x80`, `REQ = typ | 0xC0`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlTyp {
    SetAck = 0x01,
    State = 0x02,
    Time = 0x05,
    Heat = 0x08,
    Sched = 0x1E,
    Layout = 0x21,
    StateSet = 0x82,
    TimeSet = 0x85,
    CircuitSet = 0x86,
    HeatSet = 0x88,
    LayoutSet = 0xA1,
    StateReq = 0xC2,
    TimeReq = 0xC5,
    HeatReq = 0xC8,
    SchedReq = 0xDE,
    LayoutReq = 0xE1,
    VersionResp = 0xFC,
    VersionReq = 0xFD,
}

impl CtrlTyp {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x01 => Self::SetAck,
            0x02 => Self::State,
            0x05 => Self::Time,
            0x08 => Self::Heat,
            0x1E => Self::Sched,
            0x21 => Self::Layout,
            0x82 => Self::StateSet,
            0x85 => Self::TimeSet,
            0x86 => Self::CircuitSet,
            0x88 => Self::HeatSet,
            0xA1 => Self::LayoutSet,
            0xC2 => Self::StateReq,
            0xC5 => Self::TimeReq,
            0xC8 => Self::HeatReq,
            0xDE => Self::SchedReq,
            0xE1 => Self::LayoutReq,
            0xFC => Self::VersionResp,
            0xFD => Self::VersionReq,
            _ => return None,
        })
    }
}

/// A5 message types spoken by the pump; the same code carries a request
/// towards the pump and the response away from it.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpTyp {
    Reg = 0x01,
    Ctrl = 0x04,
    Mode = 0x05,
    Run = 0x06,
    Status = 0x07,
    /// Seen on the bus with a one-byte payload; the pump never replies.
    Ignored = 0xFF,
}

impl PumpTyp {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x01 => Self::Reg,
            0x04 => Self::Ctrl,
            0x05 => Self::Mode,
            0x06 => Self::Run,
            0x07 => Self::Status,
            0xFF => Self::Ignored,
            _ => return None,
        })
    }
}

/// IC message types spoken by the chlorinator.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChlorTyp {
    PingReq = 0x00,
    PingResp = 0x01,
    NameResp = 0x03,
    LevelSet = 0x11,
    LevelResp = 0x12,
    NameReq = 0x14,
}

impl ChlorTyp {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x00 => Self::PingReq,
            0x01 => Self::PingResp,
            0x03 => Self::NameResp,
            0x11 => Self::LevelSet,
            0x12 => Self::LevelResp,
            0x14 => Self::NameReq,
            _ => return None,
        })
    }
}

/// IC frames carry no length field; the type implies the payload size.
pub fn ic_data_len(typ: u8) -> Option<usize> {
    let typ = ChlorTyp::from_u8(typ)?;
    let kind = match typ {
        ChlorTyp::PingReq => MsgKind::ChlorPingReq,
        ChlorTyp::PingResp => MsgKind::ChlorPingResp,
        ChlorTyp::NameResp => MsgKind::ChlorNameResp,
        ChlorTyp::LevelSet => MsgKind::ChlorLevelSet,
        ChlorTyp::LevelResp => MsgKind::ChlorLevelResp,
        ChlorTyp::NameReq => MsgKind::ChlorNameReq,
    };
    descr(kind).map(|d| d.data_len)
}

// ─────────────────────────────────────────────────────────────────────────────
// Domain enumerations carried inside message payloads

/// Relay-controlled outputs, in bus bit order. The wire encodes circuits
/// 1-based; the bitmaps in the state broadcast are 0-based.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Circuit {
    Spa = 0,
    Aux1,
    Aux2,
    Aux3,
    Ft1,
    Pool,
    Ft2,
    Ft3,
    Ft4,
}

pub const CIRCUIT_COUNT: usize = 9;

impl Circuit {
    pub fn from_index(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::Spa,
            1 => Self::Aux1,
            2 => Self::Aux2,
            3 => Self::Aux3,
            4 => Self::Ft1,
            5 => Self::Pool,
            6 => Self::Ft2,
            7 => Self::Ft3,
            8 => Self::Ft4,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Spa => "spa",
            Self::Aux1 => "aux1",
            Self::Aux2 => "aux2",
            Self::Aux3 => "aux3",
            Self::Ft1 => "ft1",
            Self::Pool => "pool",
            Self::Ft2 => "ft2",
            Self::Ft3 => "ft3",
            Self::Ft4 => "ft4",
        }
    }
}

/// Heat source selection, two bits per thermostat in the wire byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeatSrc {
    #[default]
    None = 0,
    Heater = 1,
    SolarPref = 2,
    Solar = 3,
}

impl serde::Serialize for HeatSrc {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl HeatSrc {
    pub fn from_bits(v: u8) -> Self {
        match v & 0x03 {
            1 => Self::Heater,
            2 => Self::SolarPref,
            3 => Self::Solar,
            _ => Self::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Heater => "heater",
            Self::SolarPref => "solar_pref",
            Self::Solar => "solar",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            s if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("off") => Self::None,
            s if s.eq_ignore_ascii_case("heater") || s.eq_ignore_ascii_case("heat") => {
                Self::Heater
            },
            s if s.eq_ignore_ascii_case("solar_pref") => Self::SolarPref,
            s if s.eq_ignore_ascii_case("solar") => Self::Solar,
            _ => return None,
        })
    }
}

/// Pump operating modes as reported in the status response.
pub const PUMP_MODE_NAMES: [&str; 13] = [
    "filter", "man", "bkwash", "x03", "x04", "x05", "ft1", "x07", "x08", "ep1", "ep2",
    "ep3", "ep4",
];

pub fn pump_mode_name(mode: u8) -> &'static str {
    PUMP_MODE_NAMES.get(usize::from(mode)).copied().unwrap_or("unknown")
}

/// Controller mode bits from the state broadcast.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysMode {
    Service = 0,
    Unknown01,
    TempInc,
    FreezeProt,
    Timeout,
}

pub const SYS_MODE_COUNT: usize = 5;

pub fn sys_mode_name(mode: usize) -> &'static str {
    ["service", "unknown01", "temp_inc", "freeze_prot", "timeout"]
        .get(mode)
        .copied()
        .unwrap_or("unknown")
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload layouts (wire byte order, one struct per fixed payload)

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlSetAck {
    /// Message type the controller is acknowledging.
    pub typ: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlCircuitSet {
    /// 1-based circuit number.
    pub circuit: u8,
    pub value: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlSchedSub {
    /// 1-based circuit number.
    pub circuit: u8,
    pub reserved: u8,
    pub start_hi: u8,
    pub start_lo: u8,
    pub stop_hi: u8,
    pub stop_lo: u8,
}

impl CtrlSchedSub {
    #[inline]
    pub fn start_minutes(&self) -> u16 {
        u16::from(self.start_hi) << 8 | u16::from(self.start_lo)
    }

    #[inline]
    pub fn stop_minutes(&self) -> u16 {
        u16::from(self.stop_hi) << 8 | u16::from(self.stop_lo)
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlSchedResp {
    pub reserved: [u8; 4],
    pub scheds: [CtrlSchedSub; 2],
}

/// Periodic controller state broadcast.
#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlStateBcast {
    pub hour: u8,
    pub minute: u8,
    pub active_lo: u8,
    pub active_hi: u8,
    pub reserved1: [u8; 5],
    /// Controller mode bits (service, freeze protection, ...).
    pub mode: u8,
    /// Bit 0x04 = pool heating, 0x08 = spa heating.
    pub heat_status: u8,
    pub reserved2: u8,
    pub delay: u8,
    pub reserved3: u8,
    pub pool_temp: u8,
    pub spa_temp: u8,
    pub major: u8,
    pub minor: u8,
    pub air_temp: u8,
    pub solar_temp: u8,
    pub reserved4: [u8; 2],
    /// Pool heat source in bits 0..2, spa heat source in bits 2..4.
    pub heat_src: u8,
    pub reserved5: [u8; 6],
}

impl CtrlStateBcast {
    #[inline]
    pub fn active_bitmap(&self) -> u16 {
        u16::from(self.active_hi) << 8 | u16::from(self.active_lo)
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlTime {
    pub hour: u8,
    pub minute: u8,
    pub reserved: u8,
    pub day: u8,
    pub month: u8,
    pub year: u8,
    pub clk_speed: u8,
    pub daylight_savings: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlHeatResp {
    pub pool_temp: u8,
    pub spa_temp: u8,
    pub air_temp: u8,
    pub pool_set_point: u8,
    pub spa_set_point: u8,
    /// Pool heat source in bits 0..2, spa heat source in bits 2..4.
    pub heat_src: u8,
    pub reserved: [u8; 7],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlHeatSet {
    pub pool_set_point: u8,
    pub spa_set_point: u8,
    pub heat_src: u8,
    pub reserved: u8,
}

impl CtrlHeatSet {
    pub fn new(pool_set_point: u8, spa_set_point: u8, pool_src: HeatSrc, spa_src: HeatSrc) -> Self {
        Self {
            pool_set_point,
            spa_set_point,
            heat_src: (pool_src as u8) & 0x03 | (spa_src as u8) << 2,
            reserved: 0,
        }
    }
}

/// Circuits mapped to the four buttons of the wired remote.
#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlLayout {
    pub circuit: [u8; 4],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct CtrlVersionResp {
    pub major: u8,
    pub minor: u8,
    pub reserved: [u8; 15],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PumpRegSet {
    pub addr_hi: u8,
    pub addr_lo: u8,
    pub value_hi: u8,
    pub value_lo: u8,
}

impl PumpRegSet {
    #[inline]
    pub fn address(&self) -> u16 {
        u16::from(self.addr_hi) << 8 | u16::from(self.addr_lo)
    }

    #[inline]
    pub fn value(&self) -> u16 {
        u16::from(self.value_hi) << 8 | u16::from(self.value_lo)
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PumpRegResp {
    pub value_hi: u8,
    pub value_lo: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PumpCtrl {
    pub ctrl: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PumpMode {
    pub mode: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PumpRun {
    pub running: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct PumpStatusResp {
    /// 0x0A while running, 0x04 when stopped.
    pub running: u8,
    pub mode: u8,
    pub state: u8,
    pub pwr_hi: u8,
    pub pwr_lo: u8,
    pub rpm_hi: u8,
    pub rpm_lo: u8,
    pub gpm: u8,
    pub pct: u8,
    pub reserved1: u8,
    pub err: u8,
    pub reserved2: u8,
    pub timer: u8,
    pub hour: u8,
    pub minute: u8,
}

impl PumpStatusResp {
    #[inline]
    pub fn power_watt(&self) -> u16 {
        u16::from(self.pwr_hi) << 8 | u16::from(self.pwr_lo)
    }

    #[inline]
    pub fn rpm(&self) -> u16 {
        u16::from(self.rpm_hi) << 8 | u16::from(self.rpm_lo)
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ChlorPingReq {
    pub reserved: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ChlorPingResp {
    pub reserved: [u8; 2],
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ChlorNameReq {
    pub reserved: u8,
}

#[repr(C)]
#[derive(Debug, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ChlorNameResp {
    /// Salt concentration in units of 50 ppm.
    pub salt: u8,
    pub name: [u8; 16],
}

impl Default for ChlorNameResp {
    fn default() -> Self {
        Self { salt: 0, name: [0; 16] }
    }
}

impl ChlorNameResp {
    /// The advertised cell name up to the first NUL.
    pub fn name_str(&self) -> &str {
        let end = self.name.iter().position(|b| *b == 0).unwrap_or(self.name.len());
        core::str::from_utf8(&self.name[..end]).unwrap_or("")
    }
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ChlorLevelSet {
    pub pct: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct ChlorLevelResp {
    /// Salt concentration in units of 50 ppm.
    pub salt: u8,
    pub err: u8,
}

bitflags::bitflags! {
    /// Status bits of the chlorinator level response.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChlorErr: u8 {
        const LOW_FLOW   = 0x01;
        const LOW_SALT   = 0x02;
        const HIGH_SALT  = 0x04;
        const CLEAN_CELL = 0x10;
        const COLD       = 0x40;
        const OK         = 0x80;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// The message kinds and the codec table

/// Every message the codec understands, as a payload-free discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgKind {
    CtrlSetAck,
    CtrlCircuitSet,
    CtrlSchedReq,
    CtrlSchedResp,
    CtrlStateReq,
    CtrlStateBcast,
    CtrlStateSet,
    CtrlTimeReq,
    CtrlTimeResp,
    CtrlTimeSet,
    CtrlHeatReq,
    CtrlHeatResp,
    CtrlHeatSet,
    CtrlLayoutReq,
    CtrlLayoutResp,
    CtrlLayoutSet,
    CtrlVersionReq,
    CtrlVersionResp,
    PumpRegSet,
    PumpRegResp,
    PumpCtrlSet,
    PumpCtrlResp,
    PumpModeSet,
    PumpModeResp,
    PumpRunSet,
    PumpRunResp,
    PumpStatusReq,
    PumpStatusResp,
    ChlorPingReq,
    ChlorPingResp,
    ChlorNameReq,
    ChlorNameResp,
    ChlorLevelSet,
    ChlorLevelResp,
}

/// A decoded (or to-be-encoded) network message with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkMsg {
    CtrlSetAck(CtrlSetAck),
    CtrlCircuitSet(CtrlCircuitSet),
    CtrlSchedReq,
    CtrlSchedResp(CtrlSchedResp),
    CtrlStateReq,
    CtrlStateBcast(CtrlStateBcast),
    CtrlStateSet(CtrlStateBcast),
    CtrlTimeReq,
    CtrlTimeResp(CtrlTime),
    CtrlTimeSet(CtrlTime),
    CtrlHeatReq,
    CtrlHeatResp(CtrlHeatResp),
    CtrlHeatSet(CtrlHeatSet),
    CtrlLayoutReq,
    CtrlLayoutResp(CtrlLayout),
    CtrlLayoutSet(CtrlLayout),
    CtrlVersionReq,
    CtrlVersionResp(CtrlVersionResp),
    PumpRegSet(PumpRegSet),
    PumpRegResp(PumpRegResp),
    PumpCtrlSet(PumpCtrl),
    PumpCtrlResp(PumpCtrl),
    PumpModeSet(PumpMode),
    PumpModeResp(PumpMode),
    PumpRunSet(PumpRun),
    PumpRunResp(PumpRun),
    PumpStatusReq,
    PumpStatusResp(PumpStatusResp),
    ChlorPingReq(ChlorPingReq),
    ChlorPingResp(ChlorPingResp),
    ChlorNameReq(ChlorNameReq),
    ChlorNameResp(ChlorNameResp),
    ChlorLevelSet(ChlorLevelSet),
    ChlorLevelResp(ChlorLevelResp),
}

impl NetworkMsg {
    pub fn kind(&self) -> MsgKind {
        match self {
            Self::CtrlSetAck(_) => MsgKind::CtrlSetAck,
            Self::CtrlCircuitSet(_) => MsgKind::CtrlCircuitSet,
            Self::CtrlSchedReq => MsgKind::CtrlSchedReq,
            Self::CtrlSchedResp(_) => MsgKind::CtrlSchedResp,
            Self::CtrlStateReq => MsgKind::CtrlStateReq,
            Self::CtrlStateBcast(_) => MsgKind::CtrlStateBcast,
            Self::CtrlStateSet(_) => MsgKind::CtrlStateSet,
            Self::CtrlTimeReq => MsgKind::CtrlTimeReq,
            Self::CtrlTimeResp(_) => MsgKind::CtrlTimeResp,
            Self::CtrlTimeSet(_) => MsgKind::CtrlTimeSet,
            Self::CtrlHeatReq => MsgKind::CtrlHeatReq,
            Self::CtrlHeatResp(_) => MsgKind::CtrlHeatResp,
            Self::CtrlHeatSet(_) => MsgKind::CtrlHeatSet,
            Self::CtrlLayoutReq => MsgKind::CtrlLayoutReq,
            Self::CtrlLayoutResp(_) => MsgKind::CtrlLayoutResp,
            Self::CtrlLayoutSet(_) => MsgKind::CtrlLayoutSet,
            Self::CtrlVersionReq => MsgKind::CtrlVersionReq,
            Self::CtrlVersionResp(_) => MsgKind::CtrlVersionResp,
            Self::PumpRegSet(_) => MsgKind::PumpRegSet,
            Self::PumpRegResp(_) => MsgKind::PumpRegResp,
            Self::PumpCtrlSet(_) => MsgKind::PumpCtrlSet,
            Self::PumpCtrlResp(_) => MsgKind::PumpCtrlResp,
            Self::PumpModeSet(_) => MsgKind::PumpModeSet,
            Self::PumpModeResp(_) => MsgKind::PumpModeResp,
            Self::PumpRunSet(_) => MsgKind::PumpRunSet,
            Self::PumpRunResp(_) => MsgKind::PumpRunResp,
            Self::PumpStatusReq => MsgKind::PumpStatusReq,
            Self::PumpStatusResp(_) => MsgKind::PumpStatusResp,
            Self::ChlorPingReq(_) => MsgKind::ChlorPingReq,
            Self::ChlorPingResp(_) => MsgKind::ChlorPingResp,
            Self::ChlorNameReq(_) => MsgKind::ChlorNameReq,
            Self::ChlorNameResp(_) => MsgKind::ChlorNameResp,
            Self::ChlorLevelSet(_) => MsgKind::ChlorLevelSet,
            Self::ChlorLevelResp(_) => MsgKind::ChlorLevelResp,
        }
    }

    /// The payload in wire byte order.
    pub fn payload_bytes(&self) -> &[u8] {
        match self {
            Self::CtrlSetAck(m) => m.as_bytes(),
            Self::CtrlCircuitSet(m) => m.as_bytes(),
            Self::CtrlSchedReq => &[],
            Self::CtrlSchedResp(m) => m.as_bytes(),
            Self::CtrlStateReq => &[],
            Self::CtrlStateBcast(m) => m.as_bytes(),
            Self::CtrlStateSet(m) => m.as_bytes(),
            Self::CtrlTimeReq => &[],
            Self::CtrlTimeResp(m) => m.as_bytes(),
            Self::CtrlTimeSet(m) => m.as_bytes(),
            Self::CtrlHeatReq => &[],
            Self::CtrlHeatResp(m) => m.as_bytes(),
            Self::CtrlHeatSet(m) => m.as_bytes(),
            Self::CtrlLayoutReq => &[],
            Self::CtrlLayoutResp(m) => m.as_bytes(),
            Self::CtrlLayoutSet(m) => m.as_bytes(),
            Self::CtrlVersionReq => &[],
            Self::CtrlVersionResp(m) => m.as_bytes(),
            Self::PumpRegSet(m) => m.as_bytes(),
            Self::PumpRegResp(m) => m.as_bytes(),
            Self::PumpCtrlSet(m) => m.as_bytes(),
            Self::PumpCtrlResp(m) => m.as_bytes(),
            Self::PumpModeSet(m) => m.as_bytes(),
            Self::PumpModeResp(m) => m.as_bytes(),
            Self::PumpRunSet(m) => m.as_bytes(),
            Self::PumpRunResp(m) => m.as_bytes(),
            Self::PumpStatusReq => &[],
            Self::PumpStatusResp(m) => m.as_bytes(),
            Self::ChlorPingReq(m) => m.as_bytes(),
            Self::ChlorPingResp(m) => m.as_bytes(),
            Self::ChlorNameReq(m) => m.as_bytes(),
            Self::ChlorNameResp(m) => m.as_bytes(),
            Self::ChlorLevelSet(m) => m.as_bytes(),
            Self::ChlorLevelResp(m) => m.as_bytes(),
        }
    }
}

/// Builds the message for a payload-free request kind; `None` for kinds
/// that carry a payload.
pub fn request_msg(kind: MsgKind) -> Option<NetworkMsg> {
    Some(match kind {
        MsgKind::CtrlSchedReq => NetworkMsg::CtrlSchedReq,
        MsgKind::CtrlStateReq => NetworkMsg::CtrlStateReq,
        MsgKind::CtrlTimeReq => NetworkMsg::CtrlTimeReq,
        MsgKind::CtrlHeatReq => NetworkMsg::CtrlHeatReq,
        MsgKind::CtrlLayoutReq => NetworkMsg::CtrlLayoutReq,
        MsgKind::CtrlVersionReq => NetworkMsg::CtrlVersionReq,
        MsgKind::PumpStatusReq => NetworkMsg::PumpStatusReq,
        _ => return None,
    })
}

/// Returned when a message kind has no row in the codec table.
#[derive(Debug, thiserror::Error)]
#[error("no wire mapping for {0:?}")]
pub struct UnknownMsgKind(pub MsgKind);

/// One row of the codec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsgDescr {
    pub kind: MsgKind,
    pub data_len: usize,
    pub prot: Prot,
    pub prot_typ: u8,
}

const fn row(kind: MsgKind, data_len: usize, prot: Prot, prot_typ: u8) -> MsgDescr {
    MsgDescr { kind, data_len, prot, prot_typ }
}

/// Maps every message kind to its wire identity, in both directions.
pub const MSG_TABLE: &[MsgDescr] = &[
    row(MsgKind::CtrlSetAck, size_of::<CtrlSetAck>(), Prot::A5Ctrl, CtrlTyp::SetAck as u8),
    row(MsgKind::CtrlCircuitSet, size_of::<CtrlCircuitSet>(), Prot::A5Ctrl, CtrlTyp::CircuitSet as u8),
    row(MsgKind::CtrlSchedReq, 0, Prot::A5Ctrl, CtrlTyp::SchedReq as u8),
    row(MsgKind::CtrlSchedResp, size_of::<CtrlSchedResp>(), Prot::A5Ctrl, CtrlTyp::Sched as u8),
    row(MsgKind::CtrlStateReq, 0, Prot::A5Ctrl, CtrlTyp::StateReq as u8),
    row(MsgKind::CtrlStateBcast, size_of::<CtrlStateBcast>(), Prot::A5Ctrl, CtrlTyp::State as u8),
    row(MsgKind::CtrlStateSet, size_of::<CtrlStateBcast>(), Prot::A5Ctrl, CtrlTyp::StateSet as u8),
    row(MsgKind::CtrlTimeReq, 0, Prot::A5Ctrl, CtrlTyp::TimeReq as u8),
    row(MsgKind::CtrlTimeResp, size_of::<CtrlTime>(), Prot::A5Ctrl, CtrlTyp::Time as u8),
    row(MsgKind::CtrlTimeSet, size_of::<CtrlTime>(), Prot::A5Ctrl, CtrlTyp::TimeSet as u8),
    row(MsgKind::CtrlHeatReq, 0, Prot::A5Ctrl, CtrlTyp::HeatReq as u8),
    row(MsgKind::CtrlHeatResp, size_of::<CtrlHeatResp>(), Prot::A5Ctrl, CtrlTyp::Heat as u8),
    row(MsgKind::CtrlHeatSet, size_of::<CtrlHeatSet>(), Prot::A5Ctrl, CtrlTyp::HeatSet as u8),
    row(MsgKind::CtrlLayoutReq, 0, Prot::A5Ctrl, CtrlTyp::LayoutReq as u8),
    row(MsgKind::CtrlLayoutResp, size_of::<CtrlLayout>(), Prot::A5Ctrl, CtrlTyp::Layout as u8),
    row(MsgKind::CtrlLayoutSet, size_of::<CtrlLayout>(), Prot::A5Ctrl, CtrlTyp::LayoutSet as u8),
    row(MsgKind::CtrlVersionReq, 0, Prot::A5Ctrl, CtrlTyp::VersionReq as u8),
    row(MsgKind::CtrlVersionResp, size_of::<CtrlVersionResp>(), Prot::A5Ctrl, CtrlTyp::VersionResp as u8),
    row(MsgKind::PumpRegSet, size_of::<PumpRegSet>(), Prot::A5Pump, PumpTyp::Reg as u8),
    row(MsgKind::PumpRegResp, size_of::<PumpRegResp>(), Prot::A5Pump, PumpTyp::Reg as u8),
    row(MsgKind::PumpCtrlSet, size_of::<PumpCtrl>(), Prot::A5Pump, PumpTyp::Ctrl as u8),
    row(MsgKind::PumpCtrlResp, size_of::<PumpCtrl>(), Prot::A5Pump, PumpTyp::Ctrl as u8),
    row(MsgKind::PumpModeSet, size_of::<PumpMode>(), Prot::A5Pump, PumpTyp::Mode as u8),
    row(MsgKind::PumpModeResp, size_of::<PumpMode>(), Prot::A5Pump, PumpTyp::Mode as u8),
    row(MsgKind::PumpRunSet, size_of::<PumpRun>(), Prot::A5Pump, PumpTyp::Run as u8),
    row(MsgKind::PumpRunResp, size_of::<PumpRun>(), Prot::A5Pump, PumpTyp::Run as u8),
    row(MsgKind::PumpStatusReq, 0, Prot::A5Pump, PumpTyp::Status as u8),
    row(MsgKind::PumpStatusResp, size_of::<PumpStatusResp>(), Prot::A5Pump, PumpTyp::Status as u8),
    row(MsgKind::ChlorPingReq, size_of::<ChlorPingReq>(), Prot::Ic, ChlorTyp::PingReq as u8),
    row(MsgKind::ChlorPingResp, size_of::<ChlorPingResp>(), Prot::Ic, ChlorTyp::PingResp as u8),
    row(MsgKind::ChlorNameReq, size_of::<ChlorNameReq>(), Prot::Ic, ChlorTyp::NameReq as u8),
    row(MsgKind::ChlorNameResp, size_of::<ChlorNameResp>(), Prot::Ic, ChlorTyp::NameResp as u8),
    row(MsgKind::ChlorLevelSet, size_of::<ChlorLevelSet>(), Prot::Ic, ChlorTyp::LevelSet as u8),
    row(MsgKind::ChlorLevelResp, size_of::<ChlorLevelResp>(), Prot::Ic, ChlorTyp::LevelResp as u8),
];

/// Looks up a message kind's wire identity.
pub fn descr(kind: MsgKind) -> Option<&'static MsgDescr> {
    MSG_TABLE.iter().find(|d| d.kind == kind)
}
