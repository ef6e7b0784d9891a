// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::warn;
use zerocopy::FromBytes;

use crate::{
    datalink::{AddrGroup, Prot, addr_group, pkt::DatalinkPkt},
    network::msg::{ChlorTyp, CtrlTyp, NetworkMsg, PumpTyp},
};

/// Result of running a packet through the decoder.
#[derive(Debug)]
pub struct Decoded {
    /// The typed message, or `None` for unknown/malformed/filtered packets.
    pub msg: Option<NetworkMsg>,
    /// Whether this packet opens a window to transmit on the half-duplex
    /// bus (an A5 broadcast from the controller to everyone).
    pub tx_opportunity: bool,
}

/// Decodes a framed packet into a typed message.
///
/// Unknown typecodes and size mismatches degrade to `msg: None`; nothing is
/// fatal on the receive path, the next broadcast carries fresh state.
pub fn rx_msg(pkt: &DatalinkPkt) -> Decoded {
    let dst = addr_group(pkt.dst);

    // silently ignore packets that we don't support
    if (pkt.prot == Prot::A5Ctrl && dst == AddrGroup::Reserved)
        || (pkt.prot == Prot::Ic && dst != AddrGroup::All && dst != AddrGroup::Chlor)
    {
        return Decoded { msg: None, tx_opportunity: false };
    }

    let msg = match pkt.prot {
        Prot::A5Ctrl => decode_a5_ctrl(pkt),
        Prot::A5Pump => decode_a5_pump(pkt),
        Prot::Ic => decode_ic_chlor(pkt),
    };

    let tx_opportunity = pkt.prot == Prot::A5Ctrl
        && addr_group(pkt.src) == AddrGroup::Ctrl
        && addr_group(pkt.dst) == AddrGroup::All;

    Decoded { msg, tx_opportunity }
}

/// Reads a fixed payload; `None` when the received length does not match.
fn payload<P: FromBytes>(pkt: &DatalinkPkt) -> Option<P> {
    P::read_from_bytes(pkt.payload()).ok()
}

fn empty(pkt: &DatalinkPkt, msg: NetworkMsg) -> Option<NetworkMsg> {
    (pkt.data_len() == 0).then_some(msg)
}

fn decode_a5_ctrl(pkt: &DatalinkPkt) -> Option<NetworkMsg> {
    let Some(typ) = CtrlTyp::from_u8(pkt.prot_typ) else {
        warn!(typ = format_args!("0x{:02X}", pkt.prot_typ), "unknown a5 ctrl typ");
        return None;
    };
    match typ {
        CtrlTyp::SetAck => payload(pkt).map(NetworkMsg::CtrlSetAck),
        CtrlTyp::CircuitSet => payload(pkt).map(NetworkMsg::CtrlCircuitSet),
        CtrlTyp::SchedReq => empty(pkt, NetworkMsg::CtrlSchedReq),
        CtrlTyp::Sched => payload(pkt).map(NetworkMsg::CtrlSchedResp),
        CtrlTyp::StateReq => empty(pkt, NetworkMsg::CtrlStateReq),
        CtrlTyp::State => payload(pkt).map(NetworkMsg::CtrlStateBcast),
        CtrlTyp::StateSet => payload(pkt).map(NetworkMsg::CtrlStateSet),
        CtrlTyp::TimeReq => empty(pkt, NetworkMsg::CtrlTimeReq),
        CtrlTyp::Time => payload(pkt).map(NetworkMsg::CtrlTimeResp),
        CtrlTyp::TimeSet => payload(pkt).map(NetworkMsg::CtrlTimeSet),
        CtrlTyp::HeatReq => empty(pkt, NetworkMsg::CtrlHeatReq),
        CtrlTyp::Heat => payload(pkt).map(NetworkMsg::CtrlHeatResp),
        CtrlTyp::HeatSet => payload(pkt).map(NetworkMsg::CtrlHeatSet),
        CtrlTyp::LayoutReq => empty(pkt, NetworkMsg::CtrlLayoutReq),
        CtrlTyp::Layout => payload(pkt).map(NetworkMsg::CtrlLayoutResp),
        CtrlTyp::LayoutSet => payload(pkt).map(NetworkMsg::CtrlLayoutSet),
        CtrlTyp::VersionReq => empty(pkt, NetworkMsg::CtrlVersionReq),
        CtrlTyp::VersionResp => payload(pkt).map(NetworkMsg::CtrlVersionResp),
    }
}

fn decode_a5_pump(pkt: &DatalinkPkt) -> Option<NetworkMsg> {
    let Some(typ) = PumpTyp::from_u8(pkt.prot_typ) else {
        warn!(typ = format_args!("0x{:02X}", pkt.prot_typ), "unknown a5 pump typ");
        return None;
    };
    // the same typecode carries a request towards the pump and a response
    // away from it
    let to_pump = addr_group(pkt.dst) == AddrGroup::Pump;
    match typ {
        PumpTyp::Reg if to_pump => payload(pkt).map(NetworkMsg::PumpRegSet),
        PumpTyp::Reg => payload(pkt).map(NetworkMsg::PumpRegResp),
        PumpTyp::Ctrl if to_pump => payload(pkt).map(NetworkMsg::PumpCtrlSet),
        PumpTyp::Ctrl => payload(pkt).map(NetworkMsg::PumpCtrlResp),
        PumpTyp::Mode if to_pump => payload(pkt).map(NetworkMsg::PumpModeSet),
        PumpTyp::Mode => payload(pkt).map(NetworkMsg::PumpModeResp),
        PumpTyp::Run if to_pump => payload(pkt).map(NetworkMsg::PumpRunSet),
        PumpTyp::Run => payload(pkt).map(NetworkMsg::PumpRunResp),
        PumpTyp::Status if to_pump => empty(pkt, NetworkMsg::PumpStatusReq),
        PumpTyp::Status => payload(pkt).map(NetworkMsg::PumpStatusResp),
        PumpTyp::Ignored => None,
    }
}

fn decode_ic_chlor(pkt: &DatalinkPkt) -> Option<NetworkMsg> {
    let Some(typ) = ChlorTyp::from_u8(pkt.prot_typ) else {
        warn!(typ = format_args!("0x{:02X}", pkt.prot_typ), "unknown ic typ");
        return None;
    };
    match typ {
        ChlorTyp::PingReq => payload(pkt).map(NetworkMsg::ChlorPingReq),
        ChlorTyp::PingResp => payload(pkt).map(NetworkMsg::ChlorPingResp),
        ChlorTyp::NameReq => payload(pkt).map(NetworkMsg::ChlorNameReq),
        ChlorTyp::NameResp => payload(pkt).map(NetworkMsg::ChlorNameResp),
        ChlorTyp::LevelSet => payload(pkt).map(NetworkMsg::ChlorLevelSet),
        ChlorTyp::LevelResp => payload(pkt).map(NetworkMsg::ChlorLevelResp),
    }
}
