// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use tracing::debug;

use crate::{
    datalink::{
        A5_HEAD_SIZE, A5_TAIL_SIZE, AddrGroup, IC_HEAD_SIZE, IC_TAIL_SIZE, POSTAMBLE_IC,
        PREAMBLE_A5, PREAMBLE_IC, Prot, calc_crc, dev_addr, pkt::DatalinkPkt,
    },
    link::TxQueue,
    utils::hex_dump,
};

/// Lays the datalink head and tail around a payload already placed in the
/// packet's reserved-headroom buffer, then hands the frame to the Link
/// queue for the next transmit opportunity.
pub fn tx_pkt_queue(tx_q: &TxQueue, mut pkt: DatalinkPkt) {
    frame_pkt(&mut pkt);
    debug!(prot = ?pkt.prot, frame = %hex_dump(pkt.frame()), "tx frame");
    tx_q.queue(pkt);
}

/// Prepends the protocol head and appends the checksum tail.
///
/// Outbound frames originate from the wired-remote address towards the
/// controller, matching what the controller expects from a peripheral.
pub fn frame_pkt(pkt: &mut DatalinkPkt) {
    match pkt.prot {
        Prot::A5Ctrl | Prot::A5Pump => {
            let head = pkt.buffer.push(A5_HEAD_SIZE);
            let data_len = pkt.data_len() as u8;
            let prot_typ = pkt.prot_typ;
            let h = pkt.buffer.region_mut(&head);
            h[0] = 0xFF;
            h[1..4].copy_from_slice(&PREAMBLE_A5);
            h[4] = 0x01; // protocol version
            h[5] = dev_addr(AddrGroup::Ctrl, 0);
            h[6] = dev_addr(AddrGroup::Remote, 2);
            h[7] = prot_typ;
            h[8] = data_len;
            pkt.src = h[6];
            pkt.dst = h[5];

            // checksum spans the final preamble byte through the payload
            let crc = calc_crc(&pkt.buffer.as_slice()[3..]);
            let tail = pkt.buffer.put(A5_TAIL_SIZE);
            pkt.buffer.region_mut(&tail).copy_from_slice(&crc.to_be_bytes());
        },
        Prot::Ic => {
            let head = pkt.buffer.push(IC_HEAD_SIZE);
            let prot_typ = pkt.prot_typ;
            let h = pkt.buffer.region_mut(&head);
            h[0] = 0xFF;
            h[1..3].copy_from_slice(&PREAMBLE_IC);
            h[3] = dev_addr(AddrGroup::Ctrl, 0);
            h[4] = prot_typ;
            pkt.dst = h[3];

            // checksum spans the first preamble byte through the payload
            let crc = calc_crc(&pkt.buffer.as_slice()[1..]) as u8;
            let tail = pkt.buffer.put(IC_TAIL_SIZE);
            let t = pkt.buffer.region_mut(&tail);
            t[0] = crc;
            t[1..3].copy_from_slice(&POSTAMBLE_IC);
        },
    }
}
