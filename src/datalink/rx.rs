// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{ops::Range, time::Duration};

use anyhow::Result;
use tokio::time::Instant;
use tracing::{debug, trace, warn};
use zerocopy::FromBytes;

use crate::{
    datalink::{
        A5Hdr, AddrGroup, IcHdr, MAX_DATA_SIZE, MAX_HEAD_SIZE, MAX_TAIL_SIZE, PREAMBLE_A5,
        PREAMBLE_IC, Prot, addr_group, buffer::PacketBuffer, calc_crc, pkt::DatalinkPkt,
    },
    link::{Link, Transceiver},
    utils::hex_dump,
};

const RX_BUF_SIZE: usize = MAX_HEAD_SIZE + MAX_DATA_SIZE + MAX_TAIL_SIZE;

/// Returns the payload length the IC protocol implies for a message type,
/// or `None` for types the bus never carries.
pub type IcLenFn = fn(u8) -> Option<usize>;

/// Tracks how far the byte stream has matched one preamble.
struct PreambleMatcher {
    pattern: &'static [u8],
    prot: Prot,
    idx: usize,
}

impl PreambleMatcher {
    /// Feeds one byte; reports whether the byte extended this preamble and
    /// whether the preamble is now complete.
    fn feed(&mut self, b: u8) -> (bool, bool) {
        if b == self.pattern[self.idx] {
            self.idx += 1;
            if self.idx == self.pattern.len() {
                return (true, true);
            }
            return (true, false);
        }
        (false, false)
    }
}

enum State {
    FindPreamble,
    ReadHead { hdr: Range<usize>, fill: usize },
    ReadData { region: Range<usize>, fill: usize },
    ReadTail { region: Range<usize>, fill: usize },
}

/// Five-state receive machine assembling frames from the bus byte stream.
///
/// One long-lived instance spans all calls: a read timeout returns control
/// to the caller with the partial frame kept, and the next poll resumes
/// where the stream left off. A frame that stays incomplete past the frame
/// deadline is abandoned and the hunt for a preamble starts over.
pub struct Packetizer {
    state: State,
    matchers: [PreambleMatcher; 2],
    buffer: PacketBuffer,
    ic_len: IcLenFn,
    frame_deadline: Duration,
    started: Option<Instant>,

    prot: Prot,
    prot_typ: u8,
    src: u8,
    dst: u8,
    data: Range<usize>,
    tail: Range<usize>,
}

impl Packetizer {
    pub fn new(ic_len: IcLenFn, frame_deadline: Duration) -> Self {
        Self {
            state: State::FindPreamble,
            matchers: [
                PreambleMatcher { pattern: &PREAMBLE_IC, prot: Prot::Ic, idx: 0 },
                PreambleMatcher { pattern: &PREAMBLE_A5, prot: Prot::A5Ctrl, idx: 0 },
            ],
            buffer: PacketBuffer::alloc(RX_BUF_SIZE),
            ic_len,
            frame_deadline,
            started: None,
            prot: Prot::A5Ctrl,
            prot_typ: 0,
            src: 0,
            dst: 0,
            data: 0..0,
            tail: 0..0,
        }
    }

    /// Drives the state machine until a valid frame completes or the read
    /// budget expires (`Ok(None)`). Malformed frames are dropped silently
    /// and the hunt continues; only transport errors surface.
    pub async fn rx_pkt<T: Transceiver>(
        &mut self,
        link: &mut Link<T>,
    ) -> Result<Option<DatalinkPkt>> {
        loop {
            if let Some(started) = self.started
                && started.elapsed() > self.frame_deadline
            {
                debug!("frame deadline expired mid-assembly");
                self.abandon();
            }

            match &mut self.state {
                State::FindPreamble => {
                    let mut byt = [0u8; 1];
                    if link.read_bytes(&mut byt).await? == 0 {
                        return Ok(None);
                    }
                    if let Some(prot) = self.feed_preamble(byt[0]) {
                        self.begin_frame(prot);
                    }
                },
                State::ReadHead { hdr, fill } => {
                    let want = hdr.len();
                    let region = hdr.start + *fill..hdr.end;
                    let n = link.read_bytes(&mut self.buffer.region_mut(&region)[..]).await?;
                    *fill += n;
                    if *fill < want {
                        return Ok(None);
                    }
                    if !self.parse_head() {
                        self.abandon();
                    }
                },
                State::ReadData { region, fill } => {
                    let r = region.start + *fill..region.end;
                    let n = link.read_bytes(&mut self.buffer.region_mut(&r)[..]).await?;
                    *fill += n;
                    if *fill < region.len() {
                        return Ok(None);
                    }
                    let tail = self.buffer.put(self.prot.tail_size());
                    self.state = State::ReadTail { region: tail, fill: 0 };
                },
                State::ReadTail { region, fill } => {
                    let r = region.start + *fill..region.end;
                    let n = link.read_bytes(&mut self.buffer.region_mut(&r)[..]).await?;
                    *fill += n;
                    if *fill < region.len() {
                        return Ok(None);
                    }
                    self.tail = region.clone();
                    if let Some(pkt) = self.check_crc() {
                        return Ok(Some(pkt));
                    }
                    self.abandon();
                },
            }
        }
    }

    /// Runs the byte through the preamble matchers. On a mismatch the byte
    /// is retried against every pattern's start, since it may itself open
    /// the next frame.
    fn feed_preamble(&mut self, b: u8) -> Option<Prot> {
        let mut part_of_preamble = false;
        let mut completed = None;
        for m in &mut self.matchers {
            let (part, complete) = m.feed(b);
            if complete {
                completed = Some(m.prot);
                break;
            }
            if part {
                part_of_preamble = true;
                break;
            }
        }
        if let Some(prot) = completed {
            self.reset_matchers();
            return Some(prot);
        }
        if !part_of_preamble {
            self.reset_matchers();
            for m in &mut self.matchers {
                let _ = m.feed(b);
            }
        }
        None
    }

    fn reset_matchers(&mut self) {
        for m in &mut self.matchers {
            m.idx = 0;
        }
    }

    /// A preamble completed: lay the frame prefix into the buffer and move
    /// on to the header.
    fn begin_frame(&mut self, prot: Prot) {
        self.buffer.reset();
        let head = self.buffer.put(MAX_HEAD_SIZE);
        self.buffer.unput(MAX_HEAD_SIZE - prot.head_size());

        let preamble: &[u8] = match prot {
            Prot::Ic => &PREAMBLE_IC,
            Prot::A5Ctrl | Prot::A5Pump => &PREAMBLE_A5,
        };
        let head_bytes = self.buffer.region_mut(&(head.start..head.start + prot.head_size()));
        head_bytes[0] = 0xFF;
        head_bytes[1..1 + preamble.len()].copy_from_slice(preamble);

        trace!(?prot, "preamble");
        self.prot = prot;
        self.started = Some(Instant::now());
        self.state = State::ReadHead {
            hdr: head.start + 1 + preamble.len()..head.start + prot.head_size(),
            fill: 0,
        };
    }

    /// A full header arrived: classify the packet and size its payload.
    fn parse_head(&mut self) -> bool {
        let State::ReadHead { hdr, .. } = &self.state else {
            return false;
        };
        let hdr_bytes = self.buffer.region(hdr);

        let data_len = match self.prot {
            Prot::A5Ctrl | Prot::A5Pump => {
                let Ok(hdr) = A5Hdr::read_from_bytes(hdr_bytes) else {
                    return false;
                };
                trace!(ver = hdr.ver, dst = hdr.dst, src = hdr.src, typ = hdr.typ,
                       len = hdr.len, "a5 header");
                if usize::from(hdr.len) > MAX_DATA_SIZE {
                    debug!(len = hdr.len, "a5 length exceeds maximum, dropping");
                    return false;
                }
                if addr_group(hdr.src) == AddrGroup::Pump
                    || addr_group(hdr.dst) == AddrGroup::Pump
                {
                    self.prot = Prot::A5Pump;
                }
                self.prot_typ = hdr.typ;
                self.src = hdr.src;
                self.dst = hdr.dst;
                usize::from(hdr.len)
            },
            Prot::Ic => {
                let Ok(hdr) = IcHdr::read_from_bytes(hdr_bytes) else {
                    return false;
                };
                trace!(dst = hdr.dst, typ = hdr.typ, "ic header");
                let Some(len) = (self.ic_len)(hdr.typ) else {
                    debug!(typ = hdr.typ, "unknown ic message type, dropping");
                    return false;
                };
                self.prot_typ = hdr.typ;
                self.src = 0;
                self.dst = hdr.dst;
                len
            },
        };

        self.data = self.buffer.put(data_len);
        self.state = State::ReadData { region: self.data.clone(), fill: 0 };
        true
    }

    /// Verifies the received checksum over the protocol's span.
    fn check_crc(&mut self) -> Option<DatalinkPkt> {
        // the receive buffer never reserves headroom, so the absolute
        // `data`/`tail` ranges double as frame offsets
        debug_assert_eq!(self.buffer.data_offset(), 0);
        let frame = self.buffer.as_slice();
        let tail = &frame[self.tail.start..self.tail.end];
        let (rx, calc) = match self.prot {
            Prot::A5Ctrl | Prot::A5Pump => {
                // from the final preamble byte through the last payload byte
                let span = &frame[3..self.data.end];
                (u16::from(tail[0]) << 8 | u16::from(tail[1]), calc_crc(span))
            },
            Prot::Ic => {
                // from the first preamble byte through the last payload byte
                let span = &frame[1..self.data.end];
                (u16::from(tail[0]), calc_crc(span) & 0xFF)
            },
        };
        if rx != calc {
            warn!(rx = format_args!("0x{rx:03x}"), calc = format_args!("0x{calc:03x}"),
                  frame = %hex_dump(frame), "crc mismatch");
            return None;
        }

        self.started = None;
        self.state = State::FindPreamble;
        let buffer = std::mem::replace(&mut self.buffer, PacketBuffer::alloc(RX_BUF_SIZE));
        Some(DatalinkPkt::new(
            self.prot,
            self.prot_typ,
            self.src,
            self.dst,
            self.data.clone(),
            buffer,
        ))
    }

    /// Drops the in-flight frame and resumes the preamble hunt.
    fn abandon(&mut self) {
        self.buffer.reset();
        self.reset_matchers();
        self.started = None;
        self.state = State::FindPreamble;
    }
}
