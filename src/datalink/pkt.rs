// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fmt, ops::Range};

use crate::datalink::{Prot, buffer::PacketBuffer};

/// A framed packet travelling between the data link and network layers.
///
/// The payload is a region of the owned [`PacketBuffer`]; whoever holds the
/// packet owns the buffer, and dropping the packet releases it.
pub struct DatalinkPkt {
    pub prot: Prot,
    /// Protocol-level message type from the header.
    pub prot_typ: u8,
    pub src: u8,
    pub dst: u8,
    /// Payload region within the buffer.
    data: Range<usize>,
    pub buffer: PacketBuffer,
}

impl DatalinkPkt {
    pub fn new(
        prot: Prot,
        prot_typ: u8,
        src: u8,
        dst: u8,
        data: Range<usize>,
        buffer: PacketBuffer,
    ) -> Self {
        Self { prot, prot_typ, src, dst, data, buffer }
    }

    /// The network-layer payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        self.buffer.region(&self.data)
    }

    #[inline]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// The assembled frame as it appears on the wire.
    #[inline]
    pub fn frame(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}

impl fmt::Debug for DatalinkPkt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatalinkPkt")
            .field("prot", &self.prot)
            .field("prot_typ", &format_args!("0x{:02X}", self.prot_typ))
            .field("src", &format_args!("0x{:02X}", self.src))
            .field("dst", &format_args!("0x{:02X}", self.dst))
            .field("data_len", &self.data.len())
            .finish()
    }
}
