// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use anyhow::Result;

use crate::{
    datalink::{MAX_HEAD_SIZE, MAX_TAIL_SIZE, buffer::PacketBuffer, pkt::DatalinkPkt},
    network::msg::{NetworkMsg, UnknownMsgKind, descr},
};

/// Builds an unframed datalink packet for a message: allocates a buffer with
/// headroom for the largest head, places the payload, and leaves the head
/// and tail to the datalink TX layer.
pub fn create_pkt(msg: &NetworkMsg) -> Result<DatalinkPkt> {
    let d = descr(msg.kind()).ok_or(UnknownMsgKind(msg.kind()))?;

    let mut buffer = PacketBuffer::alloc(MAX_HEAD_SIZE + d.data_len + MAX_TAIL_SIZE);
    buffer.reserve(MAX_HEAD_SIZE);
    let data = buffer.put(d.data_len);

    let bytes = msg.payload_bytes();
    debug_assert_eq!(bytes.len(), d.data_len);
    buffer.region_mut(&data).copy_from_slice(bytes);

    Ok(DatalinkPkt::new(d.prot, d.prot_typ, 0, 0, data, buffer))
}
