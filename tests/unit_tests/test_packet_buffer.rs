// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use pool_bridge_rs::datalink::buffer::PacketBuffer;

#[test]
fn test_alloc_is_empty() {
    let buf = PacketBuffer::alloc(16);
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
    assert_eq!(buf.as_slice(), &[] as &[u8]);
}

#[test]
fn test_put_then_push_builds_frame_back_to_front() {
    // the TX pattern: reserve headroom, place payload, prepend header
    let mut buf = PacketBuffer::alloc(16);
    buf.reserve(4);

    let payload = buf.put(3);
    buf.region_mut(&payload).copy_from_slice(&[0x11, 0x22, 0x33]);
    assert_eq!(buf.len(), 3);

    let head = buf.push(4);
    buf.region_mut(&head).copy_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
    assert_eq!(buf.len(), 7);
    assert_eq!(buf.as_slice(), &[0xAA, 0xBB, 0xCC, 0xDD, 0x11, 0x22, 0x33]);
}

#[test]
fn test_pull_strips_consumed_header() {
    let mut buf = PacketBuffer::alloc(8);
    let all = buf.put(5);
    buf.region_mut(&all).copy_from_slice(&[1, 2, 3, 4, 5]);

    let rest = buf.pull(2);
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.region(&rest), &[3, 4, 5]);
    assert_eq!(buf.as_slice(), &[3, 4, 5]);
}

#[test]
fn test_unput_reclaims_tail_bytes() {
    // the RX pattern: put the maximum head, then shrink to the actual size
    let mut buf = PacketBuffer::alloc(16);
    let head = buf.put(9);
    assert_eq!(head, 0..9);
    buf.unput(4);
    assert_eq!(buf.len(), 5);

    let data = buf.put(2);
    assert_eq!(data, 5..7);
}

#[test]
fn test_reset_restores_alloc_state() {
    let mut buf = PacketBuffer::alloc(16);
    buf.reserve(4);
    buf.put(5);
    buf.reset();
    assert_eq!(buf.len(), 0);
    assert_eq!(buf.data_offset(), 0);

    // reserve is legal again after reset
    buf.reserve(2);
    let r = buf.put(1);
    assert_eq!(r, 2..3);
}

#[test]
#[should_panic(expected = "put() past end")]
fn test_put_past_end_panics() {
    let mut buf = PacketBuffer::alloc(4);
    buf.put(5);
}

#[test]
#[should_panic(expected = "push() past head")]
fn test_push_without_headroom_panics() {
    let mut buf = PacketBuffer::alloc(8);
    buf.reserve(2);
    buf.push(3);
}

#[test]
#[should_panic(expected = "pull() past tail")]
fn test_pull_past_tail_panics() {
    let mut buf = PacketBuffer::alloc(8);
    buf.put(2);
    buf.pull(3);
}

#[test]
#[should_panic(expected = "reserve() is only legal on an empty buffer")]
fn test_reserve_after_put_panics() {
    let mut buf = PacketBuffer::alloc(8);
    buf.put(1);
    buf.reserve(2);
}
