// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt::Write;

/// Formats a byte slice as space-separated hex for debug logs.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for b in bytes {
        write!(&mut out, "{b:02x} ").expect("Writing to String cannot fail");
    }
    out.pop();
    out
}

/// Renders minutes-since-midnight as `hh:mm`.
pub fn minutes_str(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
