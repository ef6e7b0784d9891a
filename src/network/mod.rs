// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Network layer: maps framed datalink packets to typed messages and back.

pub mod msg;
pub mod rx;
pub mod tx;

pub use msg::{MsgKind, NetworkMsg};
pub use rx::{Decoded, rx_msg};
pub use tx::create_pkt;
