// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use serde::{Deserialize, Serialize};

/// Who drives the RS-485 transmit-enable (DE/RE*) line.
///
/// Serial bridges and auto-direction transceivers flip the line themselves;
/// a directly attached UART needs the driver to raise it around each write.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RtsMode {
    #[default]
    #[serde(rename = "Auto", alias = "auto", alias = "AUTO")]
    Auto,
    #[serde(rename = "Driver", alias = "driver", alias = "DRIVER")]
    Driver,
}

impl fmt::Display for RtsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RtsMode::Auto => "Auto",
            RtsMode::Driver => "Driver",
        })
    }
}

impl RtsMode {
    pub fn is_driver(self) -> bool {
        matches!(self, RtsMode::Driver)
    }
}
