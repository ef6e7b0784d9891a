// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use tokio::{select, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::{hass, ipc::EgressTx};

/// Publishes the Home-Assistant discovery configs at boot and then on a
/// fixed cadence, so a restarted broker relearns the devices. Set topics
/// are subscribed once.
pub async fn announce_task(
    board: String,
    egress: EgressTx,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut first_time = true;
    loop {
        hass::announce(&board, first_time, &egress);
        first_time = false;

        select! {
            _ = cancel.cancelled() => return,
            _ = sleep(period) => {},
        }
    }
}
