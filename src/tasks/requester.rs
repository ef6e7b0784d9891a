// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use tokio::{select, time::sleep};
use tokio_util::sync::CancellationToken;

use crate::{link::TxQueue, network::msg::MsgKind, tasks::queue_req};

/// Periodically asks the controller for the state that is not broadcast on
/// its own: heat settings and schedules.
pub async fn requester_task(tx_q: TxQueue, period: Duration, cancel: CancellationToken) {
    loop {
        queue_req(&tx_q, MsgKind::CtrlHeatReq);
        queue_req(&tx_q, MsgKind::CtrlSchedReq);

        select! {
            _ = cancel.cancelled() => return,
            _ = sleep(period) => {},
        }
    }
}
