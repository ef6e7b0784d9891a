// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Half-duplex byte I/O over the RS-485 attachment.
//!
//! The UART (or serial bridge) itself lives behind [`Transceiver`]; the
//! [`Link`] adds the half-duplex discipline on top: timeout-bounded reads,
//! the transmit-enable toggle with its one-character-time guard, and the
//! bounded queue of frames waiting for a transmit opportunity.

use std::{io, time::Duration};

use anyhow::Result;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
    time::{Instant, sleep, timeout_at},
};
use tracing::warn;

use crate::{
    cfg::{config::Config, enums::RtsMode},
    datalink::pkt::DatalinkPkt,
};

/// One character time at 9600 8N1 is ~1.04 ms; the guard rounds up so the
/// last byte has fully left the shifter before the driver is disabled.
const TX_GUARD: Duration = Duration::from_micros(1500);

/// Byte-level access to the RS-485 transceiver.
///
/// Anything that reads and writes bytes qualifies; direction control is a
/// no-op for auto-direction hardware and serial bridges.
pub trait Transceiver: Send {
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;
    fn write_all(&mut self, buf: &[u8]) -> impl Future<Output = io::Result<()>> + Send;
    fn flush(&mut self) -> impl Future<Output = io::Result<()>> + Send;
    fn set_tx_enable(&mut self, _on: bool) -> impl Future<Output = io::Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Any async byte stream works as a transceiver (TCP serial bridges, the
/// in-memory duplex used by tests). Hardware with a driver-controlled DE
/// line implements the trait directly and overrides `set_tx_enable`.
impl<T> Transceiver for T
where T: AsyncRead + AsyncWrite + Unpin + Send
{
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        AsyncReadExt::read(self, buf).await
    }

    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        AsyncWriteExt::write_all(self, buf).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        AsyncWriteExt::flush(self).await
    }
}

/// Connects to a TCP-attached transceiver (ser2net style bridge).
pub async fn connect_bridge(cfg: &Config) -> Result<TcpStream> {
    let stream = TcpStream::connect(&cfg.link.bridge_address).await?;
    stream.set_nodelay(true)?;
    Ok(stream)
}

/// Producer handle onto the Link's outbound frame queue.
///
/// The queue is the only way into the wire for any task other than the one
/// owning the Link. It is FIFO and bounded: a full queue drops the newcomer
/// (the bus re-broadcasts state soon enough for a retry to be pointless).
#[derive(Debug, Clone)]
pub struct TxQueue {
    tx: mpsc::Sender<DatalinkPkt>,
}

impl TxQueue {
    /// Queues a frame for the next transmit opportunity, taking ownership
    /// of its buffer until dequeued.
    pub fn queue(&self, pkt: DatalinkPkt) {
        if let Err(mpsc::error::TrySendError::Full(pkt)) = self.tx.try_send(pkt) {
            warn!(prot_typ = pkt.prot_typ, "tx queue full, dropping frame");
        }
    }
}

pub struct Link<T> {
    io: T,
    read_timeout: Duration,
    tx_done_timeout: Duration,
    rts_mode: RtsMode,
    tx_q: TxQueue,
    tx_q_rx: mpsc::Receiver<DatalinkPkt>,
}

impl<T: Transceiver> Link<T> {
    pub fn new(io: T, cfg: &Config) -> Self {
        let (tx, rx) = mpsc::channel(cfg.link.tx_queue_depth);
        Self {
            io,
            read_timeout: cfg.read_timeout(),
            tx_done_timeout: cfg.tx_done_timeout(),
            rts_mode: cfg.link.rts_mode,
            tx_q: TxQueue { tx },
            tx_q_rx: rx,
        }
    }

    #[inline]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// A producer handle for other tasks to queue outbound frames.
    pub fn tx_queue(&self) -> TxQueue {
        self.tx_q.clone()
    }

    /// Reads up to `dst.len()` bytes, blocking at most the configured read
    /// timeout. Returns how many bytes were placed; 0 means the budget
    /// expired with nothing received.
    pub async fn read_bytes(&mut self, dst: &mut [u8]) -> Result<usize> {
        let deadline = Instant::now() + self.read_timeout;
        let mut filled = 0;
        while filled < dst.len() {
            match timeout_at(deadline, self.io.read(&mut dst[filled..])).await {
                Ok(Ok(0)) => break, // transceiver gone; surfaced by the next write
                Ok(Ok(n)) => filled += n,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => break,
            }
        }
        Ok(filled)
    }

    /// Pushes bytes into the transceiver's TX FIFO.
    pub async fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.io.write_all(src).await?;
        Ok(())
    }

    /// Toggles transmit direction. Disabling flushes the TX FIFO and waits
    /// one character time so the final byte clears the wire before the
    /// driver lets go of the bus.
    pub async fn set_tx_mode(&mut self, enable: bool) -> Result<()> {
        if enable {
            if self.rts_mode.is_driver() {
                self.io.set_tx_enable(true).await?;
            }
        } else {
            match timeout_at(Instant::now() + self.tx_done_timeout, self.io.flush()).await {
                Ok(res) => res?,
                Err(_) => warn!("tx flush did not finish within budget"),
            }
            sleep(TX_GUARD).await;
            if self.rts_mode.is_driver() {
                self.io.set_tx_enable(false).await?;
            }
        }
        Ok(())
    }

    /// Takes the oldest queued frame, transferring buffer ownership to the
    /// caller.
    pub fn dequeue(&mut self) -> Option<DatalinkPkt> {
        self.tx_q_rx.try_recv().ok()
    }
}
