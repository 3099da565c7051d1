//! Client heartbeat watchdog.
//!
//! The browser client pings `/api/heartbeat` while it is open. Once the first
//! heartbeat has arrived, going `timeout` without another one ends the watch
//! so the controller can shut the process down. Before the first heartbeat
//! the watchdog never fires.

use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

/// Sending half, held by the HTTP state
#[derive(Clone)]
pub struct Heartbeat {
    tx: AsyncSender<()>,
}

impl Heartbeat {
    /// Never blocks; a beat already waiting in the channel is enough
    pub fn beat(&self) {
        if let Err(e) = self.tx.try_send(()) {
            tracing::debug!("Heartbeat not delivered: {}", e);
        }
    }
}

pub struct Watchdog {
    rx: AsyncReceiver<()>,
    timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogExit {
    /// Heartbeats stopped after the client had connected
    Expired,
    Cancelled,
    /// Every `Heartbeat` was dropped
    Closed,
}

pub fn channel(timeout: Duration) -> (Heartbeat, Watchdog) {
    let (tx, rx) = kanal::bounded_async(1);
    (Heartbeat { tx }, Watchdog { rx, timeout })
}

impl Watchdog {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(self, cancel: CancellationToken) -> WatchdogExit {
        tokio::select! {
            _ = cancel.cancelled() => return WatchdogExit::Cancelled,
            result = self.rx.recv() => {
                if result.is_err() {
                    return WatchdogExit::Closed;
                }
            }
        }
        tracing::info!("First heartbeat received. Watchdog armed ({:?})", self.timeout);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return WatchdogExit::Cancelled,
                result = tokio::time::timeout(self.timeout, self.rx.recv()) => match result {
                    Ok(Ok(())) => continue,
                    Ok(Err(_)) => return WatchdogExit::Closed,
                    Err(_) => return WatchdogExit::Expired,
                },
            }
        }
    }
}
