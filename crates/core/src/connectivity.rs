// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! [`ConnectivityMonitor`] holds the current online/offline state and emits
//! exactly one [`Transition`] per edge. The platform signal feeds it through
//! [`ConnectivityMonitor::set_online`]; on hosts without such a signal,
//! [`poll_reachability`] derives one from a [`ReachabilityProbe`].

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the transition channel before slow subscribers lag.
const TRANSITION_CAPACITY: usize = 64;

/// An edge in the connectivity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentOnline,
    WentOffline,
}

impl Transition {
    /// Returns the state after this transition.
    pub fn is_online(self) -> bool {
        matches!(self, Transition::WentOnline)
    }
}

/// Current online state plus change notification.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    online: AtomicBool,
    transitions: broadcast::Sender<Transition>,
}

impl ConnectivityMonitor {
    /// Creates a monitor from the platform's initial reachability reading.
    ///
    /// `None` means the environment has no connectivity signal; the monitor
    /// then assumes it is online.
    pub fn new(initial: Option<bool>) -> Self {
        let online = initial.unwrap_or_else(|| {
            tracing::debug!("no connectivity signal available, assuming online");
            true
        });
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        ConnectivityMonitor {
            online: AtomicBool::new(online),
            transitions,
        }
    }

    /// Returns the current state.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Records a reading from the platform signal.
    ///
    /// Returns true if the reading was an edge (and a transition was emitted).
    pub fn set_online(&self, online: bool) -> bool {
        let previous = self.online.swap(online, Ordering::AcqRel);
        if previous == online {
            return false;
        }

        let transition = if online {
            tracing::info!("connectivity: online");
            Transition::WentOnline
        } else {
            tracing::info!("connectivity: offline");
            Transition::WentOffline
        };
        // No subscribers is fine.
        let _ = self.transitions.send(transition);
        true
    }

    /// Subscribes to future transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<Transition> {
        self.transitions.subscribe()
    }

    /// Invokes `callback` once per transition until the monitor is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_change<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn(Transition) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(transition) => callback(transition),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "connectivity listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(None)
    }
}

/// A source of reachability readings.
pub trait ReachabilityProbe: Send + Sync {
    /// Returns true if the remote side currently looks reachable.
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Probes reachability by opening a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    /// Creates a probe for `addr` (`host:port`).
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        TcpProbe {
            addr: addr.into(),
            timeout,
        }
    }
}

impl ReachabilityProbe for TcpProbe {
    fn probe(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            let connect = TcpStream::connect(self.addr.as_str());
            matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)))
        })
    }
}

/// Settings for [`poll_reachability`].
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between probes.
    pub interval: Duration,
    /// Consecutive disagreeing readings required before the monitor flips.
    pub debounce_samples: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: Duration::from_secs(5),
            debounce_samples: 2,
        }
    }
}

/// Feeds probe readings into `monitor` until `cancel` fires.
///
/// A flip is applied only after `debounce_samples` consecutive readings
/// disagree with the current state, so a flapping link does not produce a
/// burst of transitions.
pub async fn poll_reachability<P: ReachabilityProbe>(
    monitor: Arc<ConnectivityMonitor>,
    probe: P,
    config: PollConfig,
    cancel: CancellationToken,
) {
    let required = config.debounce_samples.max(1);
    let mut streak = 0u32;

    loop {
        let reading = tokio::select! {
            _ = cancel.cancelled() => return,
            reading = probe.probe() => reading,
        };

        if reading == monitor.is_online() {
            streak = 0;
        } else {
            streak += 1;
            tracing::debug!(reading, streak, required, "reachability disagrees with monitor");
            if streak >= required {
                monitor.set_online(reading);
                streak = 0;
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
