// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wall clock sources for enqueue and creation timestamps.
//!
//! Timestamps handed out by [`MonotonicClock`] never go backwards, even if
//! the underlying wall clock does, so queue order and timestamp order agree.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, TimeZone, Utc};

/// Trait for getting the current wall clock time.
///
/// This allows injecting a manual clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock reading `now_ms`.
    pub fn new(now_ms: u64) -> Self {
        ManualClock { now_ms: AtomicU64::new(now_ms) }
    }

    /// Sets the current reading.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Moves the reading forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl ClockSource for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Wraps a clock source so successive readings are non-decreasing.
pub struct MonotonicClock<C: ClockSource = SystemClock> {
    clock: C,
    last_ms: Mutex<u64>,
}

impl MonotonicClock<SystemClock> {
    /// Creates a monotonic clock over the system clock.
    pub fn system() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: ClockSource> MonotonicClock<C> {
    /// Creates a monotonic clock over a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        MonotonicClock { clock, last_ms: Mutex::new(0) }
    }
}

impl<C: ClockSource> ClockSource for MonotonicClock<C> {
    fn now_ms(&self) -> u64 {
        let physical = self.clock.now_ms();
        let mut last = self.last_ms.lock().unwrap_or_else(|e| e.into_inner());
        if physical > *last {
            *last = physical;
        }
        *last
    }
}

impl<C: ClockSource + ?Sized> ClockSource for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Converts epoch milliseconds into a UTC timestamp.
///
/// Out-of-range values clamp to the Unix epoch.
pub fn to_datetime(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
