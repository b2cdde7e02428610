//! Simulated wall clock and busy-wait delay.
//!
//! A [`MockDelay`] does not sleep; it moves its [`SimClock`] forward, so
//! pins created with [`MockGpio::with_clock`](super::MockGpio::with_clock)
//! see scheduled input changes land in the middle of a delay.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::hal::DelayMs;

/// Milliseconds of simulated time
pub struct SimClock {
    now_ms: AtomicU32,
}

impl SimClock {
    pub const fn new() -> Self {
        Self {
            now_ms: AtomicU32::new(0),
        }
    }

    pub fn now_ms(&self) -> u32 {
        self.now_ms.load(Ordering::Acquire)
    }

    pub fn advance_ms(&self, ms: u32) {
        self.now_ms.fetch_add(ms, Ordering::AcqRel);
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MockDelay {
    clock: &'static SimClock,
    calls: AtomicU32,
    total_ms: AtomicU32,
}

impl MockDelay {
    pub const fn new(clock: &'static SimClock) -> Self {
        Self {
            clock,
            calls: AtomicU32::new(0),
            total_ms: AtomicU32::new(0),
        }
    }

    pub fn clock(&self) -> &'static SimClock {
        self.clock
    }

    /// Sum of every delay requested.
    pub fn total_ms(&self) -> u32 {
        self.total_ms.load(Ordering::Acquire)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::Acquire)
    }
}

impl DelayMs for MockDelay {
    fn delay_ms(&self, ms: u16) {
        self.calls.fetch_add(1, Ordering::AcqRel);
        self.total_ms.fetch_add(ms as u32, Ordering::AcqRel);
        self.clock.advance_ms(ms as u32);
    }
}
