//! # Power management
//!
//! Two states, both implicit in the dispatcher:
//!
//! ```text
//!            drained set empty
//!   ┌────────┐ ───────────────► ┌───────────┐
//!   │ Active │                  │ Suspended │
//!   └────────┘ ◄─────────────── └───────────┘
//!               any interrupt
//! ```
//!
//! There is no separate "awaken" call for the application; leaving
//! `Suspended` is a side effect of any signal.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::hal::ProcessorControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerState {
    /// Foreground running
    Active = 0,
    /// Foreground waiting for an interrupt
    Suspended = 1,
}

impl From<u8> for PowerState {
    fn from(value: u8) -> Self {
        match value {
            1 => PowerState::Suspended,
            _ => PowerState::Active,
        }
    }
}

pub struct PowerManager {
    current_state: AtomicU8,
    suspend_count: AtomicU32,
}

impl PowerManager {
    pub const fn new() -> Self {
        Self {
            current_state: AtomicU8::new(PowerState::Active as u8),
            suspend_count: AtomicU32::new(0),
        }
    }

    pub fn state(&self) -> PowerState {
        PowerState::from(self.current_state.load(Ordering::Acquire))
    }

    /// Blocks the foreground until any interrupt fires.
    ///
    /// Must be entered with interrupts masked; the pending interrupt runs
    /// once the caller releases its critical section.
    pub fn suspend_until_event<P: ProcessorControl>(&self, cpu: &P) {
        self.current_state.store(PowerState::Suspended as u8, Ordering::Release);
        self.suspend_count.fetch_add(1, Ordering::Relaxed);

        cpu.wait_for_interrupt();

        self.current_state.store(PowerState::Active as u8, Ordering::Release);
    }

    /// Interrupt-side half of a wake-up.
    pub fn wake<P: ProcessorControl>(&self, cpu: &P) {
        self.current_state.store(PowerState::Active as u8, Ordering::Release);
        cpu.wake();
    }

    /// Number of low-power waits entered so far.
    pub fn suspend_count(&self) -> u32 {
        self.suspend_count.load(Ordering::Relaxed)
    }
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}
