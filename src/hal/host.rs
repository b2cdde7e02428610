//! Host-side processor used by tests and simulation.
//!
//! There is nothing to wait for on the host: `wait_for_interrupt` returns at
//! once and only counts, so a test drives the foreground one
//! `drain_and_dispatch` cycle at a time.

use core::sync::atomic::{AtomicUsize, Ordering};

use crate::hal::traits::ProcessorControl;

pub struct HostCpu {
    waits: AtomicUsize,
    wakes: AtomicUsize,
}

impl HostCpu {
    pub const fn new() -> Self {
        Self {
            waits: AtomicUsize::new(0),
            wakes: AtomicUsize::new(0),
        }
    }

    pub fn wait_count(&self) -> usize {
        self.waits.load(Ordering::Relaxed)
    }

    pub fn wake_count(&self) -> usize {
        self.wakes.load(Ordering::Relaxed)
    }
}

impl Default for HostCpu {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorControl for HostCpu {
    fn wait_for_interrupt(&self) {
        self.waits.fetch_add(1, Ordering::Relaxed);
        core::hint::spin_loop();
    }

    fn wake(&self) {
        self.wakes.fetch_add(1, Ordering::Relaxed);
    }
}
