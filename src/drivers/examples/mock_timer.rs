//! # Mock compare timer
//!
//! A 16-bit free-running counter with one compare register per
//! [`Channel`]. Time only moves when the test steps it, and each step
//! reports which enabled channels matched, standing in for the compare
//! interrupt flags.
//!
//! ```rust
//! use radiolink_rt::drivers::examples::MockTimer;
//! use radiolink_rt::drivers::{Channel, CompareTimer, Device};
//!
//! let mut timer = MockTimer::new();
//! timer.init().unwrap();
//! timer.start().unwrap();
//! timer.set_compare(Channel::Tick, 10);
//! timer.enable_compare(Channel::Tick);
//!
//! assert_eq!(timer.mock_advance(10), Channel::Tick.mask());
//! ```

use crate::drivers::{Channel, CompareTimer, Device, DeviceError};
use crate::kernel::time::Ticks;

pub struct MockTimer {
    counter: Ticks,
    compare: [Ticks; Channel::COUNT],
    enabled: [bool; Channel::COUNT],
    running: bool,
    initialized: bool,
}

const CHANNELS: [Channel; Channel::COUNT] = [Channel::Tick, Channel::Watchdog];

impl MockTimer {
    pub const fn new() -> Self {
        Self {
            counter: 0,
            compare: [0; Channel::COUNT],
            enabled: [false; Channel::COUNT],
            running: false,
            initialized: false,
        }
    }

    /// Advances the counter by one tick.
    ///
    /// Returns the mask of enabled channels whose compare value equals the
    /// new count. A stopped timer does not move and reports nothing.
    pub fn mock_step(&mut self) -> u8 {
        if !self.running {
            return 0;
        }
        self.counter = self.counter.wrapping_add(1);

        CHANNELS
            .iter()
            .filter(|ch| self.enabled[ch.index()] && self.compare[ch.index()] == self.counter)
            .fold(0, |mask, ch| mask | ch.mask())
    }

    /// Steps `ticks` times; returns every channel that matched on the way.
    pub fn mock_advance(&mut self, ticks: u32) -> u8 {
        (0..ticks).fold(0, |mask, _| mask | self.mock_step())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for MockTimer {
    fn init(&mut self) -> Result<(), DeviceError> {
        *self = Self::new();
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MockTimer"
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}

impl CompareTimer for MockTimer {
    fn start(&mut self) -> Result<(), DeviceError> {
        if !self.initialized {
            return Err(DeviceError::NotInitialized);
        }
        self.running = true;
        Ok(())
    }

    fn now(&self) -> Ticks {
        self.counter
    }

    fn set_compare(&mut self, channel: Channel, at: Ticks) {
        self.compare[channel.index()] = at;
    }

    fn compare(&self, channel: Channel) -> Ticks {
        self.compare[channel.index()]
    }

    fn enable_compare(&mut self, channel: Channel) {
        self.enabled[channel.index()] = true;
    }

    fn disable_compare(&mut self, channel: Channel) {
        self.enabled[channel.index()] = false;
    }

    fn is_compare_enabled(&self, channel: Channel) -> bool {
        self.enabled[channel.index()]
    }
}
