//! # Mock GPIO
//!
//! Simulated pin for tests and host builds.
//!
//! - Implements `Device`, `GpioPin`, `InputPin`, `OutputPin` and `EdgeInput`
//! - Pull-up and pull-down drive the simulated input level
//! - `mock_edge()` latches an edge the way the hardware flag would
//! - With a [`SimClock`] attached, input changes can be scheduled ahead
//!
//! ```rust
//! use radiolink_rt::drivers::examples::MockGpio;
//! use radiolink_rt::drivers::{Device, GpioPin, OutputPin, PinMode};
//!
//! let mut led = MockGpio::new(0);
//! led.init().unwrap();
//! led.set_mode(PinMode::Output).unwrap();
//! led.set_high().unwrap();
//! assert!(led.mock_get_output());
//! ```

use super::SimClock;
use crate::drivers::{
    Device, DeviceError, Edge, EdgeInput, GpioPin, InputPin, OutputPin, PinMode, PullMode,
};

pub struct MockGpio {
    pin: u8,
    mode: PinMode,
    pull: PullMode,
    edge: Edge,
    /// Output latch
    state: bool,
    /// Externally driven level
    input_state: bool,
    /// Pending input change: (absolute ms, level)
    scheduled: Option<(u32, bool)>,
    clock: Option<&'static SimClock>,
    edge_flag: bool,
    listening: bool,
    initialized: bool,
    low_count: usize,
}

impl MockGpio {
    /// Creates an unconfigured pin. Every operation fails with
    /// `NotInitialized` until `init()`.
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            mode: PinMode::Input,
            pull: PullMode::None,
            edge: Edge::Falling,
            state: false,
            input_state: false,
            scheduled: None,
            clock: None,
            edge_flag: false,
            listening: false,
            initialized: false,
            low_count: 0,
        }
    }

    /// Pin whose scheduled input changes follow `clock`.
    pub const fn with_clock(pin: u8, clock: &'static SimClock) -> Self {
        let mut gpio = Self::new(pin);
        gpio.clock = Some(clock);
        gpio
    }

    /// Drives the input level now, dropping any scheduled change.
    pub fn mock_set_input(&mut self, high: bool) {
        self.input_state = high;
        self.scheduled = None;
    }

    /// Changes the input level `after_ms` from now on the attached clock.
    ///
    /// Without a clock the change applies immediately.
    pub fn mock_schedule_input(&mut self, after_ms: u32, high: bool) {
        match self.clock {
            Some(clock) => self.scheduled = Some((clock.now_ms() + after_ms, high)),
            None => self.mock_set_input(high),
        }
    }

    /// Simulates the configured edge: moves the input to the post-edge
    /// level and latches the flag if the interrupt is enabled.
    pub fn mock_edge(&mut self) {
        self.mock_set_input(matches!(self.edge, Edge::Rising));
        if self.listening {
            self.edge_flag = true;
        }
    }

    pub fn mock_get_output(&self) -> bool {
        self.state
    }

    /// Number of high-to-low transitions written to the output latch.
    pub fn low_count(&self) -> usize {
        self.low_count
    }

    pub fn pull(&self) -> PullMode {
        self.pull
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn listening(&self) -> bool {
        self.listening
    }

    fn input_level(&self) -> bool {
        match (self.scheduled, self.clock) {
            (Some((at, level)), Some(clock)) if clock.now_ms() >= at => level,
            _ => self.input_state,
        }
    }

    fn check_init(&self) -> Result<(), DeviceError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DeviceError::NotInitialized)
        }
    }

    fn check_output(&self) -> Result<(), DeviceError> {
        self.check_init()?;
        if !matches!(self.mode, PinMode::Output) {
            return Err(DeviceError::InvalidParameter);
        }
        Ok(())
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Device for MockGpio {
    fn init(&mut self) -> Result<(), DeviceError> {
        self.mode = PinMode::Input;
        self.pull = PullMode::None;
        self.state = false;
        self.input_state = false;
        self.scheduled = None;
        self.edge_flag = false;
        self.listening = false;
        self.low_count = 0;
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MockGPIO"
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}

impl GpioPin for MockGpio {
    fn pin_number(&self) -> u8 {
        self.pin
    }

    fn set_mode(&mut self, mode: PinMode) -> Result<(), DeviceError> {
        self.check_init()?;
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> PinMode {
        self.mode
    }

    fn set_pull(&mut self, pull: PullMode) -> Result<(), DeviceError> {
        self.check_init()?;
        self.pull = pull;

        if matches!(self.mode, PinMode::Input) {
            match pull {
                PullMode::PullUp => self.input_state = true,
                PullMode::PullDown => self.input_state = false,
                PullMode::None => {}
            }
        }
        Ok(())
    }
}

impl InputPin for MockGpio {
    fn is_high(&self) -> Result<bool, DeviceError> {
        self.check_init()?;
        match self.mode {
            PinMode::Input => Ok(self.input_level()),
            // read back the latch
            PinMode::Output => Ok(self.state),
        }
    }
}

impl OutputPin for MockGpio {
    fn set_high(&mut self) -> Result<(), DeviceError> {
        self.check_output()?;
        self.state = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), DeviceError> {
        self.check_output()?;
        if self.state {
            self.low_count += 1;
        }
        self.state = false;
        Ok(())
    }
}

impl EdgeInput for MockGpio {
    fn set_edge(&mut self, edge: Edge) -> Result<(), DeviceError> {
        self.check_init()?;
        self.edge = edge;
        Ok(())
    }

    fn listen(&mut self) -> Result<(), DeviceError> {
        self.check_init()?;
        self.edge_flag = false;
        self.listening = true;
        Ok(())
    }

    fn unlisten(&mut self) -> Result<(), DeviceError> {
        self.check_init()?;
        self.listening = false;
        Ok(())
    }

    fn edge_pending(&self) -> bool {
        self.edge_flag
    }

    fn clear_edge(&mut self) {
        self.edge_flag = false;
    }
}
