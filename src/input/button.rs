//! Push-button debounce.
//!
//! The falling-edge interrupt only signals `EventSource::Button`. The
//! foreground handler then waits a settle delay and re-samples the pin; the
//! press counts only if the button is still held. Glitches shorter than the
//! settle delay are dropped, at the price of that delay on every real press.

use crate::drivers::{DeviceError, Edge, EdgeInput, PinMode, PullMode};
use crate::hal::DelayMs;

/// Configures an active-low button: input, pull-up, falling edge.
///
/// Edge detection is left disabled; call `listen` once the input has had
/// time to settle.
pub fn configure<B: EdgeInput>(pin: &mut B) -> Result<(), DeviceError> {
    pin.init()?;
    pin.set_mode(PinMode::Input)?;
    pin.set_pull(PullMode::PullUp)?;
    pin.set_edge(Edge::Falling)
}

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    settle_ms: u16,
}

impl Debouncer {
    pub const fn new(settle_ms: u16) -> Self {
        Self { settle_ms }
    }

    pub fn settle_ms(&self) -> u16 {
        self.settle_ms
    }

    /// Waits the settle delay, then asks `still_pressed`.
    ///
    /// A failed sample counts as released.
    pub fn confirm<D, S>(&self, delay: &D, still_pressed: S) -> bool
    where
        D: DelayMs + ?Sized,
        S: FnOnce() -> Result<bool, DeviceError>,
    {
        delay.delay_ms(self.settle_ms);
        still_pressed().unwrap_or(false)
    }
}
