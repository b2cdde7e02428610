//! Flow-control lines between the host MCU and the radio coprocessor.
//!
//! ```text
//!   MCU                         coprocessor
//!   rx ack  (output)  ───────►  CTS   "send me the next byte"
//!   tx ack  (edge in) ◄───────  RTS   "ready for your next byte"
//! ```

use crate::drivers::{DeviceError, Edge, EdgeInput, OutputPin, PinMode, PullMode};

/// State of the inbound acknowledge line
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RxState {
    /// Line deasserted: the peer must not send
    Idle,
    /// Line asserted: the peer may send one byte
    AckAsserted,
}

/// Inbound acknowledge line, driven by this side.
pub struct AckLine<P> {
    pin: P,
    state: RxState,
    pulses: u32,
}

impl<P: OutputPin> AckLine<P> {
    pub const fn new(pin: P) -> Self {
        Self {
            pin,
            state: RxState::Idle,
            pulses: 0,
        }
    }

    pub fn configure(&mut self) -> Result<(), DeviceError> {
        self.pin.init()?;
        self.pin.set_mode(PinMode::Output)
    }

    pub fn assert(&mut self) -> Result<(), DeviceError> {
        self.pin.set_high()?;
        self.state = RxState::AckAsserted;
        Ok(())
    }

    pub fn deassert(&mut self) -> Result<(), DeviceError> {
        self.pin.set_low()?;
        self.state = RxState::Idle;
        Ok(())
    }

    /// Deassert-then-reassert: "consumed one byte, send the next".
    pub fn pulse(&mut self) -> Result<(), DeviceError> {
        self.deassert()?;
        self.assert()?;
        self.pulses = self.pulses.wrapping_add(1);
        Ok(())
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }
}

/// Outbound acknowledge line, driven by the peer and observed by edge.
pub struct PeerAckLine<E> {
    pin: E,
}

impl<E: EdgeInput> PeerAckLine<E> {
    pub const fn new(pin: E) -> Self {
        Self { pin }
    }

    /// Input, falling edge, interrupt enabled.
    pub fn configure(&mut self) -> Result<(), DeviceError> {
        self.pin.init()?;
        self.pin.set_mode(PinMode::Input)?;
        self.pin.set_pull(PullMode::None)?;
        self.pin.set_edge(Edge::Falling)?;
        self.pin.listen()
    }

    pub fn edge_pending(&self) -> bool {
        self.pin.edge_pending()
    }

    pub fn clear_edge(&mut self) {
        self.pin.clear_edge();
    }

    pub fn pin(&self) -> &E {
        &self.pin
    }

    pub fn pin_mut(&mut self) -> &mut E {
        &mut self.pin
    }
}
