//! # Peripheral driver traits
//!
//! The runtime only ever touches hardware through these traits, so a board
//! crate (or the mocks in [`crate::drivers::examples`]) supplies the concrete
//! register access.
//!
//! ## Trait hierarchy
//!
//! ```text
//! Device
//!    ├── GpioPin
//!    │      ├── InputPin
//!    │      │      └── EdgeInput   (edge-triggered interrupt flag)
//!    │      └── OutputPin
//!    ├── Uart          (byte-at-a-time, interrupt driven)
//!    └── CompareTimer  (free-running counter + compare channels)
//! ```
//!
//! All operations report failures as [`DeviceError`].

use crate::kernel::time::Ticks;

// ============================================================================
// Base device
// ============================================================================

/// Base device trait
///
/// # Example
///
/// ```rust,ignore
/// impl Device for Uca2 {
///     fn init(&mut self) -> Result<(), DeviceError> {
///         // hold the USCI in reset while it is configured
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "UCA2"
///     }
/// }
/// ```
pub trait Device {
    /// Brings the peripheral into a usable state.
    fn init(&mut self) -> Result<(), DeviceError>;

    /// Static name used in log records.
    fn name(&self) -> &'static str;

    fn is_ready(&self) -> bool {
        true
    }

    /// Returns the device to its initial state. Defaults to `init()`.
    fn reset(&mut self) -> Result<(), DeviceError> {
        self.init()
    }
}

// ============================================================================
// GPIO
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullMode {
    None,
    PullUp,
    PullDown,
}

/// Edge that raises a pin interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

pub trait GpioPin: Device {
    fn pin_number(&self) -> u8;

    fn set_mode(&mut self, mode: PinMode) -> Result<(), DeviceError>;

    fn mode(&self) -> PinMode;

    fn set_pull(&mut self, pull: PullMode) -> Result<(), DeviceError>;
}

pub trait InputPin: GpioPin {
    /// `true` when the pin reads high
    fn is_high(&self) -> Result<bool, DeviceError>;

    fn is_low(&self) -> Result<bool, DeviceError> {
        Ok(!self.is_high()?)
    }
}

pub trait OutputPin: GpioPin {
    fn set_high(&mut self) -> Result<(), DeviceError>;

    fn set_low(&mut self) -> Result<(), DeviceError>;

    fn set_state(&mut self, high: bool) -> Result<(), DeviceError> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}

/// Input pin with an edge-triggered interrupt.
///
/// The flag is latched by hardware and stays pending until
/// [`EdgeInput::clear_edge`] is called.
pub trait EdgeInput: InputPin {
    /// Selects the interrupting edge.
    fn set_edge(&mut self, edge: Edge) -> Result<(), DeviceError>;

    /// Clears any latched edge and enables the pin interrupt.
    fn listen(&mut self) -> Result<(), DeviceError>;

    fn unlisten(&mut self) -> Result<(), DeviceError>;

    fn edge_pending(&self) -> bool;

    fn clear_edge(&mut self);
}

// ============================================================================
// Serial
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct SerialConfig {
    pub baudrate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven = 7,
    Eight = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Interrupt-driven UART, one byte per interrupt.
pub trait Uart: Device {
    fn configure(&mut self, config: SerialConfig) -> Result<(), DeviceError>;

    /// Takes the received byte if the receive flag is set.
    ///
    /// Returns `None` for a spurious vector (flag not set).
    fn take_rx_byte(&mut self) -> Option<u8>;

    /// Loads the transmit register.
    fn write_byte(&mut self, byte: u8) -> Result<(), DeviceError>;

    /// Clears latched receive and transmit interrupt flags.
    fn clear_interrupts(&mut self);

    fn enable_rx_interrupt(&mut self);
}

// ============================================================================
// Timer
// ============================================================================

/// Compare channels of the link timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    /// Periodic application tick
    Tick = 0,
    /// Serial link watchdog
    Watchdog = 1,
}

impl Channel {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Free-running counter with compare-match interrupts.
///
/// The counter wraps at `Ticks::MAX`; deadlines are compared for equality the
/// way a hardware capture/compare unit does.
pub trait CompareTimer: Device {
    /// Starts the counter in continuous mode.
    fn start(&mut self) -> Result<(), DeviceError>;

    fn now(&self) -> Ticks;

    fn set_compare(&mut self, channel: Channel, at: Ticks);

    fn compare(&self, channel: Channel) -> Ticks;

    fn enable_compare(&mut self, channel: Channel);

    fn disable_compare(&mut self, channel: Channel);

    fn is_compare_enabled(&self, channel: Channel) -> bool;
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    NotInitialized,
    Busy,
    InvalidParameter,
    BufferOverflow,
}
