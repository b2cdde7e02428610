//! # Mock UART
//!
//! Simulated byte-at-a-time UART.
//!
//! - Inbound bytes queued with `mock_receive_byte()` are returned one per
//!   `take_rx_byte()`, like a receive register refilled by the line
//! - Written bytes are captured for inspection
//! - Writes can be forced to fail with `mock_fail_writes()`
//!
//! ```rust
//! use radiolink_rt::drivers::examples::MockUart;
//! use radiolink_rt::drivers::{Device, Uart};
//!
//! let mut uart = MockUart::new();
//! uart.init().unwrap();
//! uart.write_byte(0x55).unwrap();
//! assert_eq!(uart.mock_get_transmitted(), &[0x55]);
//! ```

use heapless::{Deque, Vec};

use crate::drivers::{DataBits, Device, DeviceError, Parity, SerialConfig, StopBits, Uart};

const BUFFER_SIZE: usize = 256;

pub struct MockUart {
    config: SerialConfig,
    rx_buffer: Deque<u8, BUFFER_SIZE>,
    tx_buffer: Vec<u8, BUFFER_SIZE>,
    initialized: bool,
    fail_writes: bool,
    rx_interrupt_enabled: bool,
    interrupt_clears: usize,
}

impl MockUart {
    pub const fn new() -> Self {
        Self {
            config: SerialConfig {
                baudrate: 115200,
                data_bits: DataBits::Eight,
                stop_bits: StopBits::One,
                parity: Parity::None,
            },
            rx_buffer: Deque::new(),
            tx_buffer: Vec::new(),
            initialized: false,
            fail_writes: false,
            rx_interrupt_enabled: false,
            interrupt_clears: 0,
        }
    }

    /// Queues one byte as if it arrived on the line.
    pub fn mock_receive_byte(&mut self, byte: u8) -> Result<(), DeviceError> {
        self.rx_buffer
            .push_back(byte)
            .map_err(|_| DeviceError::BufferOverflow)
    }

    /// Every byte written since `init()`, in order.
    pub fn mock_get_transmitted(&self) -> &[u8] {
        &self.tx_buffer
    }

    /// Makes subsequent writes fail with `Busy`.
    pub fn mock_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn rx_available(&self) -> usize {
        self.rx_buffer.len()
    }

    pub fn rx_interrupt_enabled(&self) -> bool {
        self.rx_interrupt_enabled
    }

    /// How many times `clear_interrupts()` ran.
    pub fn interrupt_clears(&self) -> usize {
        self.interrupt_clears
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

impl Default for MockUart {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for MockUart {
    fn init(&mut self) -> Result<(), DeviceError> {
        self.rx_buffer.clear();
        self.tx_buffer.clear();
        self.rx_interrupt_enabled = false;
        self.interrupt_clears = 0;
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MockUART"
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}

impl Uart for MockUart {
    fn configure(&mut self, config: SerialConfig) -> Result<(), DeviceError> {
        if !self.initialized {
            return Err(DeviceError::NotInitialized);
        }
        if config.baudrate == 0 {
            return Err(DeviceError::InvalidParameter);
        }
        self.config = config;
        Ok(())
    }

    fn take_rx_byte(&mut self) -> Option<u8> {
        if !self.initialized {
            return None;
        }
        self.rx_buffer.pop_front()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DeviceError> {
        if !self.initialized {
            return Err(DeviceError::NotInitialized);
        }
        if self.fail_writes {
            return Err(DeviceError::Busy);
        }
        self.tx_buffer
            .push(byte)
            .map_err(|_| DeviceError::BufferOverflow)
    }

    fn clear_interrupts(&mut self) {
        self.interrupt_clears += 1;
    }

    fn enable_rx_interrupt(&mut self) {
        self.rx_interrupt_enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_uart_not_initialized() {
        let mut uart = MockUart::new();
        assert_eq!(uart.write_byte(1), Err(DeviceError::NotInitialized));
        uart.mock_receive_byte(1).unwrap();
        assert_eq!(uart.take_rx_byte(), None);
    }

    #[test]
    fn test_mock_uart_rx_in_order() {
        let mut uart = MockUart::new();
        uart.init().unwrap();
        uart.mock_receive_byte(1).unwrap();
        uart.mock_receive_byte(2).unwrap();
        assert_eq!(uart.take_rx_byte(), Some(1));
        assert_eq!(uart.take_rx_byte(), Some(2));
        assert_eq!(uart.take_rx_byte(), None);
    }

    #[test]
    fn test_mock_uart_rx_overflow() {
        let mut uart = MockUart::new();
        uart.init().unwrap();
        for b in 0..BUFFER_SIZE {
            uart.mock_receive_byte(b as u8).unwrap();
        }
        assert_eq!(uart.mock_receive_byte(0), Err(DeviceError::BufferOverflow));
    }

    #[test]
    fn test_mock_uart_configure() {
        let mut uart = MockUart::new();
        uart.init().unwrap();
        let config = SerialConfig {
            baudrate: 9600,
            ..SerialConfig::default()
        };
        uart.configure(config).unwrap();
        assert_eq!(uart.config().baudrate, 9600);

        let bad = SerialConfig {
            baudrate: 0,
            ..SerialConfig::default()
        };
        assert_eq!(uart.configure(bad), Err(DeviceError::InvalidParameter));
    }
}
