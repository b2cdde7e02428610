//! Host simulation of a complete board.

use super::{MockDelay, MockGpio, MockTimer, MockUart, SimClock};
use crate::hal::host::HostCpu;
use crate::runtime::{Board, Hardware};

/// Board made entirely of mocks.
pub struct SimBoard;

impl Board for SimBoard {
    type Uart = MockUart;
    type RxAck = MockGpio;
    type TxAck = MockGpio;
    type Button = MockGpio;
    type Indicator = MockGpio;
    type Timer = MockTimer;
    type Delay = MockDelay;
    type Cpu = HostCpu;
}

impl SimBoard {
    pub const RX_ACK_PIN: u8 = 3;
    pub const TX_ACK_PIN: u8 = 2;
    pub const BUTTON_PIN: u8 = 6;
    pub const INDICATOR_PIN: u8 = 0;

    /// Fresh, unconfigured peripherals. Pins that can be scheduled follow
    /// `clock`.
    pub fn hardware(clock: &'static SimClock) -> Hardware<SimBoard> {
        Hardware::new(
            MockUart::new(),
            MockGpio::new(Self::RX_ACK_PIN),
            MockGpio::with_clock(Self::TX_ACK_PIN, clock),
            MockGpio::with_clock(Self::BUTTON_PIN, clock),
            MockGpio::new(Self::INDICATOR_PIN),
            MockTimer::new(),
        )
    }
}
