//! # Mock peripherals
//!
//! Implementations of the driver traits with no hardware behind them, for
//! unit tests, integration tests and host simulation.
//!
//! | Type | Stands in for |
//! |------|---------------|
//! | [`MockUart`] | link UART |
//! | [`MockGpio`] | ack lines, button, indicator |
//! | [`MockTimer`] | 32 kHz compare timer |
//! | [`MockDelay`] / [`SimClock`] | busy-wait delay and the time it burns |
//! | [`MockFraming`] | message layer above the link |
//! | [`SimBoard`] | all of the above as one [`Board`](crate::runtime::Board) |

mod mock_delay;
mod mock_framing;
mod mock_gpio;
mod mock_timer;
mod mock_uart;
mod sim_board;

pub use mock_delay::{MockDelay, SimClock};
pub use mock_framing::{MAX_UNIT_LEN, MockFraming, Unit};
pub use mock_gpio::MockGpio;
pub use mock_timer::MockTimer;
pub use mock_uart::MockUart;
pub use sim_board::SimBoard;
