use crate::drivers::SerialConfig;
use crate::kernel::time::{ms_to_ticks, Ticks};

// Free-running counter clock (ACLK crystal)
pub const TIMER_TICKS_PER_SECOND: u32 = 32_768;
// Busy-wait calibration for the default 1 MHz core clock
pub const CORE_CYCLES_PER_MS: u32 = 1_000;

pub const MAX_EVENT_SOURCES: usize = 16;

pub const LINK_WATCHDOG_MS: u16 = 250;
pub const BUTTON_DEBOUNCE_MS: u16 = 100;
pub const BUTTON_ENABLE_SETTLE_MS: u16 = 100;
pub const LINK_SUSPEND_MS: u16 = 100;
pub const LINK_RESET_SETTLE_MS: u16 = 500;

pub const LINK_BAUDRATE: u32 = 115_200;

/// Runtime tunables. `Default` yields the board constants above.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Serial settings for the coprocessor link
    pub serial: SerialConfig,
    /// Grace period of the link watchdog, in counter ticks
    pub watchdog_period: Ticks,
    /// Settle delay before a button press is re-sampled
    pub debounce_ms: u16,
    /// Also arm the watchdog while an outbound message is in flight
    pub guard_transmit: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig {
                baudrate: LINK_BAUDRATE,
                ..SerialConfig::default()
            },
            watchdog_period: ms_to_ticks(LINK_WATCHDOG_MS).unwrap_or(Ticks::MAX),
            debounce_ms: BUTTON_DEBOUNCE_MS,
            guard_transmit: true,
        }
    }
}
