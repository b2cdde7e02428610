//! Time base of the link timer.
//!
//! One 16-bit free-running counter clocked at
//! [`TIMER_TICKS_PER_SECOND`](crate::config::TIMER_TICKS_PER_SECOND) serves
//! both the application tick and the link watchdog, each on its own compare
//! channel. All deadline arithmetic wraps.

pub mod tick;

pub use tick::TickService;

use crate::config::TIMER_TICKS_PER_SECOND;
use crate::error::{LinkError, Result};

/// Counter value of the link timer
pub type Ticks = u16;

/// Converts milliseconds to counter ticks, rounding down.
///
/// Fails for zero and for periods the counter cannot represent (a deadline
/// further than one counter wrap away would alias).
pub fn ms_to_ticks(ms: u16) -> Result<Ticks> {
    if ms == 0 {
        return Err(LinkError::InvalidTickPeriod);
    }
    let ticks = u32::from(ms) * TIMER_TICKS_PER_SECOND / 1000;
    match Ticks::try_from(ticks) {
        Ok(0) => Err(LinkError::InvalidTickPeriod),
        Ok(t) => Ok(t),
        Err(_) => Err(LinkError::TickPeriodTooLong),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(250), Ok(8192));
        assert_eq!(ms_to_ticks(1000), Ok(32768));
        assert_eq!(ms_to_ticks(1), Ok(32));
    }

    #[test]
    fn test_ms_to_ticks_limits() {
        assert_eq!(ms_to_ticks(0), Err(LinkError::InvalidTickPeriod));
        assert_eq!(ms_to_ticks(1999), Ok(65503));
        assert_eq!(ms_to_ticks(2000), Err(LinkError::TickPeriodTooLong));
    }
}
