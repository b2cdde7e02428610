use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::drivers::{Channel, CompareTimer};
use crate::kernel::time::Ticks;

#[derive(Debug, PartialEq, Clone, Copy)]
struct WatchState {
    armed: bool,
    deadline: Ticks,
    expirations: u32,
}

/// Link-stall detector on the timer's `Watchdog` compare channel.
///
/// Armed whenever the link expects forward progress; every progress event
/// re-arms it one grace period ahead. An expiry is one-shot: the watchdog
/// disarms itself and stays quiet until armed again.
pub struct LinkWatchdog {
    period: Ticks,
    state: Mutex<Cell<WatchState>>,
}

impl LinkWatchdog {
    pub const fn new(period: Ticks) -> Self {
        Self {
            period,
            state: Mutex::new(Cell::new(WatchState {
                armed: false,
                deadline: 0,
                expirations: 0,
            })),
        }
    }

    pub fn period(&self) -> Ticks {
        self.period
    }

    /// Sets the deadline one grace period from now and enables the channel.
    pub fn arm<T: CompareTimer>(&self, cs: CriticalSection<'_>, timer: &mut T) {
        let deadline = timer.now().wrapping_add(self.period);
        timer.set_compare(Channel::Watchdog, deadline);
        timer.enable_compare(Channel::Watchdog);

        let cell = self.state.borrow(cs);
        let mut state = cell.get();
        state.armed = true;
        state.deadline = deadline;
        cell.set(state);
    }

    pub fn disarm<T: CompareTimer>(&self, cs: CriticalSection<'_>, timer: &mut T) {
        timer.disable_compare(Channel::Watchdog);

        let cell = self.state.borrow(cs);
        let mut state = cell.get();
        state.armed = false;
        cell.set(state);
    }

    /// Compare-match handling. Returns `true` when the deadline passed while
    /// armed; the watchdog is disarmed afterwards.
    ///
    /// A match on a disarmed watchdog is spurious and returns `false`.
    pub fn expire<T: CompareTimer>(&self, cs: CriticalSection<'_>, timer: &mut T) -> bool {
        if !self.is_armed(cs) {
            return false;
        }
        self.disarm(cs, timer);

        let cell = self.state.borrow(cs);
        let mut state = cell.get();
        state.expirations = state.expirations.wrapping_add(1);
        cell.set(state);
        true
    }

    pub fn is_armed(&self, cs: CriticalSection<'_>) -> bool {
        self.state.borrow(cs).get().armed
    }

    pub fn deadline(&self, cs: CriticalSection<'_>) -> Option<Ticks> {
        let state = self.state.borrow(cs).get();
        state.armed.then_some(state.deadline)
    }

    /// Number of expiries since construction.
    pub fn expirations(&self, cs: CriticalSection<'_>) -> u32 {
        self.state.borrow(cs).get().expirations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Device;
    use crate::drivers::examples::MockTimer;

    const PERIOD: Ticks = 100;

    fn running_timer() -> MockTimer {
        let mut timer = MockTimer::new();
        timer.init().unwrap();
        timer.start().unwrap();
        timer
    }

    /// Steps the timer, servicing watchdog matches; returns expiries seen.
    fn run(wd: &LinkWatchdog, timer: &mut MockTimer, ticks: u32) -> u32 {
        let mut fired = 0;
        for _ in 0..ticks {
            if timer.mock_step() & Channel::Watchdog.mask() != 0
                && critical_section::with(|cs| wd.expire(cs, timer))
            {
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn test_arm_sets_deadline() {
        let wd = LinkWatchdog::new(PERIOD);
        let mut timer = running_timer();
        timer.mock_advance(40);

        critical_section::with(|cs| {
            wd.arm(cs, &mut timer);
            assert!(wd.is_armed(cs));
            assert_eq!(wd.deadline(cs), Some(140));
        });
        assert!(timer.is_compare_enabled(Channel::Watchdog));
    }

    #[test]
    fn test_fires_once_after_silence() {
        let wd = LinkWatchdog::new(PERIOD);
        let mut timer = running_timer();
        critical_section::with(|cs| wd.arm(cs, &mut timer));

        assert_eq!(run(&wd, &mut timer, PERIOD as u32 * 5), 1);
        critical_section::with(|cs| {
            assert!(!wd.is_armed(cs));
            assert_eq!(wd.expirations(cs), 1);
        });
        assert!(!timer.is_compare_enabled(Channel::Watchdog));
    }

    #[test]
    fn test_rearm_before_deadline_never_fires() {
        let wd = LinkWatchdog::new(PERIOD);
        let mut timer = running_timer();

        for _ in 0..50 {
            critical_section::with(|cs| wd.arm(cs, &mut timer));
            assert_eq!(run(&wd, &mut timer, PERIOD as u32 - 1), 0);
        }
    }

    #[test]
    fn test_disarmed_match_is_spurious() {
        let wd = LinkWatchdog::new(PERIOD);
        let mut timer = running_timer();
        critical_section::with(|cs| {
            wd.arm(cs, &mut timer);
            wd.disarm(cs, &mut timer);
            assert!(!wd.expire(cs, &mut timer));
            assert_eq!(wd.deadline(cs), None);
        });
    }
}
