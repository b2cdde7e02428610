use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::drivers::{Channel, CompareTimer};
use crate::kernel::time::Ticks;

#[derive(Debug, PartialEq, Clone, Copy)]
struct TickState {
    period: Ticks,
    deadline: Ticks,
}

/// Periodic application tick on the timer's `Tick` compare channel.
///
/// Each expiry schedules the next one at `previous deadline + period`, never
/// at `now + period`, so interrupt latency does not accumulate into drift.
pub struct TickService {
    state: Mutex<Cell<Option<TickState>>>,
}

impl TickService {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(None)),
        }
    }

    /// (Re)starts the tick with the first expiry one period from now.
    pub fn start<T: CompareTimer>(&self, cs: CriticalSection<'_>, timer: &mut T, period: Ticks) {
        let deadline = timer.now().wrapping_add(period);
        timer.set_compare(Channel::Tick, deadline);
        timer.enable_compare(Channel::Tick);
        self.state.borrow(cs).set(Some(TickState { period, deadline }));
    }

    pub fn stop<T: CompareTimer>(&self, cs: CriticalSection<'_>, timer: &mut T) {
        timer.disable_compare(Channel::Tick);
        self.state.borrow(cs).set(None);
    }

    /// Compare-match handling: advances the deadline by one period.
    ///
    /// Returns `false` for a match while stopped.
    pub fn on_compare<T: CompareTimer>(&self, cs: CriticalSection<'_>, timer: &mut T) -> bool {
        let cell = self.state.borrow(cs);
        let Some(mut state) = cell.get() else {
            return false;
        };
        state.deadline = state.deadline.wrapping_add(state.period);
        timer.set_compare(Channel::Tick, state.deadline);
        cell.set(Some(state));
        true
    }

    pub fn deadline(&self, cs: CriticalSection<'_>) -> Option<Ticks> {
        self.state.borrow(cs).get().map(|s| s.deadline)
    }

    pub fn period(&self, cs: CriticalSection<'_>) -> Option<Ticks> {
        self.state.borrow(cs).get().map(|s| s.period)
    }
}

impl Default for TickService {
    fn default() -> Self {
        Self::new()
    }
}
