use core::cell::Cell;

use critical_section::{CriticalSection, Mutex};

use crate::config::MAX_EVENT_SOURCES;

/// Scheduling tag of an asynchronous occurrence. Carries no payload.
///
/// The discriminant is the bit position in the event set and also the
/// dispatch order: lower ids run first.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum EventSource {
    Button = 0,
    Tick = 1,
    Dispatch = 2,
}

const _: () = assert!(EventSource::COUNT <= MAX_EVENT_SOURCES);

impl EventSource {
    pub const COUNT: usize = 3;

    pub const ALL: [EventSource; Self::COUNT] =
        [EventSource::Button, EventSource::Tick, EventSource::Dispatch];

    pub const fn id(self) -> usize {
        self as usize
    }

    pub const fn mask(self) -> u16 {
        1 << (self as u16)
    }

    pub fn from_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }
}

/// Snapshot of pending sources taken by [`EventSet::take`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct EventMask(u16);

impl EventMask {
    pub const EMPTY: EventMask = EventMask(0);

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, source: EventSource) -> bool {
        self.0 & source.mask() != 0
    }

    pub const fn with(self, source: EventSource) -> Self {
        Self(self.0 | source.mask())
    }

    /// Set sources in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = EventSource> {
        EventSource::ALL
            .into_iter()
            .filter(move |source| self.contains(*source))
    }
}

/// Pending-event bit vector shared by interrupt handlers and the foreground.
///
/// Every access needs a critical-section token, so a set bit can never be
/// lost between the foreground's read and its clear.
pub struct EventSet {
    bits: Mutex<Cell<u16>>,
}

impl EventSet {
    pub const fn new() -> Self {
        Self {
            bits: Mutex::new(Cell::new(0)),
        }
    }

    /// Marks `source` pending. Repeated posts before a drain coalesce.
    pub fn post(&self, cs: CriticalSection<'_>, source: EventSource) {
        let bits = self.bits.borrow(cs);
        bits.set(bits.get() | source.mask());
    }

    /// Reads and clears the whole set in one step.
    pub fn take(&self, cs: CriticalSection<'_>) -> EventMask {
        EventMask(self.bits.borrow(cs).replace(0))
    }

    pub fn peek(&self, cs: CriticalSection<'_>) -> EventMask {
        EventMask(self.bits.borrow(cs).get())
    }
}

impl Default for EventSet {
    fn default() -> Self {
        Self::new()
    }
}
