//! Fixed-length message framing for tests.
//!
//! Every `unit_len` inbound bytes form one unit. Outbound messages are
//! queued whole with [`MockFraming::queue_message`] and handed out one
//! byte at a time. State sits behind a `spin::Mutex` so the interrupt-side
//! and foreground methods can share it through `&self`.

use heapless::{Deque, Vec};
use spin::Mutex;

use crate::drivers::DeviceError;
use crate::link::MessageFraming;

pub const MAX_UNIT_LEN: usize = 32;
const MAX_PENDING_UNITS: usize = 8;
const MAX_DISPATCH_LOG: usize = 32;

pub type Unit = Vec<u8, MAX_UNIT_LEN>;

struct FramingState {
    unit_len: usize,
    rx: Unit,
    completed: Deque<Unit, MAX_PENDING_UNITS>,
    dispatched: Vec<Unit, MAX_DISPATCH_LOG>,
    tx: Vec<u8, MAX_UNIT_LEN>,
    tx_cursor: usize,
    reception_starts: usize,
    completed_units: usize,
    dispatch_calls: usize,
    restarts: usize,
}

pub struct MockFraming {
    state: Mutex<FramingState>,
}

impl MockFraming {
    /// Framing with `unit_len`-byte units, clamped to `1..=MAX_UNIT_LEN`.
    pub const fn new(unit_len: usize) -> Self {
        let unit_len = if unit_len == 0 {
            1
        } else if unit_len > MAX_UNIT_LEN {
            MAX_UNIT_LEN
        } else {
            unit_len
        };
        Self {
            state: Mutex::new(FramingState {
                unit_len,
                rx: Vec::new(),
                completed: Deque::new(),
                dispatched: Vec::new(),
                tx: Vec::new(),
                tx_cursor: 0,
                reception_starts: 0,
                completed_units: 0,
                dispatch_calls: 0,
                restarts: 0,
            }),
        }
    }

    /// Replaces the outbound message.
    pub fn queue_message(&self, bytes: &[u8]) -> Result<(), DeviceError> {
        let tx = Vec::from_slice(bytes).map_err(|_| DeviceError::BufferOverflow)?;
        let mut state = self.state.lock();
        state.tx = tx;
        state.tx_cursor = 0;
        Ok(())
    }

    pub fn reception_starts(&self) -> usize {
        self.state.lock().reception_starts
    }

    /// Units completed by `add_byte` so far.
    pub fn completed_units(&self) -> usize {
        self.state.lock().completed_units
    }

    /// Bytes of the unit currently being assembled.
    pub fn pending_rx_len(&self) -> usize {
        self.state.lock().rx.len()
    }

    pub fn restarts(&self) -> usize {
        self.state.lock().restarts
    }

    /// Invocations of `dispatch_completed_unit`.
    pub fn dispatch_calls(&self) -> usize {
        self.state.lock().dispatch_calls
    }

    /// Units processed by `dispatch_completed_unit`, oldest first.
    pub fn dispatched(&self) -> Vec<Unit, MAX_DISPATCH_LOG> {
        self.state.lock().dispatched.clone()
    }

    /// `true` once every byte of the outbound message has been handed out.
    pub fn tx_done(&self) -> bool {
        let state = self.state.lock();
        state.tx_cursor >= state.tx.len()
    }
}

impl MessageFraming for MockFraming {
    fn start_reception(&self) {
        self.state.lock().reception_starts += 1;
    }

    fn add_byte(&self, byte: u8) -> bool {
        let mut state = self.state.lock();
        if state.rx.push(byte).is_err() {
            state.rx.clear();
            return false;
        }
        if state.rx.len() < state.unit_len {
            return false;
        }

        let unit = core::mem::take(&mut state.rx);
        // oldest unit is dropped when nobody dispatches
        if state.completed.is_full() {
            state.completed.pop_front();
        }
        let _ = state.completed.push_back(unit);
        state.completed_units += 1;
        true
    }

    fn start_transmission(&self) -> u8 {
        let mut state = self.state.lock();
        match state.tx.first().copied() {
            Some(byte) => {
                state.tx_cursor = 1;
                byte
            }
            None => 0,
        }
    }

    fn next_byte(&self) -> Option<u8> {
        let mut state = self.state.lock();
        let byte = state.tx.get(state.tx_cursor).copied()?;
        state.tx_cursor += 1;
        Some(byte)
    }

    fn restart(&self) {
        let mut state = self.state.lock();
        state.rx.clear();
        state.tx_cursor = state.tx.len();
        state.restarts += 1;
    }

    fn dispatch_completed_unit(&self) {
        let mut state = self.state.lock();
        state.dispatch_calls += 1;
        while let Some(unit) = state.completed.pop_front() {
            if state.dispatched.is_full() {
                state.dispatched.remove(0);
            }
            let _ = state.dispatched.push(unit);
        }
    }
}
