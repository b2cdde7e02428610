//! Processor-level hardware abstraction.
//!
//! Peripheral traits live in [`crate::drivers`]; these cover the core itself.

/// Processor control
pub trait ProcessorControl {
    /// Low-power wait until the next interrupt.
    ///
    /// Called with interrupts masked. Implementations must still resume
    /// when an interrupt becomes pending (Cortex-M `WFI` does), so a signal
    /// raised between the foreground's last check and the wait is not
    /// slept through.
    fn wait_for_interrupt(&self);

    /// Requests that a suspended foreground resume on interrupt exit.
    ///
    /// Cores that always resume after `WFI` need nothing here.
    fn wake(&self) {}
}

/// Blocking busy-wait delay
///
/// Runs outside the event model; used during initialization, link reset and
/// button debounce only.
pub trait DelayMs {
    fn delay_ms(&self, ms: u16);
}
