/// Message-framing collaborator.
///
/// Decides what a byte sequence means; the runtime only moves bytes and
/// tells it when to start over. Reception and transmission methods are
/// called from interrupt context, [`dispatch_completed_unit`] from the
/// foreground, so implementations keep their own state behind interior
/// mutability and must tolerate being preempted by the interrupt-side
/// methods. The runtime holds no peripheral borrow while calling in, so an
/// implementation may call `watch_on`, `watch_off` or `start_send` on it.
///
/// [`dispatch_completed_unit`]: MessageFraming::dispatch_completed_unit
pub trait MessageFraming: Sync {
    /// A new inbound byte sequence has (re)started.
    fn start_reception(&self);

    /// Accumulates one inbound byte. Returns `true` exactly when the byte
    /// completes a unit.
    fn add_byte(&self, byte: u8) -> bool;

    /// First byte of the pending outbound message.
    fn start_transmission(&self) -> u8;

    /// Next outbound byte, or `None` once the message is exhausted.
    fn next_byte(&self) -> Option<u8>;

    /// Abandons any reception or transmission in progress.
    fn restart(&self);

    /// Processes a completed inbound unit. Runs as the `Dispatch` handler.
    fn dispatch_completed_unit(&self);
}
