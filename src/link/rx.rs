//! Flow-controlled reception, one byte per receive interrupt.
//!
//! The acknowledge pulse, not a byte count or a timeout, paces the sender:
//! the peer sends its next byte only after seeing the pulse, so the channel
//! is self-clocking.

use crate::drivers::DeviceError;
use crate::error;
use crate::link::framing::MessageFraming;

/// Result of handling one receive interrupt
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Received {
    pub byte: u8,
    /// The framing layer reported a complete unit
    pub unit_complete: bool,
}

/// Runs the inbound handshake for one receive interrupt.
///
/// Order per byte: `take` the byte, notify `start_reception`, `pulse` the
/// ack line, hand the byte to `add_byte`. Returns `None` for a spurious
/// interrupt with no byte ready. A failed pulse is logged and the byte is
/// still delivered; the peer then stalls and the watchdog recovers the link.
///
/// The peripherals are reached only through `take` and `pulse`, so no
/// borrow of them is live while the framing layer runs.
pub fn receive<F>(
    take: impl FnOnce() -> Option<u8>,
    pulse: impl FnOnce() -> Result<(), DeviceError>,
    framing: &F,
) -> Option<Received>
where
    F: MessageFraming + ?Sized,
{
    let byte = take()?;

    framing.start_reception();
    if let Err(e) = pulse() {
        error!("rx ack pulse failed: {:?}", e);
    }
    let unit_complete = framing.add_byte(byte);

    Some(Received {
        byte,
        unit_complete,
    })
}
