//! Outbound transmission, paced by the peer's acknowledge edges.
//!
//! [`start`] writes the first byte of a message; after that every edge on
//! the peer's ack line pulls one more byte from the framing layer. There is
//! no retransmission here: a lost edge stalls the message until a restart.
//!
//! The framing layer is always consulted with the peripherals released;
//! they are reached through closures around each step.

use crate::drivers::{DeviceError, EdgeInput, Uart};
use crate::link::flow::PeerAckLine;
use crate::link::framing::MessageFraming;

/// Loads the first byte of the pending outbound message and `write`s it.
pub fn start<F>(
    write: impl FnOnce(u8) -> Result<(), DeviceError>,
    framing: &F,
) -> Result<u8, DeviceError>
where
    F: MessageFraming + ?Sized,
{
    let byte = framing.start_transmission();
    write(byte)?;
    Ok(byte)
}

/// Handles an interrupt on the peer's ack line.
///
/// Nothing happens unless `edge_pending`. Otherwise the next byte, if any,
/// is passed to `complete`, normally [`complete_edge`]. Returns the byte
/// written, or `None` if no edge was latched or the message is exhausted.
pub fn on_ack_edge<F>(
    edge_pending: impl FnOnce() -> bool,
    complete: impl FnOnce(Option<u8>) -> Result<Option<u8>, DeviceError>,
    framing: &F,
) -> Result<Option<u8>, DeviceError>
where
    F: MessageFraming + ?Sized,
{
    if !edge_pending() {
        return Ok(None);
    }
    complete(framing.next_byte())
}

/// Writes `next`, if any, and clears the latched edge in every case.
pub fn complete_edge<U, E>(
    uart: &mut U,
    ack: &mut PeerAckLine<E>,
    next: Option<u8>,
) -> Result<Option<u8>, DeviceError>
where
    U: Uart,
    E: EdgeInput,
{
    let written = match next {
        Some(byte) => uart.write_byte(byte).map(|_| Some(byte)),
        None => Ok(None),
    };
    ack.clear_edge();
    written
}
