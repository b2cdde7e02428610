//! Serial link to the radio coprocessor.
//!
//! - [`flow`]: the two acknowledge lines
//! - [`rx`]: inbound byte handshake
//! - [`tx`]: outbound byte handshake
//! - [`watchdog`]: stall detection
//! - [`framing`]: interface of the message layer that consumes the bytes

pub mod flow;
pub mod framing;
pub mod rx;
pub mod tx;
pub mod watchdog;

pub use flow::{AckLine, PeerAckLine, RxState};
pub use framing::MessageFraming;
pub use watchdog::LinkWatchdog;
