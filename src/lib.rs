#![cfg_attr(not(test), no_std)]
#[cfg(test)]
extern crate std;

pub mod config;
pub mod drivers;
pub mod error;
pub mod hal;
pub mod input;
pub mod kernel;
pub mod link;
pub mod log;
pub mod runtime;

pub use paste;
pub use spin;

pub use config::RuntimeConfig;
pub use error::{LinkError, Result};
pub use kernel::critical::{lock, unlock, LockGuard, Token};
pub use kernel::event::{EventMask, EventSource};
pub use kernel::scheduler::Cycle;
pub use link::MessageFraming;
pub use runtime::{Board, Hardware, Runtime};
