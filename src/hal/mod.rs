//! Hardware abstraction layer (HAL)
//!
//! Processor traits plus the per-architecture implementations.

pub mod traits;

#[cfg(all(feature = "cortex_m3", not(test), target_arch = "arm"))]
pub mod cortex_m3;
pub mod host;

pub use traits::*;
