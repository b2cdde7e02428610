//! Scheduling core: critical sections, the event set, handler table,
//! dispatcher, power state and time base.

pub mod critical;
pub mod event;
pub mod handler;
pub mod power;
pub mod scheduler;
pub mod time;
