//! # Peripheral drivers
//!
//! - [`traits`]: driver traits the runtime is written against
//! - [`examples`]: in-memory drivers for tests and host bring-up
//!
//! | Device | Trait | Used for |
//! |---------|-------|------|
//! | base | `Device` | init / name / reset |
//! | GPIO | `GpioPin`, `InputPin`, `OutputPin` | rx ack line, indicator LED |
//! | edge GPIO | `EdgeInput` | tx ack line, button |
//! | UART | `Uart` | coprocessor link |
//! | timer | `CompareTimer` | tick service, link watchdog |

pub mod traits;
pub mod examples;

pub use traits::{
    Device,

    // GPIO
    GpioPin,
    InputPin,
    OutputPin,
    EdgeInput,
    PinMode,
    PullMode,
    Edge,

    // Serial
    Uart,
    SerialConfig,
    DataBits,
    StopBits,
    Parity,

    // Timer
    CompareTimer,
    Channel,

    DeviceError,
};
