use crate::drivers::DeviceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    // Peripheral access
    Device(DeviceError),

    // Timing
    InvalidTickPeriod,
    TickPeriodTooLong,

    // Runtime slot
    AlreadyInstalled,
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LinkError::Device(e) => write!(f, "Peripheral error: {:?}", e),

            LinkError::InvalidTickPeriod => write!(f, "Tick period must be non-zero"),
            LinkError::TickPeriodTooLong => write!(f, "Tick period exceeds the counter range"),

            LinkError::AlreadyInstalled => write!(f, "Runtime already installed"),
        }
    }
}

impl From<DeviceError> for LinkError {
    fn from(e: DeviceError) -> Self {
        LinkError::Device(e)
    }
}

pub type Result<T> = core::result::Result<T, LinkError>;
