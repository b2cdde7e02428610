mod types;

pub use types::{LinkError, Result};
