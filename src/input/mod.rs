pub mod button;

pub use button::Debouncer;
