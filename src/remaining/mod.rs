pub mod display;
pub mod estimate;

pub use display::RemainingTimeDisplay;
pub use estimate::{estimate, format_clock, RemainingTime};
