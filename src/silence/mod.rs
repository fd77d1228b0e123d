pub mod import;
pub mod margin;
pub mod store;
pub mod timestamps;

pub use import::{load_timestamps, parse_silencedetect, TimestampFormat};
pub use margin::{FixedMargin, MarginPolicy, NoMargin, ProportionalMargin};
pub use store::{lookup, normalize, IntervalStore};
pub use timestamps::{RawInterval, RawPair, RawTimestamps};

use serde::Serialize;

/// A normalized silence, always with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SilenceInterval {
    pub start: f64,
    pub end: f64,
}

impl SilenceInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Get the duration of this silence in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` lies within the silence, both bounds inclusive.
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time <= self.end
    }
}
