use serde::Serialize;

pub const MIN_SPEED: f64 = 0.2;
pub const MAX_SPEED: f64 = 20.0;

/// A playback rate clamped to `[MIN_SPEED, MAX_SPEED]` with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Speed(f64);

impl Speed {
    pub const NORMAL: Speed = Speed(1.0);

    /// Clamp and round `value`. NaN has no meaningful clamp and is rejected.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        let clamped = value.clamp(MIN_SPEED, MAX_SPEED);
        Some(Self((clamped * 10.0).round() / 10.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}x", self.0)
    }
}
