use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Strategy for shrinking a raw silence inward before it is used.
///
/// The start margin delays the switch to the silence speed, the end margin
/// leaves the accelerated region early. Both absorb the host clock's tick
/// granularity and the lag of applying a new playback rate.
pub trait MarginPolicy: Debug + Send + Sync {
    /// Seconds added to a silence start, given the normal speed.
    fn margin_start(&self, normal_speed: f64) -> f64;

    /// Seconds removed from a silence end, given the silence speed.
    fn margin_end(&self, silence_speed: f64) -> f64;
}

/// Margins proportional to the playback speed on each side of the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProportionalMargin {
    pub start_factor: f64,
    pub end_factor: f64,
}

impl Default for ProportionalMargin {
    fn default() -> Self {
        Self {
            start_factor: 0.08,
            end_factor: 0.12,
        }
    }
}

impl MarginPolicy for ProportionalMargin {
    fn margin_start(&self, normal_speed: f64) -> f64 {
        self.start_factor * normal_speed
    }

    fn margin_end(&self, silence_speed: f64) -> f64 {
        self.end_factor * silence_speed
    }
}

/// Constant margins, independent of the configured speeds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedMargin {
    pub start: f64,
    pub end: f64,
}

impl MarginPolicy for FixedMargin {
    fn margin_start(&self, _normal_speed: f64) -> f64 {
        self.start
    }

    fn margin_end(&self, _silence_speed: f64) -> f64 {
        self.end
    }
}

/// Use the raw boundaries unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoMargin;

impl MarginPolicy for NoMargin {
    fn margin_start(&self, _normal_speed: f64) -> f64 {
        0.0
    }

    fn margin_end(&self, _silence_speed: f64) -> f64 {
        0.0
    }
}
