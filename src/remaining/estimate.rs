use serde::Serialize;

use crate::player::Speed;
use crate::silence::SilenceInterval;

/// Breakdown of the time left, accounting for the two playback rates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RemainingTime {
    /// Media seconds of silence not yet fully played.
    pub silence_seconds: f64,
    /// Media seconds of speech left.
    pub spoken_seconds: f64,
    /// Wall-clock seconds left at the configured speeds.
    pub real_seconds: f64,
}

impl RemainingTime {
    /// Compute the breakdown from scratch.
    ///
    /// A silence counts in full as soon as its end lies ahead of
    /// `current_time`, even if the playhead is already inside it. Speeds are
    /// clamped like playback rates; NaN counts as 1x.
    pub fn compute(
        intervals: &[SilenceInterval],
        current_time: f64,
        total_duration: f64,
        normal_speed: f64,
        silence_speed: f64,
    ) -> Self {
        let silence_seconds: f64 = intervals
            .iter()
            .filter(|s| s.end > current_time)
            .map(SilenceInterval::duration)
            .sum();
        let spoken_seconds = (total_duration - current_time - silence_seconds).max(0.0);
        let normal_speed = Speed::new(normal_speed).unwrap_or_default().value();
        let silence_speed = Speed::new(silence_speed).unwrap_or_default().value();
        let real_seconds = spoken_seconds / normal_speed + silence_seconds / silence_speed;

        Self {
            silence_seconds,
            spoken_seconds,
            real_seconds,
        }
    }

    pub fn formatted(&self) -> String {
        format_clock(self.real_seconds)
    }
}

/// Wall-clock seconds left at the given speeds.
pub fn estimate(
    intervals: &[SilenceInterval],
    current_time: f64,
    total_duration: f64,
    normal_speed: f64,
    silence_speed: f64,
) -> f64 {
    RemainingTime::compute(
        intervals,
        current_time,
        total_duration,
        normal_speed,
        silence_speed,
    )
    .real_seconds
}

/// Format seconds as `H:MM:SS`, truncating the fractional part.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00:00".to_string();
    }

    let total_secs = seconds.floor() as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{}:{:02}:{:02}", hours, minutes, secs)
}
