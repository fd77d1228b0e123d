use tracing::{debug, error, info};

use super::margin::{MarginPolicy, ProportionalMargin};
use super::timestamps::{RawInterval, RawTimestamps};
use super::SilenceInterval;

/// Apply the margin policy, drop degenerate or unbounded results and sort by
/// start.
pub fn normalize(
    raw: &[RawInterval],
    normal_speed: f64,
    silence_speed: f64,
    margin: &dyn MarginPolicy,
) -> Vec<SilenceInterval> {
    let margin_start = margin.margin_start(normal_speed);
    let margin_end = margin.margin_end(silence_speed);

    let mut intervals: Vec<SilenceInterval> = raw
        .iter()
        .map(|r| SilenceInterval {
            start: r.start + margin_start,
            end: r.end - margin_end,
        })
        .filter(|s| s.start.is_finite() && s.end.is_finite() && s.end > s.start)
        .collect();

    intervals.sort_by(|a, b| a.start.total_cmp(&b.start));
    intervals
}

/// Find the first interval with `start <= time <= end`.
pub fn lookup(intervals: &[SilenceInterval], time: f64) -> Option<SilenceInterval> {
    intervals.iter().find(|s| s.contains(time)).copied()
}

/// Owns the normalized silence sequence.
///
/// The sequence is rebuilt into a fresh vector and swapped in, never edited
/// in place.
#[derive(Debug)]
pub struct IntervalStore {
    intervals: Vec<SilenceInterval>,
    raw: Vec<RawInterval>,
    margin: Box<dyn MarginPolicy>,
}

impl Default for IntervalStore {
    fn default() -> Self {
        Self::new(Box::new(ProportionalMargin::default()))
    }
}

impl IntervalStore {
    pub fn new(margin: Box<dyn MarginPolicy>) -> Self {
        Self {
            intervals: Vec::new(),
            raw: Vec::new(),
            margin,
        }
    }

    /// Replace the sequence from caller-supplied timestamps.
    ///
    /// Malformed input leaves the store empty and logs the reason. Returns
    /// the number of intervals that survived normalization.
    pub fn set_timestamps(
        &mut self,
        timestamps: &RawTimestamps,
        normal_speed: f64,
        silence_speed: f64,
    ) -> usize {
        match timestamps.to_intervals() {
            Ok(raw) => self.set_intervals(raw, normal_speed, silence_speed),
            Err(e) => {
                error!("Ignoring silence timestamps: {e}");
                self.clear();
                0
            }
        }
    }

    /// Replace the sequence from a JSON value of either accepted shape.
    pub fn set_timestamps_value(
        &mut self,
        value: serde_json::Value,
        normal_speed: f64,
        silence_speed: f64,
    ) -> usize {
        match RawTimestamps::from_value(value) {
            Ok(timestamps) => self.set_timestamps(&timestamps, normal_speed, silence_speed),
            Err(e) => {
                error!("Ignoring silence timestamps: {e}");
                self.clear();
                0
            }
        }
    }

    /// Replace the sequence from raw intervals.
    ///
    /// Any non-finite bound rejects the whole input, as for malformed
    /// timestamps.
    pub fn set_intervals(
        &mut self,
        raw: Vec<RawInterval>,
        normal_speed: f64,
        silence_speed: f64,
    ) -> usize {
        if let Some(bad) = raw
            .iter()
            .find(|r| !r.start.is_finite() || !r.end.is_finite())
        {
            error!(
                "Ignoring silence timestamps: non-finite interval [{}, {}]",
                bad.start, bad.end
            );
            self.clear();
            return 0;
        }

        self.raw = raw;
        self.rebuild(normal_speed, silence_speed)
    }

    /// Renormalize the retained raw intervals, e.g. after a speed change.
    pub fn rebuild(&mut self, normal_speed: f64, silence_speed: f64) -> usize {
        let intervals = normalize(&self.raw, normal_speed, silence_speed, &*self.margin);
        let dropped = self.raw.len() - intervals.len();
        if dropped > 0 {
            debug!("Dropped {} silences shorter than their margins", dropped);
        }
        info!(
            "Loaded {} silence intervals ({:.1}s total)",
            intervals.len(),
            intervals.iter().map(SilenceInterval::duration).sum::<f64>()
        );
        self.intervals = intervals;
        self.intervals.len()
    }

    /// Swap the margin policy. Call [`IntervalStore::rebuild`] to apply it.
    pub fn set_margin_policy(&mut self, margin: Box<dyn MarginPolicy>) {
        self.margin = margin;
    }

    pub fn clear(&mut self) {
        self.raw = Vec::new();
        self.intervals = Vec::new();
    }

    pub fn intervals(&self) -> &[SilenceInterval] {
        &self.intervals
    }

    pub fn raw_intervals(&self) -> &[RawInterval] {
        &self.raw
    }

    pub fn lookup(&self, time: f64) -> Option<SilenceInterval> {
        lookup(&self.intervals, time)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Sum of the normalized silence durations.
    pub fn total_silence(&self) -> f64 {
        self.intervals.iter().map(SilenceInterval::duration).sum()
    }
}
