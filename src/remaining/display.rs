use tracing::debug;

use crate::player::MediaHost;
use crate::silence::SilenceInterval;

use super::estimate::{format_clock, RemainingTime};

/// Drives the corrected remaining-time element of the host.
///
/// Nothing is rendered until the host has signalled readiness.
#[derive(Debug, Clone, Default)]
pub struct RemainingTimeDisplay {
    enabled: bool,
    ready: bool,
}

impl RemainingTimeDisplay {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ready: false,
        }
    }

    pub fn on_ready<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        self.ready = true;
        host.show_real_remaining_time(self.enabled);
    }

    pub fn set_enabled<H: MediaHost + ?Sized>(&mut self, enabled: bool, host: &mut H) {
        self.enabled = enabled;
        if self.ready {
            host.show_real_remaining_time(enabled);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Recompute and render. Returns the rendered text, if anything was shown.
    pub fn update<H: MediaHost + ?Sized>(
        &self,
        host: &mut H,
        intervals: &[SilenceInterval],
        current_time: f64,
        normal_speed: f64,
        silence_speed: f64,
    ) -> Option<String> {
        if !self.ready || !self.enabled {
            return None;
        }

        let duration = host.duration();
        let text = if duration.is_finite() && current_time.is_finite() {
            RemainingTime::compute(
                intervals,
                current_time,
                duration,
                normal_speed,
                silence_speed,
            )
            .formatted()
        } else {
            debug!("Duration unknown, falling back to native remaining time");
            format_clock(host.native_remaining_time())
        };

        host.render_remaining_time(&text);
        Some(text)
    }
}
