pub mod controller;
pub mod simulated;
pub mod speed;

pub use controller::{PlaybackController, PlaybackState, SilencePhase, TickOutcome};
pub use simulated::SimulatedPlayer;
pub use speed::{Speed, MAX_SPEED, MIN_SPEED};

use serde::Serialize;

/// Notifications raised towards the host player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PlayerEvent {
    /// The clock was relocated past a silence, manually or automatically.
    SilenceSkipped {
        #[serde(rename = "skippedTo")]
        skipped_to: f64,
    },
}

impl PlayerEvent {
    /// Event name as the host sees it.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::SilenceSkipped { .. } => "silence-skipped",
        }
    }
}

/// Capabilities borrowed from the host media player.
///
/// The host owns the timeline clock. Every call happens synchronously from
/// within a time-update callback. A [`MediaHost::seek`] must not call back
/// into the controller; a host that raises a time update on seek queues it
/// and delivers it as the next tick.
pub trait MediaHost {
    /// Current clock position in seconds.
    fn current_time(&self) -> f64;

    /// Total media duration in seconds; NaN while unknown.
    fn duration(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    /// Relocate the clock.
    fn seek(&mut self, time: f64);

    fn emit(&mut self, event: PlayerEvent);

    /// Show or hide the "skip silence" affordance.
    fn set_skip_available(&mut self, _available: bool) {}

    /// Remaining time as the host computes it, ignoring silences.
    fn native_remaining_time(&self) -> f64 {
        (self.duration() - self.current_time()).max(0.0)
    }

    /// Render the corrected remaining time, already formatted.
    fn render_remaining_time(&mut self, _text: &str) {}

    /// Choose between the corrected remaining time and the host's own display.
    fn show_real_remaining_time(&mut self, _real: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_skipped_payload() {
        let event = PlayerEvent::SilenceSkipped { skipped_to: 19.5 };
        let json = serde_json::to_value(event).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"type": "silence-skipped", "skippedTo": 19.5})
        );
        assert_eq!(event.name(), "silence-skipped");
    }
}
