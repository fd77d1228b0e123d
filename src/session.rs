//! The handle a host player gets when it attaches silence speed-up.

use tracing::{debug, info};

use crate::config::Config;
use crate::player::{MediaHost, PlaybackController, TickOutcome};
use crate::remaining::{RemainingTime, RemainingTimeDisplay};
use crate::silence::{RawTimestamps, SilenceInterval};

/// Silence speed-up attached to one host player.
///
/// Created with the host's capabilities and torn down with
/// [`SpeedupSession::dispose`], which hands the host back.
#[derive(Debug)]
pub struct SpeedupSession<H: MediaHost> {
    host: H,
    controller: PlaybackController,
    display: RemainingTimeDisplay,
}

impl<H: MediaHost> SpeedupSession<H> {
    pub fn new(host: H, config: &Config) -> Self {
        let controller = PlaybackController::new(config);
        info!(
            "Silence speed-up attached: {} silences, speech {:.1}x, silence {:.1}x{}",
            controller.silence_timestamps().len(),
            controller.playback_speed(),
            controller.silence_speed(),
            if controller.skip_silences() {
                ", skipping"
            } else {
                ""
            }
        );

        Self {
            host,
            controller,
            display: RemainingTimeDisplay::new(config.display_real_remaining_time),
        }
    }

    /// The host finished loading; the remaining-time display may be wired up.
    pub fn on_ready(&mut self) {
        self.display.on_ready(&mut self.host);
    }

    /// Handle one time update from the host.
    pub fn on_time_update(&mut self) -> TickOutcome {
        let current_time = self.host.current_time();
        let outcome = self.controller.tick(current_time, &mut self.host);

        self.display.update(
            &mut self.host,
            self.controller.silence_timestamps(),
            current_time,
            self.controller.playback_speed(),
            self.controller.silence_speed(),
        );

        outcome
    }

    pub fn skip_current_silence(&mut self) -> Option<f64> {
        self.controller.skip_current_silence(&mut self.host)
    }

    /// Corrected remaining time at the host's current position.
    pub fn real_remaining_time(&self) -> RemainingTime {
        RemainingTime::compute(
            self.controller.silence_timestamps(),
            self.host.current_time(),
            self.host.duration(),
            self.controller.playback_speed(),
            self.controller.silence_speed(),
        )
    }

    pub fn set_silence_timestamps(&mut self, value: serde_json::Value) -> usize {
        self.controller.set_silence_timestamps(value, &mut self.host)
    }

    pub fn set_silence_timestamps_raw(&mut self, timestamps: &RawTimestamps) -> usize {
        self.controller.set_silence_timestamps_raw(timestamps, &mut self.host)
    }

    pub fn silence_timestamps(&self) -> &[SilenceInterval] {
        self.controller.silence_timestamps()
    }

    pub fn set_playback_speed(&mut self, speed: f64) -> f64 {
        self.controller.set_playback_speed(speed)
    }

    pub fn set_silence_speed(&mut self, speed: f64) -> f64 {
        self.controller.set_silence_speed(speed)
    }

    pub fn playback_speed(&self) -> f64 {
        self.controller.playback_speed()
    }

    pub fn silence_speed(&self) -> f64 {
        self.controller.silence_speed()
    }

    pub fn current(&self, time: f64) -> Option<SilenceInterval> {
        self.controller.current(time)
    }

    pub fn is_in_silence(&self) -> bool {
        self.controller.is_in_silence()
    }

    pub fn set_skip_silences(&mut self, skip: bool) {
        self.controller.set_skip_silences(skip);
    }

    pub fn set_display_real_remaining_time(&mut self, enabled: bool) {
        self.display.set_enabled(enabled, &mut self.host);
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Detach from the host, restoring its normal rate and displays.
    pub fn dispose(mut self) -> H {
        debug!("Detaching silence speed-up");
        self.host.set_playback_rate(1.0);
        self.host.set_skip_available(false);
        if self.display.is_ready() {
            self.host.show_real_remaining_time(false);
        }
        self.host
    }
}
