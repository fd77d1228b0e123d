use tracing::warn;

use super::{MediaHost, PlayerEvent};

/// An in-memory host that advances its clock only when told to.
///
/// Seeks raise a pending time update instead of calling back, mirroring how
/// browser players queue `timeupdate` after a seek.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    pub current_time: f64,
    pub duration: f64,
    pub playback_rate: f64,
    pub events: Vec<PlayerEvent>,
    pub seeks: Vec<f64>,
    pub skip_available: bool,
    pub real_remaining_visible: bool,
    pub remaining_text: Option<String>,
    pending_time_update: bool,
}

impl SimulatedPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration,
            playback_rate: 1.0,
            events: Vec::new(),
            seeks: Vec::new(),
            skip_available: false,
            real_remaining_visible: false,
            remaining_text: None,
            pending_time_update: false,
        }
    }

    /// Let `wall_seconds` of real time pass. Returns the media time played.
    pub fn advance(&mut self, wall_seconds: f64) -> f64 {
        let before = self.current_time;
        self.current_time = (self.current_time + wall_seconds * self.playback_rate).min(self.duration);
        self.current_time - before
    }

    pub fn ended(&self) -> bool {
        self.current_time >= self.duration
    }

    /// Consume the time update raised by the last seek, if any.
    pub fn take_pending_time_update(&mut self) -> bool {
        std::mem::take(&mut self.pending_time_update)
    }
}

impl MediaHost for SimulatedPlayer {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }

    fn seek(&mut self, time: f64) {
        if time.is_nan() {
            warn!("Refusing to seek to NaN");
            return;
        }
        self.current_time = if self.duration.is_nan() {
            time.max(0.0)
        } else {
            time.clamp(0.0, self.duration.max(0.0))
        };
        self.seeks.push(self.current_time);
        self.pending_time_update = true;
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.events.push(event);
    }

    fn set_skip_available(&mut self, available: bool) {
        self.skip_available = available;
    }

    fn render_remaining_time(&mut self, text: &str) {
        self.remaining_text = Some(text.to_string());
    }

    fn show_real_remaining_time(&mut self, real: bool) {
        self.real_remaining_visible = real;
    }
}
