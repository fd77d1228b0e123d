use tracing::{debug, info, warn};

use crate::config::Config;
use crate::silence::{IntervalStore, RawTimestamps, SilenceInterval};

use super::speed::Speed;
use super::{MediaHost, PlayerEvent};

/// Whether the playhead is currently inside a silence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SilencePhase {
    #[default]
    Normal,
    /// Inside a silence; `skip_target` is where a manual skip lands.
    InSilence { skip_target: f64 },
}

/// What a single tick decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Normal,
    InSilence { skip_target: f64 },
    Skipped { to: f64 },
}

/// Rate state of one controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub normal_speed: Speed,
    pub silence_speed: Speed,
    pub phase: SilencePhase,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            normal_speed: Speed::NORMAL,
            silence_speed: Speed::new(8.0).unwrap_or_default(),
            phase: SilencePhase::Normal,
        }
    }
}

/// Per-tick rate selection and silence skipping.
///
/// The host is borrowed only for the duration of a call, so a seek issued
/// from inside a tick cannot re-enter the controller.
#[derive(Debug, Default)]
pub struct PlaybackController {
    store: IntervalStore,
    state: PlaybackState,
    skip_silences: bool,
}

impl PlaybackController {
    pub fn new(config: &Config) -> Self {
        let normal_speed = Speed::new(config.playback_speed).unwrap_or_else(|| {
            warn!("playback_speed is not a number, using {}", Speed::NORMAL);
            Speed::NORMAL
        });
        let silence_speed = Speed::new(config.silence_speed).unwrap_or_else(|| {
            let fallback = PlaybackState::default().silence_speed;
            warn!("silence_speed is not a number, using {}", fallback);
            fallback
        });

        let mut store = IntervalStore::new(Box::new(config.margin));
        store.set_timestamps(
            &config.timestamps,
            normal_speed.value(),
            silence_speed.value(),
        );

        Self {
            store,
            state: PlaybackState {
                normal_speed,
                silence_speed,
                phase: SilencePhase::Normal,
            },
            skip_silences: config.skip_silences,
        }
    }

    /// Run the state machine for one time update at clock position `time`.
    pub fn tick<H: MediaHost + ?Sized>(&mut self, time: f64, host: &mut H) -> TickOutcome {
        let hit = if time.is_finite() {
            self.store.lookup(time)
        } else {
            debug!("Ignoring non-finite clock position {time}");
            None
        };

        let target = hit.map(|silence| skip_destination(silence.end, host.duration()));

        match target {
            // A playhead sitting on the end has nothing left to skip.
            Some(to) if self.skip_silences && time < to => {
                self.relocate(to, host);
                host.set_playback_rate(self.state.normal_speed.value());
                self.enter(SilencePhase::Normal, host);
                TickOutcome::Skipped { to }
            }
            Some(skip_target) if !self.skip_silences => {
                host.set_playback_rate(self.state.silence_speed.value());
                self.enter(SilencePhase::InSilence { skip_target }, host);
                TickOutcome::InSilence { skip_target }
            }
            _ => {
                host.set_playback_rate(self.state.normal_speed.value());
                self.enter(SilencePhase::Normal, host);
                TickOutcome::Normal
            }
        }
    }

    /// Jump to the end of the silence being traversed.
    ///
    /// Returns the destination, or `None` when not inside a silence. The skip
    /// target is consumed, so a second call before the next tick is a no-op.
    pub fn skip_current_silence<H: MediaHost + ?Sized>(&mut self, host: &mut H) -> Option<f64> {
        let SilencePhase::InSilence { skip_target } = self.state.phase else {
            return None;
        };

        self.relocate(skip_target, host);
        self.enter(SilencePhase::Normal, host);
        Some(skip_target)
    }

    fn relocate<H: MediaHost + ?Sized>(&self, to: f64, host: &mut H) {
        info!("Skipping silence, jumping to {:.2}s", to);
        host.seek(to);
        host.emit(PlayerEvent::SilenceSkipped { skipped_to: to });
    }

    fn enter<H: MediaHost + ?Sized>(&mut self, phase: SilencePhase, host: &mut H) {
        if self.state.phase != phase {
            debug!("Silence phase {:?} -> {:?}", self.state.phase, phase);
        }
        host.set_skip_available(matches!(phase, SilencePhase::InSilence { .. }));
        self.state.phase = phase;
    }

    /// Replace the silences from a JSON value; malformed input clears them.
    ///
    /// Any pending skip target is dropped and the skip affordance hidden.
    pub fn set_silence_timestamps<H: MediaHost + ?Sized>(
        &mut self,
        value: serde_json::Value,
        host: &mut H,
    ) -> usize {
        self.enter(SilencePhase::Normal, host);
        self.store.set_timestamps_value(
            value,
            self.state.normal_speed.value(),
            self.state.silence_speed.value(),
        )
    }

    /// Replace the silences from already parsed timestamps.
    pub fn set_silence_timestamps_raw<H: MediaHost + ?Sized>(
        &mut self,
        timestamps: &RawTimestamps,
        host: &mut H,
    ) -> usize {
        self.enter(SilencePhase::Normal, host);
        self.store.set_timestamps(
            timestamps,
            self.state.normal_speed.value(),
            self.state.silence_speed.value(),
        )
    }

    /// Renormalize the stored silences with the current speeds.
    pub fn rebuild_silences(&mut self) -> usize {
        self.store.rebuild(
            self.state.normal_speed.value(),
            self.state.silence_speed.value(),
        )
    }

    pub fn silence_timestamps(&self) -> &[SilenceInterval] {
        self.store.intervals()
    }

    pub fn store(&self) -> &IntervalStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut IntervalStore {
        &mut self.store
    }

    /// Set the speed for spoken parts. Applies from the next tick.
    pub fn set_playback_speed(&mut self, speed: f64) -> f64 {
        match Speed::new(speed) {
            Some(s) => self.state.normal_speed = s,
            None => warn!("Ignoring playback speed {speed}"),
        }
        self.state.normal_speed.value()
    }

    /// Set the speed for silences. Applies from the next tick.
    pub fn set_silence_speed(&mut self, speed: f64) -> f64 {
        match Speed::new(speed) {
            Some(s) => self.state.silence_speed = s,
            None => warn!("Ignoring silence speed {speed}"),
        }
        self.state.silence_speed.value()
    }

    pub fn playback_speed(&self) -> f64 {
        self.state.normal_speed.value()
    }

    pub fn silence_speed(&self) -> f64 {
        self.state.silence_speed.value()
    }

    /// The silence containing `time`, if any.
    pub fn current(&self, time: f64) -> Option<SilenceInterval> {
        if !time.is_finite() {
            return None;
        }
        self.store.lookup(time)
    }

    pub fn is_in_silence(&self) -> bool {
        matches!(self.state.phase, SilencePhase::InSilence { .. })
    }

    pub fn skip_target(&self) -> Option<f64> {
        match self.state.phase {
            SilencePhase::InSilence { skip_target } => Some(skip_target),
            SilencePhase::Normal => None,
        }
    }

    /// Toggle automatic skipping. Skips already issued are not undone.
    pub fn set_skip_silences(&mut self, skip: bool) {
        self.skip_silences = skip;
    }

    pub fn skip_silences(&self) -> bool {
        self.skip_silences
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }
}

/// Where a skip out of a silence ending at `end` lands.
///
/// A silence running past the end of the media stops at the duration, the
/// furthest the host can seek.
fn skip_destination(end: f64, duration: f64) -> f64 {
    if duration.is_finite() {
        end.min(duration.max(0.0))
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::SimulatedPlayer;
    use crate::silence::RawInterval;

    #[derive(Debug, Default)]
    struct RecordingHost {
        time: f64,
        rate: f64,
        seeks: Vec<f64>,
        events: Vec<PlayerEvent>,
        skip_available: bool,
    }

    impl MediaHost for RecordingHost {
        fn current_time(&self) -> f64 {
            self.time
        }

        fn duration(&self) -> f64 {
            100.0
        }

        fn set_playback_rate(&mut self, rate: f64) {
            self.rate = rate;
        }

        fn seek(&mut self, time: f64) {
            self.time = time;
            self.seeks.push(time);
        }

        fn emit(&mut self, event: PlayerEvent) {
            self.events.push(event);
        }

        fn set_skip_available(&mut self, available: bool) {
            self.skip_available = available;
        }
    }

    fn controller(skip_silences: bool) -> PlaybackController {
        let config = Config {
            timestamps: RawTimestamps::from(vec![RawInterval::new(10.0, 20.0)]),
            skip_silences,
            ..Default::default()
        };
        PlaybackController::new(&config)
    }

    #[test]
    fn test_tick_inside_silence_speeds_up() {
        let mut ctl = controller(false);
        let mut host = RecordingHost::default();

        let outcome = ctl.tick(15.0, &mut host);

        assert_eq!(host.rate, 8.0);
        assert!(host.skip_available);
        assert!(ctl.is_in_silence());
        let target = ctl.skip_target().unwrap();
        assert!((target - 19.04).abs() < 1e-9);
        assert_eq!(outcome, TickOutcome::InSilence { skip_target: target });
    }

    #[test]
    fn test_tick_outside_silence_restores_speed() {
        let mut ctl = controller(false);
        let mut host = RecordingHost::default();

        ctl.tick(15.0, &mut host);
        let outcome = ctl.tick(25.0, &mut host);

        assert_eq!(outcome, TickOutcome::Normal);
        assert_eq!(host.rate, 1.0);
        assert!(!host.skip_available);
        assert_eq!(ctl.skip_target(), None);
    }

    #[test]
    fn test_auto_skip_relocates_and_notifies() {
        let mut ctl = controller(true);
        let mut host = RecordingHost::default();

        let outcome = ctl.tick(12.0, &mut host);

        let TickOutcome::Skipped { to } = outcome else {
            panic!("expected a skip, got {outcome:?}");
        };
        assert!((to - 19.04).abs() < 1e-9);
        assert_eq!(host.seeks, vec![to]);
        assert_eq!(host.events, vec![PlayerEvent::SilenceSkipped { skipped_to: to }]);
    }

    #[test]
    fn test_auto_skip_not_repeated_at_silence_end() {
        let mut ctl = controller(true);
        let mut host = RecordingHost::default();

        ctl.tick(12.0, &mut host);
        // The host raises a time update right after the seek
        let outcome = ctl.tick(host.time, &mut host);

        assert_eq!(outcome, TickOutcome::Normal);
        assert_eq!(host.events.len(), 1);
    }

    #[test]
    fn test_manual_skip_is_idempotent() {
        let mut ctl = controller(false);
        let mut host = RecordingHost::default();

        ctl.tick(15.0, &mut host);
        let first = ctl.skip_current_silence(&mut host);
        let second = ctl.skip_current_silence(&mut host);

        assert!(first.is_some());
        assert_eq!(second, None);
        assert_eq!(host.seeks.len(), 1);
        assert_eq!(host.events.len(), 1);
        assert!(!host.skip_available);
    }

    #[test]
    fn test_manual_skip_outside_silence_is_noop() {
        let mut ctl = controller(false);
        let mut host = RecordingHost::default();

        ctl.tick(5.0, &mut host);
        assert_eq!(ctl.skip_current_silence(&mut host), None);
        assert!(host.seeks.is_empty());
        assert!(host.events.is_empty());
    }

    #[test]
    fn test_non_finite_tick_is_normal() {
        let mut ctl = controller(true);
        let mut host = RecordingHost::default();

        assert_eq!(ctl.tick(f64::NAN, &mut host), TickOutcome::Normal);
        assert_eq!(ctl.tick(f64::INFINITY, &mut host), TickOutcome::Normal);
        assert_eq!(host.rate, 1.0);
        assert!(host.seeks.is_empty());
    }

    #[test]
    fn test_speed_setters_clamp() {
        let mut ctl = controller(false);

        assert_eq!(ctl.set_playback_speed(0.0), 0.2);
        assert_eq!(ctl.set_playback_speed(100.0), 20.0);
        assert_eq!(ctl.set_silence_speed(f64::NAN), 8.0);
        assert_eq!(ctl.silence_speed(), 8.0);
    }

    #[test]
    fn test_speed_change_applies_next_tick_without_renormalizing() {
        let mut ctl = controller(false);
        let mut host = RecordingHost::default();
        let before = ctl.silence_timestamps().to_vec();

        ctl.set_silence_speed(4.0);
        ctl.tick(15.0, &mut host);

        assert_eq!(host.rate, 4.0);
        assert_eq!(ctl.silence_timestamps(), before.as_slice());

        ctl.rebuild_silences();
        assert!((ctl.silence_timestamps()[0].end - 19.52).abs() < 1e-9);
    }

    #[test]
    fn test_disabling_skip_mode_at_runtime() {
        let mut ctl = controller(true);
        let mut host = RecordingHost::default();

        ctl.set_skip_silences(false);
        let outcome = ctl.tick(12.0, &mut host);

        assert!(matches!(outcome, TickOutcome::InSilence { .. }));
        assert!(host.seeks.is_empty());
    }

    #[test]
    fn test_new_timestamps_reset_skip_target() {
        let mut ctl = controller(false);
        let mut host = RecordingHost::default();

        ctl.tick(15.0, &mut host);
        assert!(ctl.is_in_silence());

        let kept =
            ctl.set_silence_timestamps(serde_json::json!([{"start": 40, "end": 50}]), &mut host);
        assert_eq!(kept, 1);
        assert!(!ctl.is_in_silence());
        assert!(!host.skip_available);
        assert_eq!(ctl.current(15.0), None);
        assert!(ctl.current(45.0).is_some());
    }

    #[test]
    fn test_malformed_timestamps_fall_back_to_normal() {
        let mut ctl = controller(false);
        let mut host = RecordingHost::default();

        assert_eq!(
            ctl.set_silence_timestamps(serde_json::json!("garbage"), &mut host),
            0
        );
        assert_eq!(ctl.tick(15.0, &mut host), TickOutcome::Normal);
        assert_eq!(host.rate, 1.0);
    }

    fn controller_past_media_end(skip_silences: bool) -> PlaybackController {
        let config = Config {
            timestamps: RawTimestamps::from(vec![RawInterval::new(90.0, 110.0)]),
            skip_silences,
            ..Default::default()
        };
        PlaybackController::new(&config)
    }

    #[test]
    fn test_silence_past_media_end_skips_once() {
        let mut ctl = controller_past_media_end(true);
        let mut host = SimulatedPlayer::new(100.0);
        host.current_time = 91.0;

        let outcome = ctl.tick(host.current_time, &mut host);
        assert_eq!(outcome, TickOutcome::Skipped { to: 100.0 });

        // The update queued by the seek still lies inside the silence
        while host.take_pending_time_update() {
            assert_eq!(ctl.tick(host.current_time, &mut host), TickOutcome::Normal);
        }
        assert_eq!(host.seeks, vec![100.0]);
        assert_eq!(
            host.events,
            vec![PlayerEvent::SilenceSkipped { skipped_to: 100.0 }]
        );
    }

    #[test]
    fn test_skip_target_stops_at_media_end() {
        let mut ctl = controller_past_media_end(false);
        let mut host = SimulatedPlayer::new(100.0);

        ctl.tick(95.0, &mut host);

        assert_eq!(ctl.skip_target(), Some(100.0));
        assert_eq!(ctl.skip_current_silence(&mut host), Some(100.0));
        assert_eq!(host.current_time, 100.0);
    }

    #[test]
    fn test_unbounded_interval_never_reaches_host() {
        let mut ctl = controller(true);
        let mut host = RecordingHost::default();

        let kept = ctl.store_mut().set_intervals(
            vec![RawInterval::new(10.0, f64::INFINITY)],
            1.0,
            8.0,
        );

        assert_eq!(kept, 0);
        assert_eq!(ctl.tick(15.0, &mut host), TickOutcome::Normal);
        assert!(host.seeks.is_empty());
        assert!(host.events.is_empty());
    }
}
