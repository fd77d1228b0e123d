use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, SpeedupError};
use crate::player::{SimulatedPlayer, TickOutcome};
use crate::remaining::format_clock;
use crate::session::SpeedupSession;

/// Time updates a seek may chain before the simulation gives up on it.
const MAX_CHAINED_UPDATES: usize = 8;

/// Configuration for a simulated playback run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Total media duration in seconds.
    pub duration: f64,
    /// Wall-clock seconds between time updates (browsers fire ~every 250ms).
    pub tick_interval: f64,
    /// Show a progress bar.
    pub show_progress: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: 0.0,
            tick_interval: 0.25,
            show_progress: true,
        }
    }
}

/// Statistics from a simulated playback run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Media duration played through.
    pub media_duration: f64,
    /// Wall-clock seconds the playback took.
    pub wall_time: f64,
    /// Corrected remaining time predicted before playback started.
    pub initial_estimate: f64,
    /// Time updates delivered, including those raised by seeks.
    pub ticks: usize,
    /// Ticks that landed inside a silence.
    pub silence_ticks: usize,
    /// Silences skipped.
    pub skips: usize,
    /// Number of normalized silences.
    pub silences: usize,
    /// Seconds of normalized silence.
    pub total_silence: f64,
    pub playback_speed: f64,
    pub silence_speed: f64,
}

impl SimulationReport {
    /// Wall-clock seconds saved compared to playing at 1x.
    pub fn time_saved(&self) -> f64 {
        self.media_duration - self.wall_time
    }
}

/// Play the whole timeline through a [`SimulatedPlayer`].
pub fn simulate(config: &Config, sim: &SimulationConfig) -> Result<SimulationReport> {
    if !sim.duration.is_finite() || sim.duration < 0.0 {
        return Err(SpeedupError::Simulation(format!(
            "Media duration must be a non-negative number, got {}",
            sim.duration
        )));
    }
    if !sim.tick_interval.is_finite() || sim.tick_interval <= 0.0 {
        return Err(SpeedupError::Simulation(format!(
            "Tick interval must be positive, got {}",
            sim.tick_interval
        )));
    }
    config.validate()?;

    let mut session = SpeedupSession::new(SimulatedPlayer::new(sim.duration), config);
    session.on_ready();

    let initial_estimate = session.real_remaining_time().real_seconds;
    info!(
        "Simulating {} of media, estimated {} at the configured speeds",
        format_clock(sim.duration),
        format_clock(initial_estimate)
    );

    let progress = if sim.show_progress {
        let pb = ProgressBar::new(sim.duration.ceil() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}s {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut wall_time = 0.0;
    let mut ticks = 0;
    let mut silence_ticks = 0;
    let mut skips = 0;

    loop {
        // Deliver the tick plus any update the host queued while seeking
        let mut chained = 0;
        loop {
            ticks += 1;
            match session.on_time_update() {
                TickOutcome::Skipped { .. } => skips += 1,
                TickOutcome::InSilence { .. } => silence_ticks += 1,
                TickOutcome::Normal => {}
            }
            if !session.host_mut().take_pending_time_update() {
                break;
            }
            chained += 1;
            if chained >= MAX_CHAINED_UPDATES {
                debug!("Dropping time updates chained by repeated seeks");
                break;
            }
        }

        if session.host().ended() {
            break;
        }

        session.host_mut().advance(sim.tick_interval);
        wall_time += sim.tick_interval;

        if let Some(pb) = &progress {
            let host = session.host();
            pb.set_position(host.current_time.floor() as u64);
            pb.set_message(host.remaining_text.clone().unwrap_or_default());
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message(format!("✓ Played in {}", format_clock(wall_time)));
    }

    let report = SimulationReport {
        media_duration: sim.duration,
        wall_time,
        initial_estimate,
        ticks,
        silence_ticks,
        skips,
        silences: session.silence_timestamps().len(),
        total_silence: session.controller().store().total_silence(),
        playback_speed: session.playback_speed(),
        silence_speed: session.silence_speed(),
    };
    session.dispose();

    info!(
        "Simulation complete: {:.1}s wall time for {:.1}s of media",
        report.wall_time, report.media_duration
    );
    Ok(report)
}

/// Print a summary of the simulation results.
pub fn print_summary(report: &SimulationReport) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     Silence Speed-up Simulation                ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Media:      {}", format_clock(report.media_duration));
    println!(
        "  Silences:   {} ({:.1}s)",
        report.silences, report.total_silence
    );
    println!(
        "  Speeds:     {:.1}x speech, {:.1}x silence",
        report.playback_speed, report.silence_speed
    );
    println!();
    println!("  Timing:");
    println!("    Estimated:   {}", format_clock(report.initial_estimate));
    println!("    Played in:   {}", format_clock(report.wall_time));
    println!("    Saved:       {:.1}s", report.time_saved());
    println!(
        "    Ticks:       {} ({} in silence, {} skips)",
        report.ticks, report.silence_ticks, report.skips
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
