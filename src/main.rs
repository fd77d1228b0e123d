use anyhow::{Context, Result};
use clap::Parser;
use silence_speedup::config::Config;
use silence_speedup::silence::{load_timestamps, TimestampFormat};
use silence_speedup::simulate::{print_summary, simulate, SimulationConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "silence-speedup")]
#[command(version, about = "Play silences faster and see how long playback really takes")]
#[command(long_about = "Load silence timestamps for a media file and simulate playback with silences sped up or skipped.")]
struct Cli {
    /// Silence timestamps file (JSON or ffmpeg silencedetect log)
    timestamps: PathBuf,

    /// Media duration in seconds
    #[arg(short, long)]
    duration: f64,

    /// Timestamp format: json, silencedetect (guessed from the extension by default)
    #[arg(short = 'f', long)]
    input_format: Option<String>,

    /// Speed for spoken parts (0.2 - 20)
    #[arg(short, long)]
    playback_speed: Option<f64>,

    /// Speed inside silences (0.2 - 20)
    #[arg(short, long)]
    silence_speed: Option<f64>,

    /// Skip silences instead of speeding them up
    #[arg(long)]
    skip: bool,

    /// Seconds between simulated time updates
    #[arg(long, default_value = "0.25")]
    tick: f64,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Parse format
    let format = match cli.input_format.as_deref() {
        Some(f) => f
            .parse::<TimestampFormat>()
            .map_err(|e: String| anyhow::anyhow!(e))?,
        None => TimestampFormat::from_path(&cli.timestamps),
    };

    // Load configuration, then let the command line win
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(speed) = cli.playback_speed {
        config.playback_speed = speed;
    }
    if let Some(speed) = cli.silence_speed {
        config.silence_speed = speed;
    }
    if cli.skip {
        config.skip_silences = true;
    }
    config.timestamps = load_timestamps(&cli.timestamps, format, Some(cli.duration))
        .with_context(|| format!("Failed to load {}", cli.timestamps.display()))?;
    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Timestamps: {} ({})", cli.timestamps.display(), format);
    info!("Silences:   {}", config.timestamps.len());
    info!("Duration:   {:.1}s", cli.duration);

    let sim = SimulationConfig {
        duration: cli.duration,
        tick_interval: cli.tick,
        show_progress: !cli.no_progress,
    };
    let report = simulate(&config, &sim).context("Simulation failed")?;

    print_summary(&report);
    Ok(())
}
