pub mod config;
pub mod error;
pub mod player;
pub mod remaining;
pub mod session;
pub mod silence;
pub mod simulate;

pub use config::Config;
pub use error::{Result, SpeedupError};
pub use player::{MediaHost, PlaybackController, PlayerEvent, TickOutcome};
pub use remaining::{estimate, format_clock, RemainingTime};
pub use session::SpeedupSession;
pub use silence::{IntervalStore, RawTimestamps, SilenceInterval};
pub use simulate::{print_summary, simulate, SimulationConfig, SimulationReport};
