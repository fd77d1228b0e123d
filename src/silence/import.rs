//! Import silence timestamps produced by external tools.

use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Result, SpeedupError};

use super::timestamps::{RawInterval, RawTimestamps};

/// Supported timestamp file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// Either JSON shape accepted by [`RawTimestamps`].
    #[default]
    Json,
    /// Log output of ffmpeg's `silencedetect` audio filter.
    SilenceDetect,
}

impl std::fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampFormat::Json => write!(f, "json"),
            TimestampFormat::SilenceDetect => write!(f, "silencedetect"),
        }
    }
}

impl std::str::FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(TimestampFormat::Json),
            "silencedetect" | "ffmpeg" => Ok(TimestampFormat::SilenceDetect),
            _ => Err(format!(
                "Unknown timestamp format: {}. Use 'json' or 'silencedetect'",
                s
            )),
        }
    }
}

impl TimestampFormat {
    /// Guess the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("log") | Some("txt") => TimestampFormat::SilenceDetect,
            _ => TimestampFormat::Json,
        }
    }
}

/// Parse `silencedetect` output into raw intervals.
///
/// ```text
/// [silencedetect @ 0x55d0] silence_start: 12.48
/// [silencedetect @ 0x55d0] silence_end: 15.02 | silence_duration: 2.54
/// ```
///
/// A start left open at the end of the log is closed at `media_duration`
/// when known.
pub fn parse_silencedetect(log: &str, media_duration: Option<f64>) -> Result<Vec<RawInterval>> {
    let marker_re = Regex::new(r"silence_(start|end):\s*(-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?)")
        .map_err(|e| SpeedupError::Import(format!("Invalid silencedetect pattern: {e}")))?;

    let mut intervals = Vec::new();
    let mut open_start: Option<f64> = None;

    for cap in marker_re.captures_iter(log) {
        let (Some(kind), Some(value)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        let seconds: f64 = value.as_str().parse().map_err(|e| {
            SpeedupError::Import(format!("Bad silencedetect value '{}': {e}", value.as_str()))
        })?;

        match kind.as_str() {
            "start" => {
                if let Some(previous) = open_start {
                    warn!("silence_start at {previous}s has no matching silence_end");
                }
                // ffmpeg reports slightly negative starts for leading silence
                open_start = Some(seconds.max(0.0));
            }
            _ => match open_start.take() {
                Some(start) => intervals.push(RawInterval::new(start, seconds)),
                None => warn!("silence_end at {seconds}s has no matching silence_start"),
            },
        }
    }

    if let Some(start) = open_start {
        match media_duration {
            Some(end) if end.is_finite() => intervals.push(RawInterval::new(start, end)),
            _ => warn!("Dropping trailing silence at {start}s: media duration unknown"),
        }
    }

    debug!("Parsed {} silences from silencedetect output", intervals.len());
    Ok(intervals)
}

/// Load timestamps from a file in the given format.
pub fn load_timestamps(
    path: &Path,
    format: TimestampFormat,
    media_duration: Option<f64>,
) -> Result<RawTimestamps> {
    if !path.exists() {
        return Err(SpeedupError::Import(format!(
            "Timestamp file not found: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    match format {
        TimestampFormat::Json => RawTimestamps::from_json_str(&contents),
        TimestampFormat::SilenceDetect => {
            parse_silencedetect(&contents, media_duration).map(RawTimestamps::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
[silencedetect @ 0x55d0c8] silence_start: -0.0123
[silencedetect @ 0x55d0c8] silence_end: 2.5 | silence_duration: 2.5123
size=N/A time=00:00:10.00 bitrate=N/A speed= 250x
[silencedetect @ 0x55d0c8] silence_start: 12.48
[silencedetect @ 0x55d0c8] silence_end: 15.02 | silence_duration: 2.54
[silencedetect @ 0x55d0c8] silence_start: 58
";

    #[test]
    fn test_parse_silencedetect_pairs() {
        let intervals = parse_silencedetect(SAMPLE_LOG, None).unwrap();

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0], RawInterval::new(0.0, 2.5));
        assert_eq!(intervals[1], RawInterval::new(12.48, 15.02));
    }

    #[test]
    fn test_parse_silencedetect_closes_trailing_silence() {
        let intervals = parse_silencedetect(SAMPLE_LOG, Some(60.0)).unwrap();

        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[2], RawInterval::new(58.0, 60.0));
    }

    #[test]
    fn test_parse_silencedetect_ignores_orphan_end() {
        let log = "silence_end: 4.0 | silence_duration: 1.0\nsilence_start: 6\nsilence_end: 7";
        let intervals = parse_silencedetect(log, None).unwrap();
        assert_eq!(intervals, vec![RawInterval::new(6.0, 7.0)]);
    }

    #[test]
    fn test_parse_silencedetect_empty() {
        assert!(parse_silencedetect("no markers here", Some(10.0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(
            "json".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::Json
        );
        assert_eq!(
            "SilenceDetect".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::SilenceDetect
        );
        assert!("srt".parse::<TimestampFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            TimestampFormat::from_path(Path::new("talk.silences.json")),
            TimestampFormat::Json
        );
        assert_eq!(
            TimestampFormat::from_path(Path::new("ffmpeg.log")),
            TimestampFormat::SilenceDetect
        );
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_timestamps(
            Path::new("/nonexistent/silences.json"),
            TimestampFormat::Json,
            None,
        );
        assert!(matches!(result, Err(SpeedupError::Import(_))));
    }
}
