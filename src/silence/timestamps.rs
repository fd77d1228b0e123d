use serde::{Deserialize, Serialize};

use crate::error::{Result, SpeedupError};

/// A silence as supplied by the caller, before any margin is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawInterval {
    pub start: f64,
    pub end: f64,
}

impl RawInterval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// A single entry of the array-of-pairs shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPair {
    Object {
        #[serde(alias = "t_start")]
        start: f64,
        #[serde(alias = "t_end")]
        end: f64,
    },
    Tuple(f64, f64),
}

impl RawPair {
    fn bounds(&self) -> (f64, f64) {
        match *self {
            RawPair::Object { start, end } => (start, end),
            RawPair::Tuple(start, end) => (start, end),
        }
    }
}

/// Raw silence timestamps in one of the two accepted shapes.
///
/// ```json
/// [{"start": 10, "end": 20}, [31.5, 40]]
/// {"start": [10, 31.5], "end": [20, 40]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamps {
    Pairs(Vec<RawPair>),
    Parallel { start: Vec<f64>, end: Vec<f64> },
}

impl Default for RawTimestamps {
    fn default() -> Self {
        RawTimestamps::Pairs(Vec::new())
    }
}

impl From<Vec<RawInterval>> for RawTimestamps {
    fn from(intervals: Vec<RawInterval>) -> Self {
        RawTimestamps::Pairs(
            intervals
                .into_iter()
                .map(|i| RawPair::Object {
                    start: i.start,
                    end: i.end,
                })
                .collect(),
        )
    }
}

impl RawTimestamps {
    /// Parse timestamps from an arbitrary JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            SpeedupError::InvalidTimestamps(format!(
                "expected an array of {{start, end}} pairs or parallel start/end arrays ({e})"
            ))
        })
    }

    /// Parse timestamps from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn len(&self) -> usize {
        match self {
            RawTimestamps::Pairs(pairs) => pairs.len(),
            RawTimestamps::Parallel { start, .. } => start.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into raw intervals, checking that the collection is well formed.
    ///
    /// Inverted pairs are kept here; normalization discards them.
    pub fn to_intervals(&self) -> Result<Vec<RawInterval>> {
        let pairs: Vec<(f64, f64)> = match self {
            RawTimestamps::Pairs(pairs) => pairs.iter().map(RawPair::bounds).collect(),
            RawTimestamps::Parallel { start, end } => {
                if start.len() != end.len() {
                    return Err(SpeedupError::InvalidTimestamps(format!(
                        "{} start values but {} end values",
                        start.len(),
                        end.len()
                    )));
                }
                start.iter().copied().zip(end.iter().copied()).collect()
            }
        };

        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| {
                if start.is_finite() && end.is_finite() {
                    Ok(RawInterval::new(start, end))
                } else {
                    Err(SpeedupError::InvalidTimestamps(format!(
                        "entry {i} is not a finite pair: ({start}, {end})"
                    )))
                }
            })
            .collect()
    }
}
