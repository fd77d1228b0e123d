use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeedupError {
    #[error("Invalid silence timestamps: {0}")]
    InvalidTimestamps(String),

    #[error("Timestamp import failed: {0}")]
    Import(String),

    #[error("Simulation failed: {0}")]
    Simulation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SpeedupError>;
