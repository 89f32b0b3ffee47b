// Error type shared by every module of the crate.
// Data-integrity problems (missing season record, misconfigured round table) are fatal,
// everything per-game is handled inside the engine and never surfaces here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayoffError {
    #[error("playoff series not found for season {0}")]
    SeriesNotFound(i32),

    #[error("round {round} has no series length configured ({configured} rounds configured)")]
    RoundOutOfRange { round: i32, configured: usize },

    #[error("invalid bracket: {0}")]
    InvalidBracket(String),

    #[error("failed to deliver event: {0}")]
    Event(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlayoffError>;
