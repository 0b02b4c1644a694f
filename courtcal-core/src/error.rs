//! Error types for the courtcal ecosystem.

use thiserror::Error;

/// Errors that can occur in courtcal operations.
#[derive(Error, Debug)]
pub enum CourtCalError {
    #[error("Unknown team, conference, or division: '{0}'")]
    UnknownTeam(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch schedule: {0}")]
    Fetch(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for courtcal operations.
pub type CourtCalResult<T> = Result<T, CourtCalError>;
