//! Error types for parsing, configuration and submission validation.
//!
//! Engine computations never fail; inconsistent data is reported through
//! [`crate::resolver::Anomaly`] values instead.

use thiserror::Error;

/// Result type alias for fallible pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors raised while loading a snapshot or configuration
#[derive(Error, Debug)]
pub enum PoolError {
    /// Snapshot JSON could not be decoded
    #[error("Snapshot decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config TOML could not be decoded
    #[error("Config decode error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of range
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PoolError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Reasons a set of rankings is rejected at submission time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RankingsError {
    #[error("No points assigned to {0}")]
    MissingTeam(String),

    #[error("{0} is not in the bracket")]
    UnknownTeam(String),

    #[error("Point value {points} for {team} is outside 1..={max}")]
    OutOfRange { team: String, points: u32, max: u32 },

    #[error("Point value {0} is assigned more than once")]
    DuplicatePoints(u32),
}
