//! Error types for game state services

use thiserror::Error;

/// Difficulty configuration errors
#[derive(Debug, Error)]
pub enum DifficultyError {
    /// Tier name not recognised
    #[error("Unknown difficulty tier: {0}")]
    UnknownTier(String),

    /// Tier index not recognised
    #[error("Unknown difficulty index: {0}")]
    UnknownIndex(i32),

    /// A tier holds values that cannot drive a guard
    #[error("Invalid {tier} difficulty settings: {reason}")]
    InvalidSettings { tier: String, reason: String },

    /// TOML could not be parsed
    #[error("Failed to parse difficulty table: {0}")]
    Parse(#[from] toml::de::Error),

    /// File could not be read
    #[error("Failed to read difficulty table: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for difficulty operations
pub type Result<T> = std::result::Result<T, DifficultyError>;
