//! Error types for the simulation root

use thiserror::Error;
use umbra_ai::AiError;
use umbra_core::GuardId;
use umbra_gamestate::DifficultyError;

/// Simulation errors
#[derive(Debug, Error)]
pub enum SimError {
    /// Scenario file could not be read
    #[error("Failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario TOML could not be parsed
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    /// Scenario is well-formed but unusable
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    /// Guard construction failed
    #[error(transparent)]
    Ai(#[from] AiError),

    /// Difficulty table or tier problem
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),

    /// No guard with this id
    #[error("Unknown guard: {0}")]
    UnknownGuard(GuardId),
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
