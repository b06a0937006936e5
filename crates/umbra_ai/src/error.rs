//! Error types for guard AI

use thiserror::Error;

/// Guard AI errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AiError {
    /// Tunables that no guard could run with
    #[error("Invalid guard config: {0}")]
    InvalidConfig(String),

    /// A collaborator the guard depends on is not set
    #[error("Missing reference: {0}")]
    MissingReference(&'static str),
}

/// Result type for guard AI operations
pub type Result<T> = std::result::Result<T, AiError>;
