//! Umbra GameState - Outcome and Difficulty
//!
//! This crate provides the process-wide game services guards talk to.
//!
//! # Features
//!
//! - Idempotent win/lose notification (first call wins)
//! - Time scaling and input freeze on game over
//! - Pause menu toggling
//! - Difficulty tiers (Easy/Normal/Hard) loaded from TOML
//!
//! # Example
//!
//! ```ignore
//! use umbra_gamestate::prelude::*;
//!
//! let mut outcome = GameOutcome::new();
//! outcome.trigger_lose();
//! assert!(!outcome.trigger_win()); // already decided
//!
//! let manager = DifficultyManager::new(DifficultyTable::default(), Difficulty::Hard);
//! let settings = manager.current_settings();
//! ```

pub mod difficulty;
pub mod error;
pub mod outcome;

pub mod prelude {
    pub use crate::difficulty::{
        Difficulty, DifficultyManager, DifficultyProvider, DifficultySettings, DifficultyTable,
    };
    pub use crate::error::DifficultyError;
    pub use crate::outcome::{GameOutcome, Outcome, OutcomeNotifier};
}

pub use prelude::*;
