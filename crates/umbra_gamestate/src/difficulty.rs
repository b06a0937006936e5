//! Difficulty tiers and the settings they select
//!
//! A tier selects one complete [`DifficultySettings`] snapshot. Consumers
//! replace their tunables with the whole snapshot, never a subset, so a guard
//! always runs on values from a single tier.
//!
//! # Example Table
//!
//! ```toml
//! [easy]
//! view_radius = 8.0
//! detection_time = 3.0
//! lose_player_time = 2.0
//!
//! [normal]
//! view_radius = 10.0
//! detection_time = 2.0
//! lose_player_time = 3.0
//!
//! [hard]
//! view_radius = 14.0
//! detection_time = 1.0
//! lose_player_time = 5.0
//! ```

use crate::error::{DifficultyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Normal
    }
}

impl Difficulty {
    /// All tiers, in index order
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Index used by menus (0=Easy, 1=Normal, 2=Hard)
    pub fn index(&self) -> i32 {
        match self {
            Self::Easy => 0,
            Self::Normal => 1,
            Self::Hard => 2,
        }
    }

    /// Tier from a menu index
    pub fn from_index(index: i32) -> Result<Self> {
        match index {
            0 => Ok(Self::Easy),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Hard),
            other => Err(DifficultyError::UnknownIndex(other)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Normal => write!(f, "normal"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" | "medium" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(DifficultyError::UnknownTier(s.to_string())),
        }
    }
}

/// Guard tunables selected by a tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// How far guards can see
    pub view_radius: f32,
    /// Sustained sight needed before a chase starts
    pub detection_time: f32,
    /// Time out of sight before a chasing guard gives up pursuit
    pub lose_player_time: f32,
}

impl DifficultySettings {
    /// Reject values no guard could run with
    pub fn validate(&self, tier: Difficulty) -> Result<()> {
        let invalid = |reason: &str| DifficultyError::InvalidSettings {
            tier: tier.to_string(),
            reason: reason.to_string(),
        };

        if !(self.view_radius.is_finite() && self.view_radius > 0.0) {
            return Err(invalid("view_radius must be positive"));
        }
        if !(self.detection_time.is_finite() && self.detection_time >= 0.0) {
            return Err(invalid("detection_time must be non-negative"));
        }
        if !(self.lose_player_time.is_finite() && self.lose_player_time >= 0.0) {
            return Err(invalid("lose_player_time must be non-negative"));
        }
        Ok(())
    }
}

/// One settings snapshot per tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultySettings,
    pub normal: DifficultySettings,
    pub hard: DifficultySettings,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultySettings {
                view_radius: 8.0,
                detection_time: 3.0,
                lose_player_time: 2.0,
            },
            normal: DifficultySettings {
                view_radius: 10.0,
                detection_time: 2.0,
                lose_player_time: 3.0,
            },
            hard: DifficultySettings {
                view_radius: 14.0,
                detection_time: 1.0,
                lose_player_time: 5.0,
            },
        }
    }
}

impl DifficultyTable {
    /// Settings for a tier
    pub fn get(&self, tier: Difficulty) -> DifficultySettings {
        match tier {
            Difficulty::Easy => self.easy,
            Difficulty::Normal => self.normal,
            Difficulty::Hard => self.hard,
        }
    }

    /// Validate every tier
    pub fn validate(&self) -> Result<()> {
        for tier in Difficulty::ALL {
            self.get(tier).validate(tier)?;
        }
        Ok(())
    }

    /// Parse and validate a table from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: Self = toml::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Supplies the settings for the active tier
pub trait DifficultyProvider {
    /// Active tier
    fn current_difficulty(&self) -> Difficulty;
    /// Settings of the active tier
    fn current_settings(&self) -> DifficultySettings;
}

/// Single-instance difficulty service
#[derive(Debug, Clone)]
pub struct DifficultyManager {
    current: Difficulty,
    table: DifficultyTable,
}

impl DifficultyManager {
    /// Create a manager on a given tier
    pub fn new(table: DifficultyTable, current: Difficulty) -> Self {
        Self { current, table }
    }

    /// Switch tier
    pub fn set_difficulty(&mut self, tier: Difficulty) {
        if tier != self.current {
            log::info!("Difficulty set to {}", tier);
        }
        self.current = tier;
    }

    /// Switch tier from a menu index
    pub fn set_difficulty_index(&mut self, index: i32) -> Result<()> {
        let tier = Difficulty::from_index(index)?;
        self.set_difficulty(tier);
        Ok(())
    }

    /// The tier table
    pub fn table(&self) -> &DifficultyTable {
        &self.table
    }
}

impl Default for DifficultyManager {
    fn default() -> Self {
        Self::new(DifficultyTable::default(), Difficulty::default())
    }
}

impl DifficultyProvider for DifficultyManager {
    fn current_difficulty(&self) -> Difficulty {
        self.current
    }

    fn current_settings(&self) -> DifficultySettings {
        self.table.get(self.current)
    }
}
