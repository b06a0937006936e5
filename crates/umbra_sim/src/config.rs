//! Scenario configuration
//!
//! A scenario describes one level: difficulty, guards, the target, shadow
//! zones, win zones and occluding geometry. Points are `[x, y, z]` arrays.
//!
//! # Example Scenario
//!
//! ```toml
//! difficulty = "hard"
//! tick_rate = 60
//! duration = 30.0
//!
//! [target]
//! spawn = [0.0, 0.0, -8.0]
//! route = [[0.0, 0.0, 0.0], [6.0, 0.0, 4.0]]
//! speed = 2.5
//!
//! [[guards]]
//! archetype = "Patrollable"
//! spawn = [0.0, 0.0, 10.0]
//! facing = [0.0, 0.0, -1.0]
//! waypoints = [[0.0, 0.0, 10.0], [8.0, 0.0, 10.0]]
//!
//! [[zones]]
//! min = [-1.0, 0.0, -1.0]
//! max = [1.0, 2.0, 1.0]
//!
//! [[occluders]]
//! shape = "box"
//! min = [-3.0, 0.0, 4.0]
//! max = [3.0, 3.0, 4.5]
//! ```
//!
//! The `UMBRA_DIFFICULTY` environment variable overrides the file's tier.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use umbra_ai::{GuardArchetype, PerceptionConfig};
use umbra_gamestate::{Difficulty, DifficultyTable};
use umbra_math::{Occluder, AABB};
use umbra_zones::ShadowLinkConfig;

/// Scenario shipped with the binary
pub const BUILTIN_SCENARIO: &str = include_str!("../scenarios/courtyard.toml");

/// Guard placement and route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default)]
    pub archetype: GuardArchetype,
    pub spawn: [f32; 3],
    #[serde(default = "default_facing")]
    pub facing: [f32; 3],
    #[serde(default)]
    pub waypoints: Vec<[f32; 3]>,
    #[serde(default = "default_wait_time")]
    pub wait_time: f32,
    /// Per-guard tunables; tier fields are still overridden by difficulty
    #[serde(default)]
    pub perception: Option<PerceptionConfig>,
}

fn default_facing() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}

fn default_wait_time() -> f32 {
    2.0
}

/// Scripted target for headless runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub spawn: [f32; 3],
    /// Points walked in order after spawning
    pub route: Vec<[f32; 3]>,
    pub speed: f32,
    /// Crouch whenever concealed
    pub crouch_in_shadow: bool,
    /// Times at which the shadow link is pressed (released half a second later)
    pub link_at: Vec<f32>,
    /// Camera facing used for shadow link aiming
    pub camera_forward: [f32; 3],
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            spawn: [0.0, 0.0, 0.0],
            route: Vec::new(),
            speed: 2.5,
            crouch_in_shadow: true,
            link_at: Vec::new(),
            camera_forward: [0.0, 0.0, 1.0],
        }
    }
}

/// Box volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl VolumeConfig {
    pub fn bounds(&self) -> AABB {
        AABB::new(self.min.into(), self.max.into())
    }
}

/// Shadow zone volume with optional marker point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
    #[serde(default)]
    pub surface: Option<[f32; 3]>,
}

impl ZoneConfig {
    pub fn bounds(&self) -> AABB {
        AABB::new(self.min.into(), self.max.into())
    }
}

/// Occluding geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum OccluderConfig {
    Box { min: [f32; 3], max: [f32; 3] },
    Sphere { center: [f32; 3], radius: f32 },
}

impl OccluderConfig {
    pub fn to_occluder(&self) -> Occluder {
        match *self {
            Self::Box { min, max } => Occluder::wall(min.into(), max.into()),
            Self::Sphere { center, radius } => Occluder::sphere(center.into(), radius),
        }
    }
}

/// Complete scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub difficulty: Difficulty,
    /// Replaces the built-in tier table
    pub tiers: Option<DifficultyTable>,
    /// Ticks per second
    pub tick_rate: u32,
    /// Seconds simulated by the headless runner
    pub duration: f32,
    /// Tunables for guards without their own
    pub perception: PerceptionConfig,
    pub link: ShadowLinkConfig,
    pub target: TargetConfig,
    pub guards: Vec<GuardConfig>,
    pub zones: Vec<ZoneConfig>,
    pub win_zones: Vec<VolumeConfig>,
    pub occluders: Vec<OccluderConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            tiers: None,
            tick_rate: 60,
            duration: 30.0,
            perception: PerceptionConfig::default(),
            link: ShadowLinkConfig::default(),
            target: TargetConfig::default(),
            guards: Vec::new(),
            zones: Vec::new(),
            win_zones: Vec::new(),
            occluders: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a scenario
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a scenario file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The scenario shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_SCENARIO)
    }

    /// Apply environment overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(tier) = std::env::var("UMBRA_DIFFICULTY") {
            match tier.parse() {
                Ok(tier) => {
                    self.difficulty = tier;
                    log::info!("Difficulty from env: {}", self.difficulty);
                }
                Err(e) => log::warn!("Ignoring UMBRA_DIFFICULTY: {}", e),
            }
        }
    }

    /// Fixed tick length
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Reject scenarios that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(SimError::InvalidScenario("tick_rate must be positive".into()));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(SimError::InvalidScenario("duration must be non-negative".into()));
        }
        if !(self.target.speed.is_finite() && self.target.speed > 0.0) {
            return Err(SimError::InvalidScenario("target speed must be positive".into()));
        }
        if let Some(tiers) = &self.tiers {
            tiers.validate()?;
        }

        self.perception.validate()?;
        for (index, guard) in self.guards.iter().enumerate() {
            if let Some(perception) = &guard.perception {
                perception.validate()?;
            }
            if !(guard.wait_time.is_finite() && guard.wait_time >= 0.0) {
                return Err(SimError::InvalidScenario(format!(
                    "guard {} wait_time must be non-negative",
                    index
                )));
            }
            if guard.archetype == GuardArchetype::Patrollable && guard.waypoints.is_empty() {
                log::warn!("Patrolling guard {} has no waypoints and will stand still", index);
            }
        }

        Ok(())
    }

    /// Print a short summary
    pub fn print_summary(&self) {
        log::info!("Scenario:");
        log::info!("  Difficulty: {}", self.difficulty);
        log::info!("  Tick rate: {} Hz, duration {:.1}s", self.tick_rate, self.duration);
        log::info!("  Guards: {}", self.guards.len());
        log::info!(
            "  Zones: {} shadow, {} win, {} occluders",
            self.zones.len(),
            self.win_zones.len(),
            self.occluders.len()
        );
    }
}
