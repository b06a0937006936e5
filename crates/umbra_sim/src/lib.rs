//! Umbra Sim - Simulation Root
//!
//! Wires the stealth guard crates into one world and drives it with a fixed
//! tick.
//!
//! # Features
//!
//! - Single owner of the outcome, difficulty and shadow services
//! - Fixed per-tick order: zones, shadow link, win zones, guards
//! - Pause menu and game-over time scaling
//! - TOML scenarios with a built-in fallback
//! - Scripted target for headless runs
//!
//! # Example
//!
//! ```ignore
//! use umbra_sim::prelude::*;
//!
//! let config = SimConfig::builtin()?;
//! let mut sim = Simulation::from_config(&config)?;
//! let mut script = TargetScript::from_config(&config.target);
//!
//! while sim.outcome().is_none() {
//!     script.step(config.tick_seconds(), &mut sim);
//!     sim.tick(config.tick_seconds());
//! }
//! ```

pub mod config;
pub mod error;
pub mod script;
pub mod simulation;

pub mod prelude {
    pub use crate::config::{
        GuardConfig, OccluderConfig, SimConfig, TargetConfig, VolumeConfig, ZoneConfig,
        BUILTIN_SCENARIO,
    };
    pub use crate::error::SimError;
    pub use crate::script::{TargetScript, LINK_HOLD_TIME};
    pub use crate::simulation::{SimEvent, SimTarget, Simulation, CAMERA_HEIGHT};
}

pub use prelude::*;
