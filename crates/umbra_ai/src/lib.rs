//! Umbra AI - Guard Perception and Behaviour
//!
//! This crate provides the stealth guard: what it sees, how it patrols and
//! how it chases and gives up.
//!
//! # Features
//!
//! - Visibility probe (distance, view cone, occluders, concealment)
//! - Detection timer with decay, two-stage lose/inspect exit from a chase
//! - Table-driven guard state machine per archetype
//! - Waypoint patrolling with waits
//! - Navigation service trait with a straight-line agent
//! - Audio/animation cue signals emitted on change
//!
//! # Example
//!
//! ```ignore
//! use umbra_ai::prelude::*;
//!
//! let config = PerceptionConfig::default().apply_difficulty(&settings);
//! let brain = GuardBrain::new(id, GuardArchetype::Patrollable, config, spawn)?;
//! let mut guard = GuardController::new(brain, WaypointPatroller::new(route, 2.0), agent);
//!
//! guard.tick(dt, &GuardContext { target, shadow: &shadow, occluders: &occluders });
//! for signal in guard.drain_signals() {
//!     // route Lose to the outcome notifier, cues to audio/animation
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod patrol;
pub mod perception;
pub mod state_machine;

pub mod prelude {
    pub use crate::config::PerceptionConfig;
    pub use crate::controller::GuardController;
    pub use crate::error::AiError;
    pub use crate::guard::{
        DetectionTimers, Footsteps, GuardBrain, GuardContext, GuardPose, GuardSignal,
        TargetSnapshot, ATTACK_LOSE_DELAY,
    };
    pub use crate::navigation::{NavAgent, NavigationService};
    pub use crate::patrol::WaypointPatroller;
    pub use crate::perception::{eye_point, is_visible, Concealment, SightQuery};
    pub use crate::state_machine::{
        guard_machine, guard_transition, GuardArchetype, GuardEvent, GuardState, StateMachine,
    };
}

pub use prelude::*;
