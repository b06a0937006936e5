//! Guard perception and movement tunables

use crate::error::{AiError, Result};
use serde::{Deserialize, Serialize};
use umbra_gamestate::DifficultySettings;

/// Everything a guard needs to see, detect, chase and give up.
///
/// Angles are in degrees, times in seconds, distances in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// How far the guard can see
    pub view_radius: f32,
    /// Full field of view; the sight cone uses half of it on each side
    pub view_angle: f32,
    /// Sustained sight needed before a chase starts
    pub detection_time: f32,
    /// Time out of sight before the guard stops and inspects
    pub lose_player_time: f32,
    /// Time spent inspecting before giving up
    pub inspection_time: f32,
    /// Distance at which a visible target is caught
    pub kill_distance: f32,
    /// Movement speed while patrolling or returning
    pub walk_speed: f32,
    /// Movement speed while chasing
    pub chase_speed: f32,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            view_radius: 10.0,
            view_angle: 90.0,
            detection_time: 2.0,
            lose_player_time: 3.0,
            inspection_time: 3.0,
            kill_distance: 6.5,
            walk_speed: 3.0,
            chase_speed: 5.0,
        }
    }
}

impl PerceptionConfig {
    /// Set view radius
    pub fn with_view_radius(mut self, radius: f32) -> Self {
        self.view_radius = radius;
        self
    }

    /// Set field of view in degrees
    pub fn with_view_angle(mut self, degrees: f32) -> Self {
        self.view_angle = degrees;
        self
    }

    /// Set detection time
    pub fn with_detection_time(mut self, seconds: f32) -> Self {
        self.detection_time = seconds;
        self
    }

    /// Set lose-player time
    pub fn with_lose_player_time(mut self, seconds: f32) -> Self {
        self.lose_player_time = seconds;
        self
    }

    /// Set inspection time
    pub fn with_inspection_time(mut self, seconds: f32) -> Self {
        self.inspection_time = seconds;
        self
    }

    /// Set kill distance
    pub fn with_kill_distance(mut self, distance: f32) -> Self {
        self.kill_distance = distance;
        self
    }

    /// Set walk and chase speeds
    pub fn with_speeds(mut self, walk: f32, chase: f32) -> Self {
        self.walk_speed = walk;
        self.chase_speed = chase;
        self
    }

    /// Replace the tier-controlled fields with one difficulty snapshot
    pub fn apply_difficulty(&self, settings: &DifficultySettings) -> Self {
        Self {
            view_radius: settings.view_radius,
            detection_time: settings.detection_time,
            lose_player_time: settings.lose_player_time,
            ..*self
        }
    }

    /// Reject values instead of clamping them
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(AiError::InvalidConfig(format!("{} must be positive, got {}", name, value)))
            }
        }

        fn non_negative(name: &str, value: f32) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(AiError::InvalidConfig(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )))
            }
        }

        positive("view_radius", self.view_radius)?;
        if !(0.0..=360.0).contains(&self.view_angle) {
            return Err(AiError::InvalidConfig(format!(
                "view_angle must be within [0, 360], got {}",
                self.view_angle
            )));
        }
        non_negative("detection_time", self.detection_time)?;
        non_negative("lose_player_time", self.lose_player_time)?;
        non_negative("inspection_time", self.inspection_time)?;
        non_negative("kill_distance", self.kill_distance)?;
        positive("walk_speed", self.walk_speed)?;
        positive("chase_speed", self.chase_speed)?;
        Ok(())
    }
}
