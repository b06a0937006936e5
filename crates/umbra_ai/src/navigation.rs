//! Navigation movement service
//!
//! Guards never path-find themselves. They talk to a [`NavigationService`]
//! that moves an agent toward a destination and reports progress. The
//! [`NavAgent`] here is a straight-line implementation used by the headless
//! simulation and tests; a navmesh-backed agent plugs in through the same
//! trait.

use umbra_math::Vec3;

/// Per-agent movement service
pub trait NavigationService {
    /// Request movement toward a point
    fn set_destination(&mut self, point: Vec3);
    /// Current destination, if any
    fn destination(&self) -> Option<Vec3>;
    /// Set movement speed
    fn set_speed(&mut self, speed: f32);
    /// Current movement speed
    fn speed(&self) -> f32;
    /// Pause (`true`) or resume (`false`) movement
    fn halt(&mut self, halted: bool);
    /// Whether movement is paused
    fn is_halted(&self) -> bool;
    /// Distance left to the destination
    fn remaining_distance(&self) -> f32;
    /// Whether a path is still being computed
    fn is_path_pending(&self) -> bool;
    /// Current velocity
    fn velocity(&self) -> Vec3;
    /// Distance at which the destination counts as reached
    fn stopping_distance(&self) -> f32;
}

/// Straight-line navigation agent
#[derive(Debug, Clone, PartialEq)]
pub struct NavAgent {
    /// Current position
    pub position: Vec3,
    /// Facing, follows the direction of travel on the ground plane
    pub forward: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Movement speed
    pub speed: f32,
    /// Arrival threshold
    pub stopping_distance: f32,
    destination: Option<Vec3>,
    halted: bool,
    path_pending: bool,
}

impl NavAgent {
    /// Create an agent standing at `position`, facing `forward`
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.horizontal().normalize_or_zero(),
            velocity: Vec3::ZERO,
            speed: 3.0,
            stopping_distance: 0.5,
            destination: None,
            halted: false,
            path_pending: false,
        }
    }

    /// Set arrival threshold
    pub fn with_stopping_distance(mut self, distance: f32) -> Self {
        self.stopping_distance = distance;
        self
    }

    /// Move instantly, dropping the current destination
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
        self.destination = None;
        self.path_pending = false;
        self.velocity = Vec3::ZERO;
    }

    /// Whether the destination is reached (or there is none)
    pub fn has_arrived(&self) -> bool {
        !self.path_pending && self.remaining_distance() <= self.stopping_distance
    }

    /// Advance movement by one tick. A destination set since the last
    /// update resolves its path here before moving.
    pub fn update(&mut self, delta_time: f32) {
        self.path_pending = false;

        let destination = match self.destination {
            Some(d) if !self.halted && delta_time > 0.0 => d,
            _ => {
                self.velocity = Vec3::ZERO;
                return;
            }
        };

        let distance = self.position.distance(destination);
        if distance <= self.stopping_distance {
            self.velocity = Vec3::ZERO;
            return;
        }

        let next = self.position.move_towards(destination, self.speed * delta_time);
        let step = next - self.position;
        self.velocity = step / delta_time;
        self.position = next;

        let heading = step.horizontal().normalize_or_zero();
        if heading != Vec3::ZERO {
            self.forward = heading;
        }
    }
}

impl NavigationService for NavAgent {
    fn set_destination(&mut self, point: Vec3) {
        if self.destination != Some(point) {
            self.path_pending = true;
        }
        self.destination = Some(point);
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn halt(&mut self, halted: bool) {
        self.halted = halted;
        if halted {
            self.velocity = Vec3::ZERO;
        }
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map_or(0.0, |d| self.position.distance(d))
    }

    fn is_path_pending(&self) -> bool {
        self.path_pending
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}
