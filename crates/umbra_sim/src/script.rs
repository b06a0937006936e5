//! Scripted target for headless runs

use crate::config::TargetConfig;
use crate::simulation::Simulation;
use umbra_math::Vec3;

/// How long a scripted link press is held before release
pub const LINK_HOLD_TIME: f32 = 0.5;

/// Arrival tolerance for route points
const ARRIVE_EPSILON: f32 = 1e-3;

/// Walks the target along a route, crouching in shadow and pressing the
/// shadow link at fixed times
#[derive(Debug, Clone)]
pub struct TargetScript {
    route: Vec<Vec3>,
    next: usize,
    speed: f32,
    crouch_in_shadow: bool,
    /// Pending press times, ascending
    presses: Vec<f32>,
    release_at: Option<f32>,
    time: f32,
}

impl TargetScript {
    pub fn new(route: Vec<Vec3>, speed: f32) -> Self {
        Self {
            route,
            next: 0,
            speed,
            crouch_in_shadow: true,
            presses: Vec::new(),
            release_at: None,
            time: 0.0,
        }
    }

    pub fn from_config(config: &TargetConfig) -> Self {
        let route = config.route.iter().copied().map(Vec3::from).collect();
        Self::new(route, config.speed)
            .with_crouch_in_shadow(config.crouch_in_shadow)
            .with_link_presses(config.link_at.clone())
    }

    pub fn with_crouch_in_shadow(mut self, crouch: bool) -> Self {
        self.crouch_in_shadow = crouch;
        self
    }

    pub fn with_link_presses(mut self, mut times: Vec<f32>) -> Self {
        times.retain(|t| t.is_finite());
        times.sort_by(|a, b| a.total_cmp(b));
        self.presses = times;
        self
    }

    /// Whether every route point has been reached
    pub fn is_finished(&self) -> bool {
        self.next >= self.route.len()
    }

    /// Script time, which stops while the game is paused
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Feed one tick of input to the simulation
    pub fn step(&mut self, delta_time: f32, sim: &mut Simulation) {
        let dt = delta_time * sim.game().time_scale();
        if dt <= 0.0 {
            return;
        }
        self.time += dt;

        let Some(position) = sim.target().map(|target| target.position) else {
            return;
        };

        // The target is carried by the link while a sequence runs
        if !sim.link().in_sequence() {
            if let Some(&waypoint) = self.route.get(self.next) {
                let moved = position.move_towards(waypoint, self.speed * dt);
                if moved.distance(waypoint) <= ARRIVE_EPSILON {
                    self.next += 1;
                }
                sim.set_target_position(moved);
            }
        }

        sim.set_crouching(self.crouch_in_shadow && sim.shadow().is_concealed());

        if self.release_at.map_or(false, |at| self.time >= at) {
            self.release_at = None;
            sim.release_link();
        }

        if self.presses.first().map_or(false, |&at| self.time >= at) {
            self.presses.remove(0);
            self.release_at = Some(self.time + LINK_HOLD_TIME);
            sim.press_link();
        }
    }
}
