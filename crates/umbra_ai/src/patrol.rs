//! Waypoint patrolling

use crate::navigation::NavigationService;
use umbra_math::Vec3;

/// Cycles an agent through a fixed list of points, waiting at each
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPatroller {
    waypoints: Vec<Vec3>,
    wait_time: f32,
    /// Index of the waypoint issued next
    next_index: usize,
    waiting: bool,
    wait_timer: f32,
    enabled: bool,
}

impl WaypointPatroller {
    /// Create a patroller. With no waypoints it never issues anything.
    pub fn new(waypoints: Vec<Vec3>, wait_time: f32) -> Self {
        Self {
            waypoints,
            wait_time,
            next_index: 0,
            waiting: false,
            wait_timer: 0.0,
            enabled: true,
        }
    }

    /// The patrol route
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Pause between waypoints
    pub fn wait_time(&self) -> f32 {
        self.wait_time
    }

    /// Whether the route is empty
    pub fn is_inert(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the waypoint that will be issued next
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Whether the patroller is holding at a waypoint
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Whether the patroller is driven
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable driving; the owner toggles this from guard state
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Issue the first destination
    pub fn start(&mut self) -> Option<Vec3> {
        self.go_to_next()
    }

    /// Advance the wait/arrival logic by one tick.
    ///
    /// Returns a new destination when one should be issued.
    pub fn advance(
        &mut self,
        delta_time: f32,
        remaining_distance: f32,
        stopping_distance: f32,
        path_pending: bool,
    ) -> Option<Vec3> {
        if !self.enabled || path_pending || self.waypoints.is_empty() {
            return None;
        }

        if !self.waiting && remaining_distance <= stopping_distance {
            self.waiting = true;
            self.wait_timer = self.wait_time;
        }

        if self.waiting {
            self.wait_timer -= delta_time;
            if self.wait_timer <= 0.0 {
                self.waiting = false;
                return self.go_to_next();
            }
        }

        None
    }

    /// Advance against a navigation service, issuing any new destination to it
    pub fn drive(&mut self, delta_time: f32, nav: &mut dyn NavigationService) -> Option<Vec3> {
        let next = self.advance(
            delta_time,
            nav.remaining_distance(),
            nav.stopping_distance(),
            nav.is_path_pending(),
        );
        if let Some(point) = next {
            nav.set_destination(point);
        }
        next
    }

    fn go_to_next(&mut self) -> Option<Vec3> {
        let point = *self.waypoints.get(self.next_index)?;
        log::trace!("Patrol heading to waypoint {}", self.next_index);
        self.next_index = (self.next_index + 1) % self.waypoints.len();
        Some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavAgent;

    fn route() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
        ]
    }

    #[test]
    fn test_waits_then_cycles() {
        let points = route();
        let mut patroller = WaypointPatroller::new(points.clone(), 2.0);
        assert_eq!(patroller.start(), Some(points[0]));

        // Arrived at waypoint 0: hold for 2.0 in 0.5 steps
        let mut issued = Vec::new();
        for _ in 0..4 {
            issued.push(patroller.advance(0.5, 0.0, 0.5, false));
        }
        assert_eq!(issued, vec![None, None, None, Some(points[1])]);

        // Still travelling: nothing happens
        assert_eq!(patroller.advance(0.5, 8.0, 0.5, false), None);
        assert!(!patroller.is_waiting());

        let mut next = None;
        for _ in 0..4 {
            next = patroller.advance(0.5, 0.2, 0.5, false);
        }
        assert_eq!(next, Some(points[2]));

        for _ in 0..4 {
            next = patroller.advance(0.5, 0.0, 0.5, false);
        }
        assert_eq!(next, Some(points[0]));
    }

    #[test]
    fn test_pending_path_blocks_arrival() {
        let mut patroller = WaypointPatroller::new(route(), 1.0);
        patroller.start();
        assert_eq!(patroller.advance(5.0, 0.0, 0.5, true), None);
        assert!(!patroller.is_waiting());
    }

    #[test]
    fn test_disabled_and_empty_are_inert() {
        let mut empty = WaypointPatroller::new(Vec::new(), 1.0);
        assert!(empty.is_inert());
        assert_eq!(empty.start(), None);
        assert_eq!(empty.advance(5.0, 0.0, 0.5, false), None);

        let mut patroller = WaypointPatroller::new(route(), 1.0);
        patroller.start();
        patroller.set_enabled(false);
        assert_eq!(patroller.advance(5.0, 0.0, 0.5, false), None);
        assert!(!patroller.is_waiting());
    }

    #[test]
    fn test_drive_walks_the_route() {
        let points = vec![Vec3::new(0.0, 0.0, 3.0), Vec3::new(3.0, 0.0, 3.0)];
        let mut agent = NavAgent::new(Vec3::ZERO, Vec3::Z);
        let mut patroller = WaypointPatroller::new(points.clone(), 0.5);
        agent.set_destination(patroller.start().unwrap());

        let mut issued = Vec::new();
        for _ in 0..40 {
            if let Some(point) = patroller.drive(0.1, &mut agent) {
                issued.push(point);
            }
            agent.update(0.1);
        }

        assert_eq!(issued.first(), Some(&points[1]));
        assert!(issued.len() >= 2);
    }
}
