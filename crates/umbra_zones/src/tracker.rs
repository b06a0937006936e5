//! Enter/Exit tracking of one entity against the registered zones

use crate::events::ZoneEvent;
use crate::registry::ShadowRegistry;
use umbra_core::{EntityId, ZoneId};
use umbra_math::Vec3;

/// Tracks which zones an entity is inside and emits boundary events
#[derive(Debug, Clone)]
pub struct ZoneTracker {
    /// Tracked entity
    entity: EntityId,
    /// Zones currently occupied with time spent inside, in enter order
    inside: Vec<(ZoneId, f32)>,
    /// Events from the last update
    events: Vec<ZoneEvent>,
}

impl ZoneTracker {
    /// Create a tracker for an entity that starts outside every zone
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            inside: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Tracked entity
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Whether the entity is inside a zone
    pub fn is_inside(&self, zone: ZoneId) -> bool {
        self.inside.iter().any(|(id, _)| *id == zone)
    }

    /// Time spent inside a zone, if currently inside
    pub fn time_in_zone(&self, zone: ZoneId) -> Option<f32> {
        self.inside
            .iter()
            .find(|(id, _)| *id == zone)
            .map(|(_, time)| *time)
    }

    /// Events from the last update
    pub fn events(&self) -> &[ZoneEvent] {
        &self.events
    }

    /// Test `position` against every live zone.
    ///
    /// Exits are reported before enters so a hand-over between touching
    /// zones ends on the new zone. Zones that disappeared while occupied
    /// produce an exit.
    pub fn update(&mut self, delta_time: f32, position: Vec3, registry: &ShadowRegistry) -> &[ZoneEvent] {
        self.events.clear();

        let occupied: Vec<ZoneId> = registry
            .iter()
            .filter(|zone| zone.contains(position))
            .map(|zone| zone.id())
            .collect();

        let entity = self.entity;
        let events = &mut self.events;
        self.inside.retain(|(id, time)| {
            if occupied.contains(id) {
                true
            } else {
                events.push(ZoneEvent::exit(*id, entity, *time));
                false
            }
        });

        for (_, time) in &mut self.inside {
            *time += delta_time;
        }

        for id in occupied {
            if !self.inside.iter().any(|(inside, _)| *inside == id) {
                self.inside.push((id, 0.0));
                self.events.push(ZoneEvent::enter(id, entity));
            }
        }

        for event in &self.events {
            log::debug!("{} {:?} {}", event.entity, event.event_type, event.zone);
        }

        &self.events
    }

    /// Leave every zone, returning the exit events
    pub fn clear(&mut self) -> &[ZoneEvent] {
        let entity = self.entity;
        self.events = self
            .inside
            .drain(..)
            .map(|(id, time)| ZoneEvent::exit(id, entity, time))
            .collect();
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ZoneEventType;
    use crate::shadow_state::TargetShadowState;
    use crate::zone::ShadowZone;
    use approx::assert_relative_eq;
    use std::rc::Rc;
    use umbra_math::AABB;

    fn zone(id: u64, min: Vec3, max: Vec3) -> Rc<ShadowZone> {
        Rc::new(ShadowZone::new(ZoneId::new(id), AABB::new(min, max)))
    }

    #[test]
    fn test_enter_and_exit() {
        let a = zone(1, Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let mut registry = ShadowRegistry::new();
        registry.register(&a);

        let mut tracker = ZoneTracker::new(EntityId::new(1));
        assert!(tracker.update(0.1, Vec3::new(-1.0, 1.0, 1.0), &registry).is_empty());

        let events = tracker.update(0.1, Vec3::new(1.0, 1.0, 1.0), &registry).to_vec();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_enter());
        assert_eq!(events[0].zone, ZoneId::new(1));

        // Staying inside produces nothing
        assert!(tracker.update(0.5, Vec3::new(1.5, 1.0, 1.0), &registry).is_empty());
        assert_relative_eq!(tracker.time_in_zone(ZoneId::new(1)).unwrap(), 0.5);

        let events = tracker.update(0.25, Vec3::new(5.0, 1.0, 1.0), &registry).to_vec();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_exit());
        assert_relative_eq!(events[0].time_in_zone, 0.5);
        assert!(!tracker.is_inside(ZoneId::new(1)));
    }

    #[test]
    fn test_hand_over_reports_exit_first() {
        let a = zone(1, Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let b = zone(2, Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 2.0));
        let mut registry = ShadowRegistry::new();
        registry.register(&a);
        registry.register(&b);

        let mut tracker = ZoneTracker::new(EntityId::new(1));
        let mut shadow = TargetShadowState::new();

        for event in tracker.update(0.1, Vec3::new(1.0, 1.0, 1.0), &registry) {
            shadow.apply(event);
        }
        let events = tracker.update(0.1, Vec3::new(3.0, 1.0, 1.0), &registry).to_vec();
        let types: Vec<_> = events.iter().map(|e| (e.event_type, e.zone.raw())).collect();
        assert_eq!(types, vec![(ZoneEventType::Exit, 1), (ZoneEventType::Enter, 2)]);

        for event in &events {
            shadow.apply(event);
        }
        assert_eq!(shadow.current_zone(), Some(ZoneId::new(2)));
    }

    #[test]
    fn test_vanished_zone_exits() {
        let a = zone(1, Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let mut registry = ShadowRegistry::new();
        registry.register(&a);

        let mut tracker = ZoneTracker::new(EntityId::new(1));
        tracker.update(0.1, Vec3::ONE, &registry);
        drop(a);

        let events = tracker.update(0.1, Vec3::ONE, &registry).to_vec();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_exit());
    }

    #[test]
    fn test_clear_exits_everything() {
        let a = zone(1, Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let mut registry = ShadowRegistry::new();
        registry.register(&a);

        let mut tracker = ZoneTracker::new(EntityId::new(1));
        tracker.update(0.1, Vec3::ONE, &registry);
        assert_eq!(tracker.clear().len(), 1);
        assert!(!tracker.is_inside(ZoneId::new(1)));
    }
}
