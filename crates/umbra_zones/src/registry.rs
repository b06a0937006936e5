//! Registry of active shadow zones
//!
//! Zones are owned elsewhere (scene streaming, the simulation root); the
//! registry only keeps weak back-references for lookup. Entries whose zone
//! has been dropped are skipped by every query and pruned lazily.

use crate::zone::ShadowZone;
use std::rc::{Rc, Weak};
use umbra_core::ZoneId;
use umbra_math::{angle_between_degrees, OcclusionQuery, Vec3};

/// Half-angle of the forward cone used by [`ShadowRegistry::closest_visible`]
pub const LINK_CONE_DEGREES: f32 = 45.0;

/// Set of registered zones, kept in registration order
#[derive(Debug, Default)]
pub struct ShadowRegistry {
    zones: Vec<Weak<ShadowZone>>,
}

impl ShadowRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone. Registering a zone id that is already live is a no-op.
    pub fn register(&mut self, zone: &Rc<ShadowZone>) -> bool {
        self.prune();

        if self.get(zone.id()).is_some() {
            log::debug!("Zone {} already registered", zone.id());
            return false;
        }

        self.zones.push(Rc::downgrade(zone));
        true
    }

    /// Unregister a zone. Removing an absent zone is a no-op.
    pub fn unregister(&mut self, id: ZoneId) -> bool {
        self.prune();

        let before = self.zones.len();
        self.zones
            .retain(|weak| weak.upgrade().map_or(false, |zone| zone.id() != id));
        let removed = self.zones.len() != before;
        if !removed {
            log::debug!("Zone {} was not registered", id);
        }
        removed
    }

    /// Drop entries whose zone no longer exists
    pub fn prune(&mut self) {
        self.zones.retain(|weak| weak.strong_count() > 0);
    }

    /// Look up a live zone by id
    pub fn get(&self, id: ZoneId) -> Option<Rc<ShadowZone>> {
        self.iter().find(|zone| zone.id() == id)
    }

    /// Whether a live zone with this id is registered
    pub fn contains(&self, id: ZoneId) -> bool {
        self.get(id).is_some()
    }

    /// Live zones in registration order
    pub fn iter(&self) -> impl Iterator<Item = Rc<ShadowZone>> + '_ {
        self.zones.iter().filter_map(Weak::upgrade)
    }

    /// Number of live zones
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no live zone is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closest zone whose centre is within `max_distance` of `from`, inside
    /// the forward cone and not hidden behind an occluder.
    ///
    /// Ties at the minimum distance go to the zone registered first.
    pub fn closest_visible(
        &self,
        from: Vec3,
        forward: Vec3,
        max_distance: f32,
        occluders: &dyn OcclusionQuery,
        exclude: Option<ZoneId>,
    ) -> Option<Rc<ShadowZone>> {
        let mut best: Option<(f32, Rc<ShadowZone>)> = None;

        for zone in self.iter() {
            if Some(zone.id()) == exclude {
                continue;
            }

            let center = zone.center();
            let distance = from.distance(center);
            if distance > max_distance {
                continue;
            }

            if angle_between_degrees(forward, center - from) > LINK_CONE_DEGREES {
                continue;
            }

            if occluders.blocks_segment(from, center, None) {
                continue;
            }

            let closer = best.as_ref().map_or(true, |(d, _)| distance < *d);
            if closer {
                best = Some((distance, zone));
            }
        }

        best.map(|(_, zone)| zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_math::{Occluder, OccluderSet, AABB};

    fn zone_at(id: u64, center: Vec3) -> Rc<ShadowZone> {
        Rc::new(ShadowZone::new(
            ZoneId::new(id),
            AABB::from_center_half_extents(center, Vec3::splat(0.5)),
        ))
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ShadowRegistry::new();
        let zone = zone_at(1, Vec3::ZERO);

        assert!(registry.register(&zone));
        assert!(!registry.register(&zone));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let mut registry = ShadowRegistry::new();
        let zone = zone_at(1, Vec3::ZERO);
        registry.register(&zone);

        assert!(!registry.unregister(ZoneId::new(99)));
        assert!(registry.unregister(ZoneId::new(1)));
        assert!(!registry.unregister(ZoneId::new(1)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dropped_zone_disappears() {
        let mut registry = ShadowRegistry::new();
        let zone = zone_at(1, Vec3::ZERO);
        registry.register(&zone);
        drop(zone);

        assert!(registry.is_empty());
        assert!(!registry.contains(ZoneId::new(1)));

        // Same id can be registered again once the old zone is gone
        let again = zone_at(1, Vec3::ONE);
        assert!(registry.register(&again));
    }

    #[test]
    fn test_closest_visible_picks_nearer() {
        let mut registry = ShadowRegistry::new();
        let far = zone_at(1, Vec3::new(0.0, 0.0, 7.0));
        let near = zone_at(2, Vec3::new(0.0, 0.0, 3.0));
        registry.register(&far);
        registry.register(&near);

        let found = registry
            .closest_visible(Vec3::ZERO, Vec3::Z, 10.0, &OccluderSet::new(), None)
            .unwrap();
        assert_eq!(found.id(), ZoneId::new(2));
    }

    #[test]
    fn test_closest_visible_none_when_out_of_range_or_cone() {
        let mut registry = ShadowRegistry::new();
        let too_far = zone_at(1, Vec3::new(0.0, 0.0, 15.0));
        let behind = zone_at(2, Vec3::new(0.0, 0.0, -3.0));
        let to_the_side = zone_at(3, Vec3::new(5.0, 0.0, 1.0));
        registry.register(&too_far);
        registry.register(&behind);
        registry.register(&to_the_side);

        let found =
            registry.closest_visible(Vec3::ZERO, Vec3::Z, 10.0, &OccluderSet::new(), None);
        assert!(found.is_none());
    }

    #[test]
    fn test_closest_visible_boundaries_inclusive() {
        let mut registry = ShadowRegistry::new();
        let at_edge = zone_at(1, Vec3::new(0.0, 0.0, 10.0));
        registry.register(&at_edge);

        let found =
            registry.closest_visible(Vec3::ZERO, Vec3::Z, 10.0, &OccluderSet::new(), None);
        assert_eq!(found.map(|z| z.id()), Some(ZoneId::new(1)));
    }

    #[test]
    fn test_closest_visible_respects_exclude() {
        let mut registry = ShadowRegistry::new();
        let current = zone_at(1, Vec3::new(0.0, 0.0, 2.0));
        let other = zone_at(2, Vec3::new(0.0, 0.0, 6.0));
        registry.register(&current);
        registry.register(&other);

        let found = registry
            .closest_visible(Vec3::ZERO, Vec3::Z, 10.0, &OccluderSet::new(), Some(ZoneId::new(1)))
            .unwrap();
        assert_eq!(found.id(), ZoneId::new(2));
    }

    #[test]
    fn test_closest_visible_tie_goes_to_first_registered() {
        let mut registry = ShadowRegistry::new();
        let left = zone_at(1, Vec3::new(-1.0, 0.0, 4.0));
        let right = zone_at(2, Vec3::new(1.0, 0.0, 4.0));
        registry.register(&left);
        registry.register(&right);

        let found = registry
            .closest_visible(Vec3::ZERO, Vec3::Z, 10.0, &OccluderSet::new(), None)
            .unwrap();
        assert_eq!(found.id(), ZoneId::new(1));
    }

    #[test]
    fn test_closest_visible_skips_occluded() {
        let mut registry = ShadowRegistry::new();
        let hidden = zone_at(1, Vec3::new(0.0, 0.0, 3.0));
        let open = zone_at(2, Vec3::new(0.0, 0.0, 7.0));
        registry.register(&hidden);
        registry.register(&open);

        // Occluder on the shared line of sight hides both zones
        let occluders = OccluderSet::new().with(Occluder::sphere(Vec3::new(0.0, 0.0, 1.5), 0.4));
        let found = registry
            .closest_visible(Vec3::new(0.0, 0.0, 0.0), Vec3::Z, 10.0, &occluders, None);
        assert!(found.is_none());

        // Occluder between the two zones only hides the far one
        let occluders = OccluderSet::new().with(Occluder::sphere(Vec3::new(0.0, 0.0, 5.0), 0.4));
        let found = registry
            .closest_visible(Vec3::ZERO, Vec3::Z, 10.0, &occluders, None)
            .unwrap();
        assert_eq!(found.id(), ZoneId::new(1));
    }
}
