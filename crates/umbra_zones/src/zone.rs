//! Shadow zone volume

use umbra_core::ZoneId;
use umbra_math::{Vec3, AABB};

/// Height above the zone centre used when no surface point is authored
const SURFACE_FALLBACK_LIFT: f32 = 0.3;

/// A volume the target can hide in
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowZone {
    id: ZoneId,
    bounds: AABB,
    surface_point: Vec3,
}

impl ShadowZone {
    /// Create a zone; the surface point defaults to just above the centre
    pub fn new(id: ZoneId, bounds: AABB) -> Self {
        Self {
            id,
            bounds,
            surface_point: bounds.center() + Vec3::UP * SURFACE_FALLBACK_LIFT,
        }
    }

    /// Override the point where link markers are placed
    pub fn with_surface_point(mut self, point: Vec3) -> Self {
        self.surface_point = point;
        self
    }

    /// Zone id
    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Zone volume
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// Centre of the volume
    pub fn center(&self) -> Vec3 {
        self.bounds.center()
    }

    /// Point on the zone surface (link marker position)
    pub fn surface_point(&self) -> Vec3 {
        self.surface_point
    }

    /// Whether a point is inside the volume
    pub fn contains(&self, point: Vec3) -> bool {
        self.bounds.contains_point(point)
    }
}
