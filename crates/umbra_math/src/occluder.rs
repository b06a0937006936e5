//! Occluding geometry for line-of-sight raycasts

use crate::bounds::{AABB, Sphere};
use crate::intersect::{ray_aabb, ray_sphere};
use crate::ray::Ray;
use crate::vector::Vec3;

/// Shape of an occluder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OccluderShape {
    /// Axis-aligned box (walls, crates, pillars)
    Box(AABB),
    /// Sphere (rocks, round props)
    Sphere(Sphere),
}

impl OccluderShape {
    /// Distance along the ray to the first hit, if any
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        match self {
            Self::Box(aabb) => ray_aabb(ray, aabb),
            Self::Sphere(sphere) => ray_sphere(ray, sphere),
        }
    }
}

/// A piece of geometry that blocks sight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occluder {
    /// Shape in world space
    pub shape: OccluderShape,
    /// Entity that owns this geometry (used to exclude the target's own body)
    pub owner: Option<u64>,
}

impl Occluder {
    /// Create a box occluder from two corners
    pub fn wall(min: Vec3, max: Vec3) -> Self {
        Self {
            shape: OccluderShape::Box(AABB::new(min, max)),
            owner: None,
        }
    }

    /// Create a sphere occluder
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self {
            shape: OccluderShape::Sphere(Sphere::new(center, radius)),
            owner: None,
        }
    }

    /// Attach this occluder to an owning entity
    pub fn with_owner(mut self, owner: u64) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Anything that can answer "does geometry block this segment"
pub trait OcclusionQuery {
    /// Nearest hit distance along `ray` within `max_distance`, skipping
    /// geometry owned by `ignore`.
    fn raycast(&self, ray: &Ray, max_distance: f32, ignore: Option<u64>) -> Option<f32>;

    /// Whether the segment `from -> to` is blocked
    fn blocks_segment(&self, from: Vec3, to: Vec3, ignore: Option<u64>) -> bool {
        match Ray::between(from, to) {
            Some((ray, distance)) => self.raycast(&ray, distance, ignore).is_some(),
            None => false,
        }
    }
}

/// Flat list of occluders, scanned linearly
#[derive(Debug, Clone, Default)]
pub struct OccluderSet {
    occluders: Vec<Occluder>,
}

impl OccluderSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an occluder
    pub fn push(&mut self, occluder: Occluder) {
        self.occluders.push(occluder);
    }

    /// Builder-style add
    pub fn with(mut self, occluder: Occluder) -> Self {
        self.push(occluder);
        self
    }

    /// Number of occluders
    pub fn len(&self) -> usize {
        self.occluders.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.occluders.is_empty()
    }

    /// Iterate occluders
    pub fn iter(&self) -> impl Iterator<Item = &Occluder> {
        self.occluders.iter()
    }
}

impl OcclusionQuery for OccluderSet {
    fn raycast(&self, ray: &Ray, max_distance: f32, ignore: Option<u64>) -> Option<f32> {
        self.occluders
            .iter()
            .filter(|o| ignore.is_none() || o.owner != ignore)
            .filter_map(|o| o.shape.raycast(ray))
            .filter(|&t| t <= max_distance)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal))
    }
}
