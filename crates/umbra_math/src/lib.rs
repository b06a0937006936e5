//! # umbra_math - Geometry for Line-of-Sight Queries
//!
//! Small, allocation-free primitives used by guard perception and zone
//! tracking: vectors, rays, box and sphere volumes, ray intersection, and
//! the occluder set sight lines are tested against.

pub mod bounds;
pub mod intersect;
pub mod occluder;
pub mod ray;
pub mod vector;

pub use bounds::*;
pub use intersect::*;
pub use occluder::*;
pub use ray::*;
pub use vector::*;

pub mod consts {
    /// Shortest segment treated as having a direction
    pub const EPSILON: f32 = 1e-6;
}

pub mod prelude {
    pub use crate::bounds::{Sphere, AABB};
    pub use crate::intersect::{ray_aabb, ray_sphere, ray_sphere_at};
    pub use crate::occluder::{Occluder, OccluderSet, OccluderShape, OcclusionQuery};
    pub use crate::ray::Ray;
    pub use crate::vector::{angle_between_degrees, Vec3};
}
