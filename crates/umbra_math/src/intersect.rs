//! Intersection tests for raycasting
//!
//! Provides ray intersection tests against the primitives occluders are
//! built from:
//! - AABB (Axis-Aligned Bounding Box)
//! - Sphere

use crate::bounds::{AABB, Sphere};
use crate::ray::Ray;
use crate::vector::Vec3;

/// Ray-AABB intersection using the slab method
///
/// Returns the distance along the ray to the intersection point,
/// or None if the ray doesn't intersect the AABB.
pub fn ray_aabb(ray: &Ray, aabb: &AABB) -> Option<f32> {
    let inv_dir = ray.inverse_direction();

    let (t1, t2) = slab(ray.origin.x, inv_dir.x, aabb.min.x, aabb.max.x)?;
    let (t3, t4) = slab(ray.origin.y, inv_dir.y, aabb.min.y, aabb.max.y)?;
    let (t5, t6) = slab(ray.origin.z, inv_dir.z, aabb.min.z, aabb.max.z)?;

    let tmin = t1.max(t3).max(t5);
    let tmax = t2.min(t4).min(t6);

    // If tmax < 0, ray is intersecting AABB but behind origin
    // If tmin > tmax, ray doesn't intersect
    if tmax < 0.0 || tmin > tmax {
        None
    } else {
        // Return the first positive intersection
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Entry/exit distances for one axis slab.
///
/// An axis-parallel ray either lies inside the slab for its whole length or
/// misses the box entirely.
#[inline]
fn slab(origin: f32, inv_dir: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if inv_dir.is_infinite() {
        if origin < min || origin > max {
            return None;
        }
        return Some((f32::NEG_INFINITY, f32::INFINITY));
    }

    let a = (min - origin) * inv_dir;
    let b = (max - origin) * inv_dir;
    Some((a.min(b), a.max(b)))
}

/// Ray-Sphere intersection
///
/// Returns the distance along the ray to the nearest intersection point,
/// or None if the ray doesn't intersect the sphere.
pub fn ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    ray_sphere_at(ray, sphere.center, sphere.radius)
}

/// Ray-sphere test for a unit-direction ray.
///
/// A ray starting inside reports the exit distance.
pub fn ray_sphere_at(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = ray.origin - center;
    let half_b = to_origin.dot(ray.direction);
    let c = to_origin.length_squared() - radius * radius;

    // Outside and pointing away
    if c > 0.0 && half_b > 0.0 {
        return None;
    }

    let discriminant = half_b * half_b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = -half_b - root;
    if near > 0.0 {
        return Some(near);
    }
    let far = -half_b + root;
    (far > 0.0).then_some(far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));

        let t = ray_aabb(&ray, &aabb).unwrap();
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_aabb_miss() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, -5.0), Vec3::Z);
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(ray_aabb(&ray, &aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));

        // Starting inside: exit point is reported
        let t = ray_aabb(&ray, &aabb).unwrap();
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_aabb_behind() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(ray_aabb(&ray, &aabb).is_none());
    }

    #[test]
    fn test_ray_aabb_axis_parallel_on_face_plane() {
        // Direction has zero x/y components and the origin sits on the min-x plane
        let ray = Ray::new(Vec3::new(-1.0, 0.0, -5.0), Vec3::Z);
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(ray_aabb(&ray, &aabb).is_some());
    }

    #[test]
    fn test_ray_sphere_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let sphere = Sphere::new(Vec3::ZERO, 1.0);

        let t = ray_sphere(&ray, &sphere).unwrap();
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, -5.0), Vec3::Z);
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        assert!(ray_sphere(&ray, &sphere).is_none());
    }
}
