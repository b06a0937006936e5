//! Volumes used for zones, win areas and occluders

use crate::vector::Vec3;

/// Axis-aligned box; `min <= max` on every axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    /// Box spanning two opposite corners, given in any order
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box of the given half size around `center`
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self::new(center - half, center + half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Faces count as inside
    pub fn contains_point(&self, p: Vec3) -> bool {
        let inside = |v: f32, lo: f32, hi: f32| v >= lo && v <= hi;
        inside(p.x, self.min.x, self.max.x)
            && inside(p.y, self.min.y, self.max.y)
            && inside(p.z, self.min.z, self.max.z)
    }
}

/// Ball occluder volume
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.distance(self.center) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_faces_are_inside() {
        let zone = AABB::new(Vec3::new(-8.0, 0.0, 0.0), Vec3::new(-4.0, 4.0, 4.0));
        assert!(zone.contains_point(Vec3::new(-6.0, 0.0, 2.0)));
        assert!(zone.contains_point(Vec3::new(-4.0, 4.0, 4.0)));
        assert!(!zone.contains_point(Vec3::new(-3.9, 1.0, 2.0)));
    }

    #[test]
    fn test_corners_in_any_order() {
        let a = AABB::new(Vec3::new(2.0, 3.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(a.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(a.size(), Vec3::new(2.0, 3.0, 1.0));
        assert_eq!(a.center(), Vec3::new(1.0, 1.5, 0.5));
    }

    #[test]
    fn test_center_half_extents() {
        let a = AABB::from_center_half_extents(Vec3::new(0.0, 2.0, 10.0), Vec3::ONE);
        assert_eq!(a.min, Vec3::new(-1.0, 1.0, 9.0));
        assert_eq!(a.center(), Vec3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn test_sphere_contains() {
        let ball = Sphere::new(Vec3::new(2.0, 1.0, -2.0), 1.0);
        assert!(ball.contains_point(Vec3::new(2.5, 1.0, -2.0)));
        assert!(!ball.contains_point(Vec3::ZERO));
    }
}
