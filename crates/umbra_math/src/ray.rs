//! Rays and sight segments

use crate::consts::EPSILON;
use crate::vector::Vec3;

/// Half-line with a unit direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    /// Ray along `direction`, which is normalized here
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `from` towards `to` together with the segment length.
    ///
    /// Coincident points have no direction and give `None`.
    pub fn between(from: Vec3, to: Vec3) -> Option<(Self, f32)> {
        let delta = to - from;
        let length = delta.length();
        if length <= EPSILON {
            return None;
        }

        let ray = Self {
            origin: from,
            direction: delta / length,
        };
        Some((ray, length))
    }

    /// Point `t` units along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Component-wise reciprocal of the direction, infinite on zero axes
    #[inline]
    pub fn inverse_direction(&self) -> Vec3 {
        Vec3::new(
            self.direction.x.recip(),
            self.direction.y.recip(),
            self.direction.z.recip(),
        )
    }
}
