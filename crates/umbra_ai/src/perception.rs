//! Line-of-sight visibility probe

use umbra_math::{angle_between_degrees, OcclusionQuery, Vec3};

/// Eye height above the guard origin when no eye point is given
pub const DEFAULT_EYE_HEIGHT: f32 = 1.5;

/// Where the guard looks from
pub fn eye_point(position: Vec3, eye: Option<Vec3>) -> Vec3 {
    eye.unwrap_or(position + Vec3::UP * DEFAULT_EYE_HEIGHT)
}

/// Geometry of one sight check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightQuery {
    /// Observer eye point
    pub eye: Vec3,
    /// Observer facing
    pub forward: Vec3,
    /// Point being looked at
    pub target: Vec3,
    /// Maximum sight distance (inclusive)
    pub view_radius: f32,
    /// Full field of view in degrees
    pub view_angle: f32,
}

/// Hiding state of the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Concealment {
    /// Target is inside a shadow zone
    pub concealed: bool,
    /// Target is crouching
    pub crouching: bool,
}

impl Concealment {
    /// Hidden only when both in shadow and crouched
    pub fn hides(&self) -> bool {
        self.concealed && self.crouching
    }
}

/// Whether the observer can see the target.
///
/// Checks run in order and stop at the first failure: distance, half-angle
/// cone, occluders between eye and target (geometry owned by `target_owner`
/// is ignored), then concealment.
pub fn is_visible(
    query: &SightQuery,
    occluders: &dyn OcclusionQuery,
    target_owner: Option<u64>,
    concealment: Concealment,
) -> bool {
    let to_target = query.target - query.eye;
    let distance = to_target.length();
    if distance > query.view_radius {
        return false;
    }

    if angle_between_degrees(query.forward, to_target) > query.view_angle / 2.0 {
        return false;
    }

    if occluders.blocks_segment(query.eye, query.target, target_owner) {
        return false;
    }

    !concealment.hides()
}
