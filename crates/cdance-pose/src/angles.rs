//! Named joint angles.
//!
//! Angle at a vertex joint from the vectors vertex→a and vertex→b, using the
//! dot product formula `cos(θ) = (v1 · v2) / (|v1| × |v2|)`.
//!
//! An angle is absent when any of its three points is missing or occluded,
//! or when a limb has zero length. That is an expected condition, not an
//! error.

use std::collections::BTreeMap;

use cdance_models::{index::*, Landmark};

/// Points at or below this visibility do not contribute to an angle.
pub const ANGLE_VISIBILITY_THRESHOLD: f64 = 0.5;

/// Limbs shorter than this are treated as degenerate.
const MIN_LIMB_LENGTH: f64 = 1e-4;

/// A tracked joint angle: `(point_a, vertex, point_b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointAngle {
    pub name: &'static str,
    pub a: usize,
    pub vertex: usize,
    pub b: usize,
}

/// Joint angles tracked for pose comparison.
pub const ANGLE_JOINTS: [JointAngle; 6] = [
    JointAngle { name: "left_shoulder", a: LEFT_ELBOW, vertex: LEFT_SHOULDER, b: LEFT_HIP },
    JointAngle { name: "right_shoulder", a: RIGHT_ELBOW, vertex: RIGHT_SHOULDER, b: RIGHT_HIP },
    JointAngle { name: "left_elbow", a: LEFT_SHOULDER, vertex: LEFT_ELBOW, b: LEFT_WRIST },
    JointAngle { name: "right_elbow", a: RIGHT_SHOULDER, vertex: RIGHT_ELBOW, b: RIGHT_WRIST },
    JointAngle { name: "left_knee", a: LEFT_HIP, vertex: LEFT_KNEE, b: LEFT_ANKLE },
    JointAngle { name: "right_knee", a: RIGHT_HIP, vertex: RIGHT_KNEE, b: RIGHT_ANKLE },
];

/// Angle in degrees (0-180) between vertex→a and vertex→b in the image plane.
pub fn angle_between(a: &Landmark, vertex: &Landmark, b: &Landmark) -> Option<f64> {
    let v1 = (a.x - vertex.x, a.y - vertex.y);
    let v2 = (b.x - vertex.x, b.y - vertex.y);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 < MIN_LIMB_LENGTH || mag2 < MIN_LIMB_LENGTH {
        return None;
    }

    let cos_angle = ((v1.0 * v2.0 + v1.1 * v2.1) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Compute one named angle over a skeleton.
///
/// Works on partial skeletons: points are looked up by index and a missing
/// index makes the angle absent.
pub fn joint_angle(landmarks: &[Landmark], joint: &JointAngle) -> Option<f64> {
    let visible = |idx: usize| {
        landmarks
            .get(idx)
            .filter(|lm| lm.is_visible(ANGLE_VISIBILITY_THRESHOLD))
    };
    let a = visible(joint.a)?;
    let vertex = visible(joint.vertex)?;
    let b = visible(joint.b)?;
    angle_between(a, vertex, b)
}

/// Compute every tracked angle, keyed by name.
pub fn joint_angles(landmarks: &[Landmark]) -> BTreeMap<&'static str, Option<f64>> {
    ANGLE_JOINTS
        .iter()
        .map(|joint| (joint.name, joint_angle(landmarks, joint)))
        .collect()
}
