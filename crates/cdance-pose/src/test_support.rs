//! Skeleton fixtures shared by the unit tests.

use cdance_models::{index::*, Landmark, LANDMARK_COUNT};

/// Upright subject facing the camera, arms relaxed at the sides.
///
/// Raw image coordinates (y grows downward), torso height 0.25.
pub(crate) fn standing_skeleton() -> Vec<Landmark> {
    let mut points = [(0.5, 0.15); LANDMARK_COUNT];

    // Face
    points[NOSE] = (0.50, 0.15);
    points[LEFT_EYE_INNER] = (0.51, 0.14);
    points[LEFT_EYE] = (0.52, 0.14);
    points[LEFT_EYE_OUTER] = (0.53, 0.14);
    points[RIGHT_EYE_INNER] = (0.49, 0.14);
    points[RIGHT_EYE] = (0.48, 0.14);
    points[RIGHT_EYE_OUTER] = (0.47, 0.14);
    points[LEFT_EAR] = (0.54, 0.15);
    points[RIGHT_EAR] = (0.46, 0.15);
    points[MOUTH_LEFT] = (0.51, 0.17);
    points[MOUTH_RIGHT] = (0.49, 0.17);

    // Arms
    points[LEFT_SHOULDER] = (0.58, 0.30);
    points[RIGHT_SHOULDER] = (0.42, 0.30);
    points[LEFT_ELBOW] = (0.60, 0.42);
    points[RIGHT_ELBOW] = (0.40, 0.42);
    points[LEFT_WRIST] = (0.61, 0.53);
    points[RIGHT_WRIST] = (0.39, 0.53);
    points[LEFT_PINKY] = (0.62, 0.56);
    points[RIGHT_PINKY] = (0.38, 0.56);
    points[LEFT_INDEX] = (0.61, 0.56);
    points[RIGHT_INDEX] = (0.39, 0.56);
    points[LEFT_THUMB] = (0.60, 0.55);
    points[RIGHT_THUMB] = (0.40, 0.55);

    // Legs
    points[LEFT_HIP] = (0.55, 0.55);
    points[RIGHT_HIP] = (0.45, 0.55);
    points[LEFT_KNEE] = (0.555, 0.72);
    points[RIGHT_KNEE] = (0.445, 0.72);
    points[LEFT_ANKLE] = (0.555, 0.88);
    points[RIGHT_ANKLE] = (0.445, 0.88);
    points[LEFT_HEEL] = (0.55, 0.90);
    points[RIGHT_HEEL] = (0.45, 0.90);
    points[LEFT_FOOT_INDEX] = (0.56, 0.92);
    points[RIGHT_FOOT_INDEX] = (0.44, 0.92);

    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| Landmark::new(i as u32, *x, *y, 0.0, 0.95))
        .collect()
}

/// Both wrists raised 0.4 above their shoulders.
pub(crate) fn arms_up_skeleton() -> Vec<Landmark> {
    let mut skeleton = standing_skeleton();
    set(&mut skeleton, LEFT_ELBOW, 0.62, 0.12);
    set(&mut skeleton, RIGHT_ELBOW, 0.38, 0.12);
    set(&mut skeleton, LEFT_WRIST, 0.62, -0.10);
    set(&mut skeleton, RIGHT_WRIST, 0.38, -0.10);
    skeleton[LEFT_WRIST].visibility = 0.9;
    skeleton[RIGHT_WRIST].visibility = 0.9;
    skeleton
}

/// Hips dropped below knee height.
pub(crate) fn deep_squat_skeleton() -> Vec<Landmark> {
    let mut skeleton = standing_skeleton();
    set(&mut skeleton, LEFT_HIP, 0.56, 0.74);
    set(&mut skeleton, RIGHT_HIP, 0.44, 0.74);
    set(&mut skeleton, LEFT_KNEE, 0.60, 0.72);
    set(&mut skeleton, RIGHT_KNEE, 0.40, 0.72);
    skeleton
}

/// Shift every point horizontally, e.g. to simulate motion.
pub(crate) fn shifted(skeleton: &[Landmark], dx: f64) -> Vec<Landmark> {
    skeleton
        .iter()
        .map(|lm| Landmark { x: lm.x + dx, ..*lm })
        .collect()
}

pub(crate) fn set(skeleton: &mut [Landmark], idx: usize, x: f64, y: f64) {
    skeleton[idx].x = x;
    skeleton[idx].y = y;
}
