//! Body landmark models.
//!
//! Landmarks follow the 33-point body topology produced by the upstream
//! pose detector. Indices carry anatomical meaning and never change.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of landmarks in a full body skeleton.
pub const LANDMARK_COUNT: usize = 33;

/// Anatomical landmark indices for the 33-point body topology.
pub mod index {
    pub const NOSE: usize = 0;
    pub const LEFT_EYE_INNER: usize = 1;
    pub const LEFT_EYE: usize = 2;
    pub const LEFT_EYE_OUTER: usize = 3;
    pub const RIGHT_EYE_INNER: usize = 4;
    pub const RIGHT_EYE: usize = 5;
    pub const RIGHT_EYE_OUTER: usize = 6;
    pub const LEFT_EAR: usize = 7;
    pub const RIGHT_EAR: usize = 8;
    pub const MOUTH_LEFT: usize = 9;
    pub const MOUTH_RIGHT: usize = 10;

    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;

    pub const LEFT_PINKY: usize = 17;
    pub const RIGHT_PINKY: usize = 18;
    pub const LEFT_INDEX: usize = 19;
    pub const RIGHT_INDEX: usize = 20;
    pub const LEFT_THUMB: usize = 21;
    pub const RIGHT_THUMB: usize = 22;

    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;

    pub const LEFT_HEEL: usize = 29;
    pub const RIGHT_HEEL: usize = 30;
    pub const LEFT_FOOT_INDEX: usize = 31;
    pub const RIGHT_FOOT_INDEX: usize = 32;
}

/// A single body keypoint.
///
/// `x`/`y` are image-normalized (0-1, y grows downward), `z` is relative
/// depth with the same scale as `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    /// Anatomical index (0-32)
    #[serde(default)]
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Detector confidence that the point is visible (0.0-1.0)
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    /// Create a new landmark.
    pub fn new(id: u32, x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            id,
            x,
            y,
            z,
            visibility,
        }
    }

    /// True if visibility is strictly above `threshold`.
    #[inline]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }

    /// 3D Euclidean distance to another landmark.
    #[inline]
    pub fn distance(&self, other: &Landmark) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Re-number landmark ids to match their position in the sequence.
///
/// Upstream JSON usually omits `id`, so after deserialization every id is 0.
/// Call this once on a full skeleton before any id-based filtering.
pub fn assign_ids(landmarks: &mut [Landmark]) {
    for (i, lm) in landmarks.iter_mut().enumerate() {
        lm.id = i as u32;
    }
}
