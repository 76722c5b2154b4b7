//! Torso-relative landmark normalization.
//!
//! Re-expresses a skeleton relative to the torso center and scales it by
//! torso height so that camera distance, framing offset and (partially)
//! subject height drop out of every downstream comparison.
//!
//! # Algorithm
//! 1. Torso center = mean of both shoulders and both hips (x, y only)
//! 2. Torso size = |mean(shoulder.y) - mean(hip.y)|, floored to `min_torso_size`
//! 3. Each point becomes `((x - cx) / size, (y - cy) / size, z / size)`,
//!    visibility unchanged, order preserved

use tracing::debug;

use cdance_models::{index, Landmark, LANDMARK_COUNT};

use crate::error::{PoseError, PoseResult};

/// Default floor for the torso size divisor.
pub const MIN_TORSO_SIZE: f64 = 0.01;

/// A skeleton expressed in torso units.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSkeleton {
    landmarks: Vec<Landmark>,
    center: (f64, f64),
    torso_size: f64,
    degenerate: bool,
}

impl NormalizedSkeleton {
    /// Normalized landmarks, same order as the input.
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn into_landmarks(self) -> Vec<Landmark> {
        self.landmarks
    }

    /// Landmark at an anatomical index.
    #[inline]
    pub fn get(&self, idx: usize) -> &Landmark {
        &self.landmarks[idx]
    }

    /// Torso center in the source coordinate frame.
    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    /// Divisor actually used (after flooring).
    pub fn torso_size(&self) -> f64 {
        self.torso_size
    }

    /// True when the measured torso was below the floor.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

/// Maps raw skeletons into the torso-relative frame.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    min_torso_size: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(MIN_TORSO_SIZE)
    }
}

impl Normalizer {
    /// Create a normalizer with a custom torso floor.
    pub fn new(min_torso_size: f64) -> Self {
        Self { min_torso_size }
    }

    pub fn min_torso_size(&self) -> f64 {
        self.min_torso_size
    }

    /// Normalize a full 33-point skeleton.
    ///
    /// # Errors
    /// `PoseError::InvalidSkeleton` when the skeleton is not exactly 33 points.
    pub fn normalize(&self, landmarks: &[Landmark]) -> PoseResult<NormalizedSkeleton> {
        if landmarks.len() != LANDMARK_COUNT {
            return Err(PoseError::invalid_skeleton(landmarks.len()));
        }

        let ls = &landmarks[index::LEFT_SHOULDER];
        let rs = &landmarks[index::RIGHT_SHOULDER];
        let lh = &landmarks[index::LEFT_HIP];
        let rh = &landmarks[index::RIGHT_HIP];

        let cx = (ls.x + rs.x + lh.x + rh.x) / 4.0;
        let cy = (ls.y + rs.y + lh.y + rh.y) / 4.0;

        let shoulder_mid_y = (ls.y + rs.y) / 2.0;
        let hip_mid_y = (lh.y + rh.y) / 2.0;
        let measured = (hip_mid_y - shoulder_mid_y).abs();

        // NaN compares false, so it is floored too
        let degenerate = !(measured >= self.min_torso_size);
        let size = if degenerate {
            debug!(
                measured = measured,
                floor = self.min_torso_size,
                "Degenerate torso geometry, using floor"
            );
            self.min_torso_size
        } else {
            measured
        };

        let normalized = landmarks
            .iter()
            .map(|lm| Landmark {
                id: lm.id,
                x: (lm.x - cx) / size,
                y: (lm.y - cy) / size,
                z: lm.z / size,
                visibility: lm.visibility,
            })
            .collect();

        Ok(NormalizedSkeleton {
            landmarks: normalized,
            center: (cx, cy),
            torso_size: size,
            degenerate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::standing_skeleton;

    #[test]
    fn test_output_length_matches_input() {
        let skeleton = standing_skeleton();
        let normalized = Normalizer::default().normalize(&skeleton).unwrap();
        assert_eq!(normalized.landmarks().len(), LANDMARK_COUNT);
        assert_eq!(normalized.get(index::LEFT_WRIST).id, index::LEFT_WRIST as u32);
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        let skeleton = standing_skeleton();
        let err = Normalizer::default().normalize(&skeleton[..20]).unwrap_err();
        assert!(matches!(
            err,
            PoseError::InvalidSkeleton {
                expected: 33,
                actual: 20
            }
        ));
        assert!(Normalizer::default().normalize(&[]).is_err());
    }

    #[test]
    fn test_torso_center_and_size() {
        let skeleton = standing_skeleton();
        let normalized = Normalizer::default().normalize(&skeleton).unwrap();

        let ls = normalized.get(index::LEFT_SHOULDER);
        let rs = normalized.get(index::RIGHT_SHOULDER);
        let lh = normalized.get(index::LEFT_HIP);
        let rh = normalized.get(index::RIGHT_HIP);

        let cx = (ls.x + rs.x + lh.x + rh.x) / 4.0;
        let cy = (ls.y + rs.y + lh.y + rh.y) / 4.0;
        assert!(cx.abs() < 1e-9);
        assert!(cy.abs() < 1e-9);

        let torso = ((lh.y + rh.y) / 2.0 - (ls.y + rs.y) / 2.0).abs();
        assert!((torso - 1.0).abs() < 1e-9);
        assert!(!normalized.is_degenerate());
    }

    #[test]
    fn test_renormalizing_is_noop() {
        let normalizer = Normalizer::default();
        let once = normalizer.normalize(&standing_skeleton()).unwrap();
        let twice = normalizer.normalize(once.landmarks()).unwrap();

        for (a, b) in once.landmarks().iter().zip(twice.landmarks()) {
            assert!((a.x - b.x).abs() < 1e-9);
            assert!((a.y - b.y).abs() < 1e-9);
            assert!((a.z - b.z).abs() < 1e-9);
            assert_eq!(a.visibility, b.visibility);
        }
    }

    #[test]
    fn test_degenerate_torso_uses_floor() {
        let mut skeleton = standing_skeleton();
        for idx in [
            index::LEFT_SHOULDER,
            index::RIGHT_SHOULDER,
            index::LEFT_HIP,
            index::RIGHT_HIP,
        ] {
            skeleton[idx].x = 0.5;
            skeleton[idx].y = 0.5;
        }
        skeleton[index::NOSE] = Landmark::new(0, 0.52, 0.47, 0.03, 0.9);

        let normalized = Normalizer::default().normalize(&skeleton).unwrap();
        assert!(normalized.is_degenerate());
        assert_eq!(normalized.torso_size(), MIN_TORSO_SIZE);

        let nose = normalized.get(index::NOSE);
        assert!((nose.x - 0.02 / MIN_TORSO_SIZE).abs() < 1e-9);
        assert!((nose.y - (-0.03) / MIN_TORSO_SIZE).abs() < 1e-9);
        assert!((nose.z - 0.03 / MIN_TORSO_SIZE).abs() < 1e-9);
        assert!(normalized.landmarks().iter().all(|lm| lm.x.is_finite()));
    }

    #[test]
    fn test_scale_and_offset_invariance() {
        let base = standing_skeleton();
        let shifted: Vec<Landmark> = base
            .iter()
            .map(|lm| Landmark {
                x: lm.x * 0.5 + 0.2,
                y: lm.y * 0.5 + 0.1,
                z: lm.z * 0.5,
                ..*lm
            })
            .collect();

        let normalizer = Normalizer::default();
        let a = normalizer.normalize(&base).unwrap();
        let b = normalizer.normalize(&shifted).unwrap();
        for (p, q) in a.landmarks().iter().zip(b.landmarks()) {
            assert!((p.x - q.x).abs() < 1e-9);
            assert!((p.y - q.y).abs() < 1e-9);
            assert!((p.z - q.z).abs() < 1e-9);
        }
    }
}
