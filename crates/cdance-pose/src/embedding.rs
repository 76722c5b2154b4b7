//! Pairwise-distance pose embeddings.
//!
//! An embedding is a fixed-length vector with one 3D distance per joint pair.
//! Occluded pairs keep their slot and carry a sentinel, so every embedding
//! has the same dimension regardless of visibility.

use cdance_models::{index::*, Landmark, LANDMARK_COUNT};

use crate::normalizer::NormalizedSkeleton;

/// Value emitted for a pair with an occluded endpoint.
pub const SENTINEL: f64 = -1.0;

/// Endpoints at or below this visibility are treated as occluded.
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

/// Number of joint pairs, i.e. the embedding dimension.
pub const EMBEDDING_DIM: usize = 24;

/// Ordered joint pairs. Embeddings are only comparable under this ordering.
pub const JOINT_PAIRS: [(usize, usize); EMBEDDING_DIM] = [
    // Arms
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
    (LEFT_SHOULDER, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_WRIST),
    // Legs
    (LEFT_HIP, LEFT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE),
    (RIGHT_HIP, RIGHT_KNEE),
    (RIGHT_KNEE, RIGHT_ANKLE),
    (LEFT_HIP, LEFT_ANKLE),
    (RIGHT_HIP, RIGHT_ANKLE),
    // Torso
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_HIP, RIGHT_HIP),
    (LEFT_SHOULDER, LEFT_HIP),
    (RIGHT_SHOULDER, RIGHT_HIP),
    // Cross-body
    (LEFT_WRIST, RIGHT_WRIST),
    (LEFT_ANKLE, RIGHT_ANKLE),
    (LEFT_SHOULDER, RIGHT_HIP),
    (RIGHT_SHOULDER, LEFT_HIP),
    // Vertical
    (LEFT_WRIST, LEFT_HIP),
    (RIGHT_WRIST, RIGHT_HIP),
    (LEFT_WRIST, LEFT_ANKLE),
    (RIGHT_WRIST, RIGHT_ANKLE),
];

/// Fixed-length distance fingerprint of a skeleton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Embedding([f64; EMBEDDING_DIM]);

impl Embedding {
    /// Wrap raw values (e.g. from a stored model).
    pub fn from_values(values: [f64; EMBEDDING_DIM]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        EMBEDDING_DIM
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of slots holding the occlusion sentinel.
    pub fn occluded_pairs(&self) -> usize {
        self.0.iter().filter(|v| **v == SENTINEL).count()
    }

    /// Euclidean distance in embedding space.
    ///
    /// Sentinel slots participate as plain values.
    pub fn distance(&self, other: &Embedding) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Build an embedding from a normalized 33-point skeleton.
///
/// Returns `None` only when the input is not exactly 33 points.
pub fn build_embedding(normalized: &[Landmark]) -> Option<Embedding> {
    if normalized.len() != LANDMARK_COUNT {
        return None;
    }

    let mut values = [SENTINEL; EMBEDDING_DIM];
    for (slot, (a, b)) in values.iter_mut().zip(JOINT_PAIRS.iter()) {
        let lm1 = &normalized[*a];
        let lm2 = &normalized[*b];
        if lm1.is_visible(VISIBILITY_THRESHOLD) && lm2.is_visible(VISIBILITY_THRESHOLD) {
            *slot = lm1.distance(lm2);
        }
    }
    Some(Embedding(values))
}

impl From<&NormalizedSkeleton> for Embedding {
    fn from(skeleton: &NormalizedSkeleton) -> Self {
        // A NormalizedSkeleton always has 33 points
        build_embedding(skeleton.landmarks()).unwrap_or(Embedding([SENTINEL; EMBEDDING_DIM]))
    }
}
