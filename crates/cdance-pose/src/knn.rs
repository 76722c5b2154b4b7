//! Nearest-neighbor pose model.
//!
//! The classifier talks to the learned model only through [`NeighborModel`],
//! so any k-NN or distance-search backend can be dropped in without touching
//! the tiered decision logic. [`KnnClassifier`] is the built-in brute-force
//! implementation with distance-weighted voting.

use std::collections::BTreeMap;

use cdance_models::PoseLabel;

use crate::embedding::Embedding;
use crate::error::{PoseError, PoseResult};

/// Minimal interface of a learned pose model.
pub trait NeighborModel {
    /// Fit from labelled embeddings. An empty set leaves the model as it was.
    fn fit(&mut self, samples: Vec<(Embedding, PoseLabel)>);

    /// Most probable label and its probability.
    ///
    /// # Errors
    /// `PoseError::ModelUnfit` if called before a successful fit.
    fn predict(&self, embedding: &Embedding) -> PoseResult<(PoseLabel, f64)>;

    fn is_fit(&self) -> bool;
}

/// Brute-force k-nearest-neighbor classifier over Euclidean embedding
/// distance, with inverse-distance vote weights.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    k: usize,
    samples: Vec<(Embedding, PoseLabel)>,
}

impl KnnClassifier {
    /// Create an unfit classifier consulting `k` neighbors (at least 1).
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            samples: Vec::new(),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of stored training samples.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Distinct labels seen during fitting, in catalog order.
    pub fn classes(&self) -> Vec<PoseLabel> {
        let mut classes: Vec<PoseLabel> = self.samples.iter().map(|(_, l)| *l).collect();
        classes.sort();
        classes.dedup();
        classes
    }

    /// Per-class probabilities from the k nearest samples.
    ///
    /// Each neighbor votes with weight `1 / distance`. If any neighbor sits at
    /// distance zero, only the exact matches vote, with equal weight.
    pub fn probabilities(&self, embedding: &Embedding) -> PoseResult<BTreeMap<PoseLabel, f64>> {
        if self.samples.is_empty() {
            return Err(PoseError::ModelUnfit);
        }

        let mut neighbors: Vec<(f64, PoseLabel)> = self
            .samples
            .iter()
            .map(|(e, label)| (embedding.distance(e), *label))
            .collect();
        neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        neighbors.truncate(self.k.min(neighbors.len()));

        let exact = neighbors.iter().any(|(d, _)| *d == 0.0);
        let mut votes: BTreeMap<PoseLabel, f64> = BTreeMap::new();
        for (distance, label) in &neighbors {
            let weight = if exact {
                if *distance == 0.0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                1.0 / distance
            };
            *votes.entry(*label).or_insert(0.0) += weight;
        }

        let total: f64 = votes.values().sum();
        if total > 0.0 && total.is_finite() {
            for v in votes.values_mut() {
                *v /= total;
            }
        } else {
            // Non-finite distances: fall back to uniform votes
            let share = 1.0 / neighbors.len() as f64;
            votes.clear();
            for (_, label) in &neighbors {
                *votes.entry(*label).or_insert(0.0) += share;
            }
        }
        Ok(votes)
    }
}

impl Default for KnnClassifier {
    fn default() -> Self {
        Self::new(5)
    }
}

impl NeighborModel for KnnClassifier {
    fn fit(&mut self, samples: Vec<(Embedding, PoseLabel)>) {
        if samples.is_empty() {
            return;
        }
        self.samples = samples;
    }

    fn predict(&self, embedding: &Embedding) -> PoseResult<(PoseLabel, f64)> {
        let probabilities = self.probabilities(embedding)?;
        // Ties go to the label earliest in catalog order
        let mut best = (PoseLabel::Neutral, f64::NEG_INFINITY);
        for (label, p) in probabilities {
            if p > best.1 {
                best = (label, p);
            }
        }
        Ok(best)
    }

    fn is_fit(&self) -> bool {
        !self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EMBEDDING_DIM;

    fn embedding(value: f64) -> Embedding {
        Embedding::from_values([value; EMBEDDING_DIM])
    }

    #[test]
    fn test_unfit_model() {
        let model = KnnClassifier::new(3);
        assert!(!model.is_fit());
        assert!(matches!(model.predict(&embedding(1.0)), Err(PoseError::ModelUnfit)));
    }

    #[test]
    fn test_empty_fit_is_noop() {
        let mut model = KnnClassifier::new(3);
        model.fit(Vec::new());
        assert!(!model.is_fit());

        model.fit(vec![(embedding(1.0), PoseLabel::Jump)]);
        model.fit(Vec::new());
        assert!(model.is_fit());
        assert_eq!(model.sample_count(), 1);
    }

    #[test]
    fn test_exact_match_wins() {
        let mut model = KnnClassifier::new(3);
        model.fit(vec![
            (embedding(1.0), PoseLabel::ArmsUp),
            (embedding(1.1), PoseLabel::Crouch),
            (embedding(1.2), PoseLabel::Crouch),
        ]);
        let (label, p) = model.predict(&embedding(1.0)).unwrap();
        assert_eq!(label, PoseLabel::ArmsUp);
        assert_eq!(p, 1.0);
    }

    #[test]
    fn test_distance_weighting_favours_closer() {
        let mut model = KnnClassifier::new(3);
        model.fit(vec![
            (embedding(1.0), PoseLabel::ArmsUp),
            (embedding(2.0), PoseLabel::Crouch),
            (embedding(2.1), PoseLabel::Crouch),
        ]);
        // Query close to ArmsUp: one near vote beats two far ones
        let probs = model.probabilities(&embedding(1.05)).unwrap();
        assert!(probs[&PoseLabel::ArmsUp] > probs[&PoseLabel::Crouch]);
        let sum: f64 = probs.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_only_k_neighbors_vote() {
        let mut model = KnnClassifier::new(1);
        model.fit(vec![
            (embedding(1.0), PoseLabel::ArmsUp),
            (embedding(3.0), PoseLabel::Crouch),
        ]);
        let probs = model.probabilities(&embedding(2.9)).unwrap();
        assert_eq!(probs.len(), 1);
        assert_eq!(probs[&PoseLabel::Crouch], 1.0);
    }

    #[test]
    fn test_k_larger_than_samples() {
        let mut model = KnnClassifier::new(10);
        model.fit(vec![
            (embedding(1.0), PoseLabel::Jump),
            (embedding(1.5), PoseLabel::Jump),
        ]);
        let (label, p) = model.predict(&embedding(1.2)).unwrap();
        assert_eq!(label, PoseLabel::Jump);
        assert!((p - 1.0).abs() < 1e-12);
        assert_eq!(model.classes(), vec![PoseLabel::Jump]);
    }
}
