//! Tiered pose classifier.
//!
//! Each frame goes through three tiers, first success wins:
//! 1. **Quick check** on raw landmarks, accepted at `quick_check_threshold`
//! 2. **Learned model** on the embedding, when fit, accepted at
//!    `confidence_threshold`
//! 3. **Heuristic fallback** on the normalized skeleton, neutral if nothing
//!    matches
//!
//! In live mode the winner is passed through a [`TemporalStabilizer`].

use std::path::Path;

use tracing::{debug, error, info, warn};

use cdance_models::{
    ClassificationResult, Landmark, PoseLabel, TrainingData, TrainingSample, LANDMARK_COUNT,
};

use crate::config::ClassifierConfig;
use crate::embedding::{build_embedding, Embedding};
use crate::error::{PoseError, PoseResult};
use crate::heuristics;
use crate::knn::{KnnClassifier, NeighborModel};
use crate::metrics;
use crate::normalizer::Normalizer;
use crate::stabilizer::TemporalStabilizer;

/// Which tier produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationTier {
    QuickCheck,
    Learned,
    Heuristic,
}

impl ClassificationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationTier::QuickCheck => "quick_check",
            ClassificationTier::Learned => "learned",
            ClassificationTier::Heuristic => "heuristic",
        }
    }
}

impl std::fmt::Display for ClassificationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stateful per-frame pose classifier.
///
/// Owns the learned model and the stabilizer state. Independent sequences
/// need their own instance or a [`reset_filter`](Self::reset_filter) between
/// them.
#[derive(Debug, Clone)]
pub struct PoseClassifier<M: NeighborModel = KnnClassifier> {
    config: ClassifierConfig,
    normalizer: Normalizer,
    model: M,
    stabilizer: TemporalStabilizer,
}

impl Default for PoseClassifier<KnnClassifier> {
    fn default() -> Self {
        let config = ClassifierConfig::default();
        Self {
            normalizer: Normalizer::new(config.min_torso_size),
            model: KnnClassifier::new(config.k_neighbors),
            stabilizer: TemporalStabilizer::default(),
            config,
        }
    }
}

impl PoseClassifier<KnnClassifier> {
    /// Create a classifier backed by the built-in k-NN model.
    ///
    /// # Errors
    /// `PoseError::InvalidConfig` if the config does not validate.
    pub fn new(config: ClassifierConfig) -> PoseResult<Self> {
        let model = KnnClassifier::new(config.k_neighbors);
        Self::with_model(config, model)
    }
}

impl<M: NeighborModel> PoseClassifier<M> {
    /// Create a classifier around any nearest-neighbor backend.
    pub fn with_model(config: ClassifierConfig, model: M) -> PoseResult<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(config.min_torso_size),
            stabilizer: TemporalStabilizer::new(config.temporal_alpha)?,
            model,
            config,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn stabilizer(&self) -> &TemporalStabilizer {
        &self.stabilizer
    }

    /// True once the learned tier is available.
    pub fn is_fit(&self) -> bool {
        self.model.is_fit()
    }

    /// Fit the learned tier from labelled skeletons.
    ///
    /// Samples that are not full skeletons are skipped. With no valid samples
    /// the call is a logged no-op and the model keeps its previous state.
    /// Returns the number of samples used.
    pub fn fit(&mut self, samples: &[TrainingSample]) -> usize {
        let mut prepared: Vec<(Embedding, PoseLabel)> = Vec::with_capacity(samples.len());

        for (i, sample) in samples.iter().enumerate() {
            let embedding = self
                .normalizer
                .normalize(&sample.landmarks)
                .ok()
                .and_then(|n| build_embedding(n.landmarks()));
            match embedding {
                Some(e) => prepared.push((e, sample.label)),
                None => warn!(
                    sample = i,
                    landmarks = sample.landmarks.len(),
                    label = %sample.label,
                    "Skipping invalid training sample"
                ),
            }
        }

        let accepted = prepared.len();
        let skipped = samples.len() - accepted;
        metrics::record_training_samples(accepted, skipped);

        if accepted == 0 {
            warn!(
                samples = samples.len(),
                "No valid training samples, learned tier stays as it was"
            );
            return 0;
        }

        self.model.fit(prepared);
        info!(
            samples = accepted,
            skipped = skipped,
            "Fitted nearest-neighbor model"
        );
        accepted
    }

    /// Load `{samples: [...]}` from a JSON file and fit from it.
    ///
    /// # Errors
    /// - `PoseError::FileNotFound` if the path does not exist
    /// - `PoseError::TrainingDataCorrupt` if it cannot be read or parsed;
    ///   the model is left untouched
    pub fn load_training_data(&mut self, path: impl AsRef<Path>) -> PoseResult<usize> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Training data file not found");
            return Err(PoseError::FileNotFound(path.to_path_buf()));
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| PoseError::training_data_corrupt(format!("{}: {e}", path.display())))
            .and_then(|json| {
                TrainingData::from_json(&json).map_err(|e| {
                    PoseError::training_data_corrupt(format!("{}: {e}", path.display()))
                })
            });

        match data {
            Ok(data) => {
                info!(
                    path = %path.display(),
                    samples = data.samples.len(),
                    "Loaded training data"
                );
                Ok(self.fit(&data.samples))
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Training data unusable, fitting skipped");
                Err(e)
            }
        }
    }

    /// Classify one frame, applying the stabilizer when enabled.
    ///
    /// # Errors
    /// `PoseError::InvalidSkeleton` for anything but 33 landmarks; the
    /// stabilizer is not touched.
    pub fn classify(&mut self, landmarks: &[Landmark]) -> PoseResult<ClassificationResult> {
        let (result, _) = self.classify_frame(landmarks)?;
        if self.config.use_temporal_filter {
            Ok(self.stabilizer.update(result.label, result.confidence))
        } else {
            Ok(result)
        }
    }

    /// Classify one frame without smoothing and report the answering tier.
    pub fn classify_frame(
        &self,
        landmarks: &[Landmark],
    ) -> PoseResult<(ClassificationResult, ClassificationTier)> {
        if landmarks.len() != LANDMARK_COUNT {
            warn!(
                landmarks = landmarks.len(),
                expected = LANDMARK_COUNT,
                "Dropping frame with invalid skeleton"
            );
            metrics::record_frame_dropped("invalid_skeleton");
            return Err(PoseError::invalid_skeleton(landmarks.len()));
        }

        let (result, tier) = self.run_tiers(landmarks)?;
        debug!(
            tier = %tier,
            label = %result.label,
            confidence = result.confidence,
            "Frame classified"
        );
        metrics::record_frame_classified(tier.as_str(), result.label.as_str(), result.confidence);
        Ok((result, tier))
    }

    /// Clear the stabilizer, e.g. between sequences.
    pub fn reset_filter(&mut self) {
        self.stabilizer.reset();
    }

    fn run_tiers(
        &self,
        landmarks: &[Landmark],
    ) -> PoseResult<(ClassificationResult, ClassificationTier)> {
        if let Some(quick) = heuristics::quick_check(landmarks) {
            if quick.confidence >= self.config.quick_check_threshold {
                return Ok((quick, ClassificationTier::QuickCheck));
            }
        }

        let normalized = self.normalizer.normalize(landmarks)?;

        if self.model.is_fit() {
            let embedding = Embedding::from(&normalized);
            match self.model.predict(&embedding) {
                Ok((label, probability)) if probability >= self.config.confidence_threshold => {
                    return Ok((
                        ClassificationResult::new(label, probability),
                        ClassificationTier::Learned,
                    ));
                }
                Ok((label, probability)) => {
                    debug!(label = %label, probability = probability, "Learned tier below threshold");
                }
                Err(e) => debug!(error = %e, "Learned tier skipped"),
            }
        }

        Ok((
            heuristics::fallback(&normalized, self.config.confidence_threshold),
            ClassificationTier::Heuristic,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{arms_up_skeleton, set, standing_skeleton};
    use cdance_models::index::*;

    fn offline_classifier() -> PoseClassifier {
        PoseClassifier::new(ClassifierConfig::offline()).unwrap()
    }

    fn spread_skeleton() -> Vec<Landmark> {
        let mut skeleton = standing_skeleton();
        set(&mut skeleton, LEFT_ELBOW, 0.70, 0.30);
        set(&mut skeleton, RIGHT_ELBOW, 0.30, 0.30);
        set(&mut skeleton, LEFT_WRIST, 0.80, 0.31);
        set(&mut skeleton, RIGHT_WRIST, 0.20, 0.31);
        skeleton
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClassifierConfig {
            temporal_alpha: 0.0,
            ..Default::default()
        };
        assert!(PoseClassifier::new(config).is_err());
    }

    #[test]
    fn test_quick_check_tier() {
        let classifier = offline_classifier();
        let (result, tier) = classifier.classify_frame(&arms_up_skeleton()).unwrap();
        assert_eq!(tier, ClassificationTier::QuickCheck);
        assert_eq!(result.label, PoseLabel::ArmsUp);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_heuristic_tier_when_unfit() {
        let classifier = offline_classifier();
        assert!(!classifier.is_fit());
        let (result, tier) = classifier.classify_frame(&standing_skeleton()).unwrap();
        assert_eq!(tier, ClassificationTier::Heuristic);
        assert_eq!(result, ClassificationResult::neutral());
    }

    #[test]
    fn test_learned_tier_when_fit() {
        let mut classifier = offline_classifier();
        let used = classifier.fit(&[
            TrainingSample::new(standing_skeleton(), PoseLabel::HandsOnHips),
            TrainingSample::new(spread_skeleton(), PoseLabel::ArmsSpread),
        ]);
        assert_eq!(used, 2);

        // Exact match: probability 1.0 from the learned tier
        let (result, tier) = classifier.classify_frame(&standing_skeleton()).unwrap();
        assert_eq!(tier, ClassificationTier::Learned);
        assert_eq!(result.label, PoseLabel::HandsOnHips);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_quick_check_precedes_learned_tier() {
        let mut classifier = offline_classifier();
        classifier.fit(&[TrainingSample::new(arms_up_skeleton(), PoseLabel::Jump)]);
        let (result, tier) = classifier.classify_frame(&arms_up_skeleton()).unwrap();
        assert_eq!(tier, ClassificationTier::QuickCheck);
        assert_eq!(result.label, PoseLabel::ArmsUp);
    }

    #[test]
    fn test_fit_skips_invalid_samples() {
        let mut classifier = offline_classifier();
        let used = classifier.fit(&[
            TrainingSample::new(standing_skeleton()[..12].to_vec(), PoseLabel::Jump),
            TrainingSample::new(standing_skeleton(), PoseLabel::Neutral),
        ]);
        assert_eq!(used, 1);
        assert!(classifier.is_fit());
    }

    #[test]
    fn test_fit_with_no_valid_samples_is_noop() {
        let mut classifier = offline_classifier();
        assert_eq!(classifier.fit(&[]), 0);
        assert_eq!(
            classifier.fit(&[TrainingSample::new(Vec::new(), PoseLabel::Jump)]),
            0
        );
        assert!(!classifier.is_fit());
    }

    #[test]
    fn test_invalid_skeleton_leaves_stabilizer_untouched() {
        let mut classifier: PoseClassifier = PoseClassifier::default();
        classifier.classify(&standing_skeleton()).unwrap();
        assert_eq!(classifier.stabilizer().frame_count(), 1);

        let err = classifier.classify(&standing_skeleton()[..32]).unwrap_err();
        assert!(matches!(err, PoseError::InvalidSkeleton { actual: 32, .. }));
        assert_eq!(classifier.stabilizer().frame_count(), 1);
    }

    #[test]
    fn test_live_mode_smooths() {
        let mut classifier: PoseClassifier = PoseClassifier::default();
        let first = classifier.classify(&arms_up_skeleton()).unwrap();
        assert_eq!(first.label, PoseLabel::ArmsUp);
        assert!((first.confidence - 0.3 * 0.95).abs() < 1e-12);

        classifier.reset_filter();
        assert_eq!(classifier.stabilizer().frame_count(), 0);
    }

    #[test]
    fn test_offline_mode_does_not_smooth() {
        let mut classifier = offline_classifier();
        let result = classifier.classify(&arms_up_skeleton()).unwrap();
        assert_eq!(result.confidence, 0.95);
        assert_eq!(classifier.stabilizer().frame_count(), 0);
    }

    #[test]
    fn test_tier_names() {
        assert_eq!(ClassificationTier::QuickCheck.to_string(), "quick_check");
        assert_eq!(ClassificationTier::Learned.as_str(), "learned");
    }
}
