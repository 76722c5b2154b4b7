//! Offline drivers over a recorded pose sequence.
//!
//! - [`KeyPoseExtractor`]: segment, then classify only the retained frames
//! - [`continuous_poses`]: every frame, optionally reduced to a landmark subset

use std::collections::BTreeSet;

use tracing::{info, warn};

use cdance_models::{ContinuousPose, KeyPose, KeyPoseStats, PoseFrame};

use crate::classifier::PoseClassifier;
use crate::config::{ClassifierConfig, SegmenterConfig};
use crate::error::PoseResult;
use crate::knn::{KnnClassifier, NeighborModel};
use crate::segmenter::MotionSegmenter;

/// Extracts labelled key poses from a full sequence.
#[derive(Debug, Clone)]
pub struct KeyPoseExtractor<M: NeighborModel = KnnClassifier> {
    segmenter: MotionSegmenter,
    classifier: PoseClassifier<M>,
}

impl KeyPoseExtractor<KnnClassifier> {
    /// Create an extractor with a fresh, unfit classifier.
    ///
    /// The stabilizer is always disabled: key frames are far apart in time.
    pub fn new(segmenter: SegmenterConfig, classifier: ClassifierConfig) -> PoseResult<Self> {
        let classifier = PoseClassifier::new(ClassifierConfig {
            use_temporal_filter: false,
            ..classifier
        })?;
        Ok(Self {
            segmenter: MotionSegmenter::new(segmenter)?,
            classifier,
        })
    }
}

impl<M: NeighborModel> KeyPoseExtractor<M> {
    /// Wrap an existing (possibly fitted) classifier.
    pub fn with_classifier(segmenter: MotionSegmenter, classifier: PoseClassifier<M>) -> Self {
        Self {
            segmenter,
            classifier,
        }
    }

    pub fn classifier(&self) -> &PoseClassifier<M> {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut PoseClassifier<M> {
        &mut self.classifier
    }

    /// Segment the sequence and label each retained frame.
    ///
    /// Frames that fail classification are skipped with a warning.
    pub fn extract(&self, frames: &[PoseFrame]) -> (Vec<KeyPose>, KeyPoseStats) {
        let segmentation = self.segmenter.analyze(frames);

        let mut key_poses = Vec::with_capacity(segmentation.retained.len());
        for &idx in &segmentation.retained {
            let frame = &frames[idx];
            match self.classifier.classify_frame(&frame.landmarks) {
                Ok((result, _)) => key_poses.push(KeyPose {
                    timestamp: frame.timestamp,
                    frame_index: frame.frame_index,
                    landmarks: frame.landmarks.clone(),
                    label: result.label,
                    confidence: result.confidence,
                    movement_intensity: segmentation.intensity(idx),
                }),
                Err(e) => warn!(
                    frame_index = frame.frame_index,
                    timestamp = frame.timestamp,
                    error = %e,
                    "Skipping key frame that failed classification"
                ),
            }
        }

        let stats = KeyPoseStats::from_key_poses(&key_poses);
        info!(
            frames = frames.len(),
            key_poses = stats.count,
            average_gap = stats.average_gap,
            "Key pose extraction complete"
        );
        (key_poses, stats)
    }
}

/// Convert frames to continuous poses.
///
/// With `active_landmarks`, only landmarks whose id is listed are kept.
pub fn continuous_poses(
    frames: &[PoseFrame],
    active_landmarks: Option<&[usize]>,
) -> Vec<ContinuousPose> {
    let active: Option<BTreeSet<u32>> =
        active_landmarks.map(|ids| ids.iter().map(|id| *id as u32).collect());

    frames
        .iter()
        .map(|frame| ContinuousPose {
            timestamp: frame.timestamp,
            frame_index: frame.frame_index,
            landmarks: match &active {
                Some(ids) => frame
                    .landmarks
                    .iter()
                    .filter(|lm| ids.contains(&lm.id))
                    .copied()
                    .collect(),
                None => frame.landmarks.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{arms_up_skeleton, shifted, standing_skeleton};
    use cdance_models::{index::*, PoseLabel};

    fn routine() -> Vec<PoseFrame> {
        let standing = standing_skeleton();
        let arms_up = arms_up_skeleton();
        (0..12)
            .map(|i| {
                let landmarks = match i {
                    0..=2 => standing.clone(),
                    3..=8 => arms_up.clone(),
                    _ => shifted(&standing, 0.3),
                };
                PoseFrame::new(i as f64 * 0.5, i, landmarks)
            })
            .collect()
    }

    fn extractor() -> KeyPoseExtractor {
        KeyPoseExtractor::new(SegmenterConfig::dense(), ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_labels_key_frames() {
        let extractor = extractor();
        let (key_poses, stats) = extractor.extract(&routine());

        assert_eq!(key_poses.len(), 2);
        assert_eq!(key_poses[0].frame_index, 3);
        assert_eq!(key_poses[0].label, PoseLabel::ArmsUp);
        assert_eq!(key_poses[0].confidence, 0.95);
        assert!(key_poses[0].movement_intensity > 0.15);
        assert!(key_poses[1].movement_intensity > key_poses[0].movement_intensity);
        assert_eq!(key_poses[1].frame_index, 9);
        assert_eq!(key_poses[1].label, PoseLabel::Neutral);

        assert_eq!(stats.count, 2);
        assert!((stats.average_gap - 3.0).abs() < 1e-9);
        assert_eq!(stats.label_histogram[&PoseLabel::ArmsUp], 1);
    }

    #[test]
    fn test_extract_skips_partial_frames() {
        let mut frames = routine();
        frames[3].landmarks.truncate(20);
        let extractor = extractor();
        let (key_poses, stats) = extractor.extract(&frames);
        assert!(key_poses.iter().all(|kp| kp.frame_index != 3));
        assert_eq!(stats.count, key_poses.len());
    }

    #[test]
    fn test_extract_forces_stabilizer_off() {
        let extractor = extractor();
        assert!(!extractor.classifier().config().use_temporal_filter);
    }

    #[test]
    fn test_extract_empty() {
        let extractor = extractor();
        let (key_poses, stats) = extractor.extract(&[]);
        assert!(key_poses.is_empty());
        assert_eq!(stats.average_gap, 0.0);
    }

    #[test]
    fn test_continuous_filters_active_landmarks() {
        let frames = routine();
        let active = [NOSE, LEFT_WRIST, RIGHT_WRIST];
        let poses = continuous_poses(&frames, Some(&active));
        assert_eq!(poses.len(), frames.len());
        let ids: Vec<u32> = poses[0].landmarks.iter().map(|lm| lm.id).collect();
        assert_eq!(ids, vec![0, 15, 16]);

        let all = continuous_poses(&frames, None);
        assert_eq!(all[5].landmarks.len(), 33);
        assert_eq!(all[5].frame_index, 5);
    }
}
