//! Classification results and training data.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::landmark::{assign_ids, Landmark};
use crate::pose_label::PoseLabel;

/// Label and confidence for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationResult {
    pub label: PoseLabel,
    /// Confidence (0.0-1.0)
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn new(label: PoseLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }

    /// The fallback result when nothing matched.
    pub fn neutral() -> Self {
        Self::new(PoseLabel::Neutral, 0.5)
    }
}

/// A labelled skeleton used to fit the nearest-neighbor model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TrainingSample {
    pub landmarks: Vec<Landmark>,
    pub label: PoseLabel,
}

impl TrainingSample {
    pub fn new(landmarks: Vec<Landmark>, label: PoseLabel) -> Self {
        Self { landmarks, label }
    }
}

/// Training file contents (`{"samples": [...]}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TrainingData {
    pub samples: Vec<TrainingSample>,
}

impl TrainingData {
    /// Parse a training document and number landmark ids by position.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut data: TrainingData = serde_json::from_str(json)?;
        for sample in &mut data.samples {
            assign_ids(&mut sample.landmarks);
        }
        Ok(data)
    }
}
