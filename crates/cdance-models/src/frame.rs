//! Per-frame pose records consumed from the landmark extractor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::landmark::{assign_ids, Landmark, LANDMARK_COUNT};

/// One frame of detected landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseFrame {
    /// Seconds from the start of the video
    pub timestamp: f64,

    /// Source frame number
    #[serde(alias = "frame")]
    pub frame_index: u64,

    /// Detected landmarks (33 for a full skeleton)
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    /// Create a new frame record.
    pub fn new(timestamp: f64, frame_index: u64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp,
            frame_index,
            landmarks,
        }
    }

    /// True if the frame carries a full 33-point skeleton.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
    }
}

/// Video metadata reported by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SequenceMetadata {
    pub fps: f64,
    pub total_frames: u64,
    /// Duration in seconds
    pub duration: f64,
    /// (width, height) in pixels
    pub resolution: (u32, u32),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_complexity: Option<String>,
}

impl Default for SequenceMetadata {
    fn default() -> Self {
        Self {
            fps: 0.0,
            total_frames: 0,
            duration: 0.0,
            resolution: (0, 0),
            model_complexity: None,
        }
    }
}

/// A full extracted sequence: metadata plus ordered frames.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PoseSequence {
    #[serde(default)]
    pub metadata: SequenceMetadata,
    pub poses: Vec<PoseFrame>,
}

impl PoseSequence {
    /// Parse an extractor document and number landmark ids by position.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut sequence: PoseSequence = serde_json::from_str(json)?;
        for frame in &mut sequence.poses {
            if frame.landmarks.iter().all(|lm| lm.id == 0) {
                assign_ids(&mut frame.landmarks);
            }
        }
        Ok(sequence)
    }

    /// Keep every `(skip + 1)`-th frame by position.
    pub fn decimate(&mut self, skip: usize) {
        if skip == 0 {
            return;
        }
        let step = skip + 1;
        let mut position = 0usize;
        self.poses.retain(|_| {
            let keep = position % step == 0;
            position += 1;
            keep
        });
    }
}
