//! Shared data models for the Clone Dance pose pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Body landmarks and the 33-point index table
//! - The fixed pose catalog and difficulty tiers
//! - Extracted frame sequences and training data
//! - Key pose / continuous pose outputs and choreography documents

pub mod choreography;
pub mod classification;
pub mod frame;
pub mod key_pose;
pub mod landmark;
pub mod pose_label;

// Re-export common types
pub use choreography::{
    slugify, Choreography, ChoreographyBody, ChoreographyMetadata, ProcessingParams,
};
pub use classification::{ClassificationResult, TrainingData, TrainingSample};
pub use frame::{PoseFrame, PoseSequence, SequenceMetadata};
pub use key_pose::{ContinuousPose, ContinuousStats, KeyPose, KeyPoseStats};
pub use landmark::{assign_ids, index, Landmark, LANDMARK_COUNT};
pub use pose_label::{Difficulty, DifficultyParseError, PoseLabel, PoseLabelParseError};
