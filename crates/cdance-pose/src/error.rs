//! Error types for pose processing.

use std::path::PathBuf;
use thiserror::Error;

use cdance_models::LANDMARK_COUNT;

/// Result type for pose operations.
pub type PoseResult<T> = Result<T, PoseError>;

/// Errors that can occur during pose processing.
///
/// None of these are fatal to a batch run: callers drop the frame, skip the
/// tier or continue heuristic-only.
#[derive(Debug, Error)]
pub enum PoseError {
    #[error("Invalid skeleton: expected {expected} landmarks, got {actual}")]
    InvalidSkeleton { expected: usize, actual: usize },

    #[error("Nearest-neighbor model queried before fitting")]
    ModelUnfit,

    #[error("Training data corrupt: {0}")]
    TrainingDataCorrupt(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl PoseError {
    /// Create an invalid skeleton error for a skeleton of `actual` points.
    pub fn invalid_skeleton(actual: usize) -> Self {
        Self::InvalidSkeleton {
            expected: LANDMARK_COUNT,
            actual,
        }
    }

    /// Create a training data error.
    pub fn training_data_corrupt(message: impl Into<String>) -> Self {
        Self::TrainingDataCorrupt(message.into())
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
