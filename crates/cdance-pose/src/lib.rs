#![deny(unreachable_patterns)]
//! Pose classification and motion segmentation for Clone Dance.
//!
//! This crate provides:
//! - Torso-relative landmark normalization and pairwise-distance embeddings
//! - A tiered pose classifier (quick checks, nearest-neighbor model, heuristics)
//! - EMA label stabilization for live comparison
//! - Motion-peak segmentation and offline key pose extraction
//! - Named joint angles
//!
//! Everything is synchronous and single-threaded; a classifier owns its
//! model and smoothing state.

pub mod angles;
pub mod classifier;
pub mod config;
pub mod embedding;
pub mod error;
pub mod heuristics;
pub mod knn;
pub mod metrics;
pub mod normalizer;
pub mod offline;
pub mod segmenter;
pub mod stabilizer;

#[cfg(test)]
mod test_support;

pub use angles::{joint_angle, joint_angles, JointAngle, ANGLE_JOINTS};
pub use classifier::{ClassificationTier, PoseClassifier};
pub use config::{ClassifierConfig, SegmenterConfig};
pub use embedding::{build_embedding, Embedding, EMBEDDING_DIM, JOINT_PAIRS};
pub use error::{PoseError, PoseResult};
pub use knn::{KnnClassifier, NeighborModel};
pub use normalizer::{NormalizedSkeleton, Normalizer};
pub use offline::{continuous_poses, KeyPoseExtractor};
pub use segmenter::{MotionSegmenter, Segmentation, KEY_JOINTS};
pub use stabilizer::TemporalStabilizer;
