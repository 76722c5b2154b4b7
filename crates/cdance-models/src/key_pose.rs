//! Offline segmentation outputs.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::landmark::Landmark;
use crate::pose_label::{Difficulty, PoseLabel};

/// A frame selected by motion-peak segmentation, with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyPose {
    pub timestamp: f64,
    pub frame_index: u64,
    pub landmarks: Vec<Landmark>,
    pub label: PoseLabel,
    pub confidence: f64,
    /// Movement magnitude that made this frame a peak
    pub movement_intensity: f64,
}

/// An unlabelled frame for raw geometry comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContinuousPose {
    pub timestamp: f64,
    pub frame_index: u64,
    pub landmarks: Vec<Landmark>,
}

/// Aggregate statistics over extracted key poses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KeyPoseStats {
    pub count: usize,
    /// Mean seconds between consecutive key poses (0 with fewer than two)
    pub average_gap: f64,
    pub label_histogram: BTreeMap<PoseLabel, usize>,
    pub difficulty_histogram: BTreeMap<Difficulty, usize>,
}

impl KeyPoseStats {
    /// Compute stats from key poses in chronological order.
    pub fn from_key_poses(key_poses: &[KeyPose]) -> Self {
        let mut label_histogram = BTreeMap::new();
        let mut difficulty_histogram = BTreeMap::new();
        for kp in key_poses {
            *label_histogram.entry(kp.label).or_insert(0) += 1;
            *difficulty_histogram.entry(kp.label.difficulty()).or_insert(0) += 1;
        }

        let average_gap = if key_poses.len() > 1 {
            let total: f64 = key_poses
                .windows(2)
                .map(|w| w[1].timestamp - w[0].timestamp)
                .sum();
            total / (key_poses.len() - 1) as f64
        } else {
            0.0
        };

        Self {
            count: key_poses.len(),
            average_gap,
            label_histogram,
            difficulty_histogram,
        }
    }
}

/// Statistics over a continuous pose stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContinuousStats {
    pub total_poses: usize,
    /// Poses per second of video
    pub fps_effective: f64,
    pub duration: f64,
}

impl ContinuousStats {
    pub fn new(total_poses: usize, duration: f64) -> Self {
        let fps_effective = if duration > 0.0 {
            // Rounded to two decimals for the output document
            ((total_poses as f64 / duration) * 100.0).round() / 100.0
        } else {
            0.0
        };
        Self {
            total_poses,
            fps_effective,
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_pose(timestamp: f64, label: PoseLabel) -> KeyPose {
        KeyPose {
            timestamp,
            frame_index: (timestamp * 30.0) as u64,
            landmarks: Vec::new(),
            label,
            confidence: 0.9,
            movement_intensity: 0.3,
        }
    }

    #[test]
    fn test_stats_histograms_and_gap() {
        let poses = vec![
            key_pose(1.0, PoseLabel::ArmsUp),
            key_pose(2.5, PoseLabel::Jump),
            key_pose(5.0, PoseLabel::ArmsUp),
        ];
        let stats = KeyPoseStats::from_key_poses(&poses);
        assert_eq!(stats.count, 3);
        assert!((stats.average_gap - 2.0).abs() < 1e-9);
        assert_eq!(stats.label_histogram[&PoseLabel::ArmsUp], 2);
        assert_eq!(stats.difficulty_histogram[&Difficulty::Easy], 2);
        assert_eq!(stats.difficulty_histogram[&Difficulty::Hard], 1);
    }

    #[test]
    fn test_stats_single_pose_has_zero_gap() {
        let stats = KeyPoseStats::from_key_poses(&[key_pose(3.0, PoseLabel::Neutral)]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.average_gap, 0.0);
    }

    #[test]
    fn test_stats_serialize_label_keys() {
        let stats = KeyPoseStats::from_key_poses(&[key_pose(0.0, PoseLabel::Crouch)]);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["label_histogram"]["agachado"], 1);
        assert_eq!(json["difficulty_histogram"]["medium"], 1);
    }

    #[test]
    fn test_continuous_stats() {
        assert_eq!(ContinuousStats::new(90, 3.0).fps_effective, 30.0);
        assert_eq!(ContinuousStats::new(10, 0.0).fps_effective, 0.0);
    }
}
