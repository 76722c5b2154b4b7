//! Configuration for the pose classifier and motion segmenter.

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, PoseResult};

/// Configuration for the tiered pose classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    // === Learned Classifier ===
    /// Number of neighbors consulted by the k-NN model (default: 5)
    pub k_neighbors: usize,

    /// Minimum confidence for tier 2 and heuristic acceptance (default: 0.7)
    pub confidence_threshold: f64,

    // === Quick Check ===
    /// Minimum confidence for a quick-check result to short-circuit (default: 0.9)
    pub quick_check_threshold: f64,

    // === Temporal Filter ===
    /// Smooth labels across frames in live mode (default: true)
    pub use_temporal_filter: bool,

    /// EMA alpha, lower = more inertia (default: 0.3)
    pub temporal_alpha: f64,

    // === Normalization ===
    /// Floor for the torso size divisor (default: 0.01)
    pub min_torso_size: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            k_neighbors: 5,
            confidence_threshold: 0.7,
            quick_check_threshold: 0.9,
            use_temporal_filter: true,
            temporal_alpha: 0.3,
            min_torso_size: 0.01,
        }
    }
}

impl ClassifierConfig {
    /// Offline config: no temporal filter, frames are judged independently.
    pub fn offline() -> Self {
        Self {
            use_temporal_filter: false,
            ..Default::default()
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> PoseResult<()> {
        if self.k_neighbors == 0 {
            return Err(PoseError::invalid_config("k_neighbors must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(PoseError::invalid_config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.quick_check_threshold) {
            return Err(PoseError::invalid_config(format!(
                "quick_check_threshold must be within [0, 1], got {}",
                self.quick_check_threshold
            )));
        }
        validate_alpha(self.temporal_alpha)?;
        if self.min_torso_size.is_nan() || self.min_torso_size <= 0.0 {
            return Err(PoseError::invalid_config(format!(
                "min_torso_size must be positive, got {}",
                self.min_torso_size
            )));
        }
        Ok(())
    }
}

/// Configuration for motion-peak segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Absolute movement floor a peak must exceed (default: 0.15)
    pub movement_threshold: f64,

    /// Seconds that must separate two retained events (default: 1.0)
    pub min_time_gap: f64,

    /// Joints at or below this visibility are ignored (default: 0.5)
    pub visibility_threshold: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 0.15,
            min_time_gap: 1.0,
            visibility_threshold: 0.5,
        }
    }
}

impl SegmenterConfig {
    /// Dense config: more, closer key poses.
    pub fn dense() -> Self {
        Self {
            movement_threshold: 0.08,
            min_time_gap: 0.5,
            ..Default::default()
        }
    }

    /// Sparse config: only the strongest movements.
    pub fn sparse() -> Self {
        Self {
            movement_threshold: 0.25,
            min_time_gap: 2.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> PoseResult<()> {
        if self.movement_threshold.is_nan() || self.movement_threshold < 0.0 {
            return Err(PoseError::invalid_config(format!(
                "movement_threshold must be non-negative, got {}",
                self.movement_threshold
            )));
        }
        if self.min_time_gap.is_nan() || self.min_time_gap < 0.0 {
            return Err(PoseError::invalid_config(format!(
                "min_time_gap must be non-negative, got {}",
                self.min_time_gap
            )));
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(PoseError::invalid_config(format!(
                "visibility_threshold must be within [0, 1], got {}",
                self.visibility_threshold
            )));
        }
        Ok(())
    }
}

/// EMA alpha must lie in (0, 1].
pub(crate) fn validate_alpha(alpha: f64) -> PoseResult<()> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(PoseError::invalid_config(format!(
            "temporal_alpha must be within (0, 1], got {alpha}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ClassifierConfig::default().validate().is_ok());
        assert!(SegmenterConfig::default().validate().is_ok());
        assert!(SegmenterConfig::dense().validate().is_ok());
        assert!(SegmenterConfig::sparse().validate().is_ok());
    }

    #[test]
    fn test_alpha_bounds() {
        let mut config = ClassifierConfig::default();
        config.temporal_alpha = 0.0;
        assert!(config.validate().is_err());
        config.temporal_alpha = 1.0;
        assert!(config.validate().is_ok());
        config.temporal_alpha = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_torso_floor_rejected() {
        let config = ClassifierConfig {
            min_torso_size: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_segmenter_values_rejected() {
        let config = SegmenterConfig {
            min_time_gap: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SegmenterConfig {
            movement_threshold: f64::NAN,
            ..SegmenterConfig::dense()
        };
        assert!(config.validate().is_err());

        let config = SegmenterConfig {
            min_time_gap: -0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClassifierConfig = serde_json::from_str(r#"{"k_neighbors": 3}"#).unwrap();
        assert_eq!(config.k_neighbors, 3);
        assert_eq!(config.temporal_alpha, 0.3);

        let seg: SegmenterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(seg, SegmenterConfig::default());
    }

    #[test]
    fn test_offline_disables_filter() {
        assert!(!ClassifierConfig::offline().use_temporal_filter);
    }
}
