//! Choreography output documents.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::key_pose::{ContinuousPose, ContinuousStats, KeyPose, KeyPoseStats};

/// Parameters a choreography was processed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessingParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_complexity: Option<String>,
    pub skip_frames: usize,
    pub active_landmarks: Vec<usize>,
    pub mirror_mode: bool,
}

/// Choreography metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChoreographyMetadata {
    pub name: String,
    #[serde(default)]
    pub source_url: String,
    pub duration: f64,
    pub fps: f64,
    pub resolution: (u32, u32),
    pub total_frames: u64,
    pub processed_at: DateTime<Utc>,
    pub processing_params: ProcessingParams,
}

/// Mode-specific choreography content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChoreographyBody {
    /// Every frame, unlabelled
    Continuous {
        poses: Vec<ContinuousPose>,
        stats: ContinuousStats,
    },
    /// Motion-peak frames, classified
    KeyPoses {
        key_poses: Vec<KeyPose>,
        stats: KeyPoseStats,
    },
}

impl ChoreographyBody {
    /// Number of pose records in the body.
    pub fn len(&self) -> usize {
        match self {
            ChoreographyBody::Continuous { poses, .. } => poses.len(),
            ChoreographyBody::KeyPoses { key_poses, .. } => key_poses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A processed choreography ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Choreography {
    pub metadata: ChoreographyMetadata,
    #[serde(flatten)]
    pub body: ChoreographyBody,
}

/// Turn a choreography name into a file-system friendly slug.
///
/// Lowercases, maps spaces and dashes to underscores and drops anything
/// that is not alphanumeric or underscore.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ChoreographyMetadata {
        ChoreographyMetadata {
            name: "Demo".to_string(),
            source_url: String::new(),
            duration: 2.0,
            fps: 30.0,
            resolution: (1280, 720),
            total_frames: 60,
            processed_at: Utc::now(),
            processing_params: ProcessingParams {
                model_complexity: Some("heavy".to_string()),
                skip_frames: 0,
                active_landmarks: vec![0, 11, 12],
                mirror_mode: true,
            },
        }
    }

    #[test]
    fn test_body_is_tagged_with_mode() {
        let choreo = Choreography {
            metadata: metadata(),
            body: ChoreographyBody::Continuous {
                poses: Vec::new(),
                stats: ContinuousStats::new(0, 2.0),
            },
        };
        let json = serde_json::to_value(&choreo).unwrap();
        assert_eq!(json["mode"], "continuous");
        assert!(json["poses"].is_array());
        assert_eq!(json["metadata"]["processing_params"]["skip_frames"], 0);

        let back: Choreography = serde_json::from_value(json).unwrap();
        assert!(back.body.is_empty());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Baile de Prueba - 2"), "baile_de_prueba___2");
        assert_eq!(slugify("Hip-Hop!"), "hip_hop");
    }
}
