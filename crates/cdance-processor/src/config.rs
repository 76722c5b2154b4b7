//! Processor configuration.
//!
//! Resolution order: defaults, then the JSON config file, then environment
//! variables, then CLI flags (applied by the binary).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use cdance_models::LANDMARK_COUNT;
use cdance_pose::{ClassifierConfig, SegmenterConfig};

use crate::error::{ProcessorError, ProcessorResult};

/// Default config file name.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Nose, arms and legs.
pub const DEFAULT_ACTIVE_LANDMARKS: [usize; 17] =
    [0, 11, 12, 13, 14, 15, 16, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32];

/// What the processor emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "kebab-case")]
pub enum ProcessingMode {
    /// Every (decimated) frame, unlabelled
    #[default]
    Continuous,
    /// Motion-peak frames with pose labels
    KeyPoses,
}

impl ProcessingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Continuous => "continuous",
            ProcessingMode::KeyPoses => "key_poses",
        }
    }
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProcessingMode {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "continuous" => Ok(ProcessingMode::Continuous),
            "key_poses" => Ok(ProcessingMode::KeyPoses),
            other => Err(ProcessorError::config_error(format!(
                "unknown processing mode: {other}"
            ))),
        }
    }
}

/// Processor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Output mode
    pub mode: ProcessingMode,
    /// Landmark model the sequence was extracted with (recorded only)
    pub model_complexity: Option<String>,
    /// Drop N frames between kept frames
    pub skip_frames: usize,
    /// Landmark ids recorded as active for scoring
    pub active_landmarks: Vec<usize>,
    /// Keep only active landmarks in continuous output
    pub filter_active_landmarks: bool,
    /// Reference is mirrored for webcam play (recorded only)
    pub mirror_mode: bool,
    /// Directory choreographies are written to
    pub output_dir: PathBuf,
    /// Optional training file for the learned tier
    pub training_data: Option<PathBuf>,
    pub classifier: ClassifierConfig,
    pub segmenter: SegmenterConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            mode: ProcessingMode::Continuous,
            model_complexity: Some("heavy".to_string()),
            skip_frames: 0,
            active_landmarks: DEFAULT_ACTIVE_LANDMARKS.to_vec(),
            filter_active_landmarks: false,
            mirror_mode: true,
            output_dir: PathBuf::from("choreographies"),
            training_data: None,
            classifier: ClassifierConfig::offline(),
            segmenter: SegmenterConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Load from a JSON file, writing the defaults there if it does not exist.
    pub fn load_or_create(path: impl AsRef<Path>) -> ProcessorResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            let json = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&json).map_err(|e| {
                ProcessorError::config_error(format!("{}: {e}", path.display()))
            })?;
            info!(path = %path.display(), "Loaded processor config");
            Ok(config)
        } else {
            let config = Self::default();
            config.save(path)?;
            info!(path = %path.display(), "Wrote default processor config");
            Ok(config)
        }
    }

    /// Save as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> ProcessorResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply `CDANCE_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        Self {
            mode: std::env::var("CDANCE_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(self.mode),
            model_complexity: std::env::var("CDANCE_MODEL_COMPLEXITY")
                .ok()
                .or(self.model_complexity),
            skip_frames: std::env::var("CDANCE_SKIP_FRAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(self.skip_frames),
            output_dir: std::env::var("CDANCE_OUTPUT_DIR")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(self.output_dir),
            training_data: std::env::var("CDANCE_TRAINING_DATA")
                .ok()
                .map(PathBuf::from)
                .or(self.training_data),
            mirror_mode: std::env::var("CDANCE_MIRROR_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(self.mirror_mode),
            ..self
        }
    }

    /// Check value ranges, including the nested core configs.
    pub fn validate(&self) -> ProcessorResult<()> {
        self.classifier.validate()?;
        self.segmenter.validate()?;
        if let Some(bad) = self.active_landmarks.iter().find(|id| **id >= LANDMARK_COUNT) {
            return Err(ProcessorError::config_error(format!(
                "active landmark {bad} out of range (0-{})",
                LANDMARK_COUNT - 1
            )));
        }
        Ok(())
    }
}
