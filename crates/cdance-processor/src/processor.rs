//! Choreography processing.
//!
//! Turns an extracted pose sequence into a choreography document, either
//! continuous (every kept frame) or key poses (motion peaks, classified).

use std::path::{Path, PathBuf};

use chrono::Utc;

use cdance_models::{
    slugify, Choreography, ChoreographyBody, ChoreographyMetadata, ContinuousStats,
    PoseSequence, ProcessingParams,
};
use cdance_pose::{continuous_poses, KeyPoseExtractor};

use crate::config::{ProcessingMode, ProcessorConfig};
use crate::error::{ProcessorError, ProcessorResult};
use crate::logging::RunLogger;

/// One processing request.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Pose sequence JSON from the landmark extractor
    pub input: PathBuf,
    /// Choreography name, also used for the output file name
    pub name: String,
    /// Where the source video came from
    pub source_url: String,
}

/// Builds and persists choreographies.
#[derive(Debug, Clone)]
pub struct ChoreographyProcessor {
    config: ProcessorConfig,
}

impl ChoreographyProcessor {
    /// Create a processor with a validated config.
    pub fn new(config: ProcessorConfig) -> ProcessorResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Load, process and save. Returns the document and where it was written.
    pub fn process(&self, request: &ProcessRequest) -> ProcessorResult<(Choreography, PathBuf)> {
        let logger = RunLogger::new(&request.name, self.config.mode);
        let _span = logger.create_span().entered();

        let result = self.run(request, &logger);
        match &result {
            Ok((choreography, path)) => logger.log_saved(path, choreography.body.len()),
            Err(e) => logger.log_failed(e),
        }
        result
    }

    fn run(
        &self,
        request: &ProcessRequest,
        logger: &RunLogger,
    ) -> ProcessorResult<(Choreography, PathBuf)> {
        let sequence = load_sequence(&request.input)?;
        logger.log_loaded(&request.input, sequence.poses.len(), sequence.metadata.fps);

        let choreography = self.build(sequence, &request.name, &request.source_url, logger)?;
        let path = self.save(&choreography)?;
        Ok((choreography, path))
    }

    /// Build a choreography from an in-memory sequence.
    pub fn build(
        &self,
        mut sequence: PoseSequence,
        name: &str,
        source_url: &str,
        logger: &RunLogger,
    ) -> ProcessorResult<Choreography> {
        if sequence.poses.is_empty() {
            return Err(ProcessorError::EmptySequence);
        }

        if self.config.skip_frames > 0 {
            sequence.decimate(self.config.skip_frames);
            logger.log_decimated(self.config.skip_frames, sequence.poses.len());
        }
        let duration = effective_duration(&sequence);

        let body = match self.config.mode {
            ProcessingMode::Continuous => {
                let active = self
                    .config
                    .filter_active_landmarks
                    .then_some(self.config.active_landmarks.as_slice());
                let poses = continuous_poses(&sequence.poses, active);
                let stats = ContinuousStats::new(poses.len(), duration);
                logger.log_continuous(&stats);
                ChoreographyBody::Continuous { poses, stats }
            }
            ProcessingMode::KeyPoses => {
                let mut extractor = KeyPoseExtractor::new(
                    self.config.segmenter.clone(),
                    self.config.classifier.clone(),
                )?;
                if let Some(path) = &self.config.training_data {
                    // Heuristic-only classification is still usable
                    let outcome = extractor.classifier_mut().load_training_data(path);
                    logger.log_training(path, &outcome);
                }
                let (key_poses, stats) = extractor.extract(&sequence.poses);
                logger.log_key_poses(&stats);
                ChoreographyBody::KeyPoses { key_poses, stats }
            }
        };

        let metadata = ChoreographyMetadata {
            name: name.to_string(),
            source_url: source_url.to_string(),
            duration,
            fps: sequence.metadata.fps,
            resolution: sequence.metadata.resolution,
            total_frames: sequence.metadata.total_frames,
            processed_at: Utc::now(),
            processing_params: ProcessingParams {
                model_complexity: sequence
                    .metadata
                    .model_complexity
                    .clone()
                    .or_else(|| self.config.model_complexity.clone()),
                skip_frames: self.config.skip_frames,
                active_landmarks: self.config.active_landmarks.clone(),
                mirror_mode: self.config.mirror_mode,
            },
        };

        Ok(Choreography { metadata, body })
    }

    /// Write `<output_dir>/<slug(name)>.json`.
    pub fn save(&self, choreography: &Choreography) -> ProcessorResult<PathBuf> {
        let slug = slugify(&choreography.metadata.name);
        if slug.is_empty() {
            return Err(ProcessorError::invalid_input(format!(
                "choreography name {:?} has no usable characters",
                choreography.metadata.name
            )));
        }

        std::fs::create_dir_all(&self.config.output_dir)?;
        let path = self.config.output_dir.join(format!("{slug}.json"));
        std::fs::write(&path, serde_json::to_string_pretty(choreography)?)?;
        Ok(path)
    }
}

/// Read an extractor document from disk.
pub fn load_sequence(path: impl AsRef<Path>) -> ProcessorResult<PoseSequence> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProcessorError::InputNotFound(path.to_path_buf()));
    }
    let json = std::fs::read_to_string(path)?;
    PoseSequence::from_json(&json)
        .map_err(|e| ProcessorError::invalid_input(format!("{}: {e}", path.display())))
}

/// Reported duration, or the timestamp span when the extractor left it at 0.
fn effective_duration(sequence: &PoseSequence) -> f64 {
    if sequence.metadata.duration > 0.0 {
        return sequence.metadata.duration;
    }
    match (sequence.poses.first(), sequence.poses.last()) {
        (Some(first), Some(last)) => (last.timestamp - first.timestamp).max(0.0),
        _ => 0.0,
    }
}
