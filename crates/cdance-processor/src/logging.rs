//! Structured run logging utilities.
//!
//! Provides tracing subscriber setup for the binary and consistent,
//! structured lifecycle logging for a single processing run.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cdance_models::{ContinuousStats, KeyPoseStats};
use cdance_pose::PoseResult;

use crate::config::ProcessingMode;

/// Install the global tracing subscriber.
///
/// `LOG_FORMAT=json` switches to JSON lines; otherwise colored text.
/// `RUST_LOG` directives are honoured on top of `cdance=info`.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = "cdance=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Lifecycle logger for one choreography run.
///
/// Every event carries the choreography name and mode as fields, and the
/// final event reports the wall-clock time since the logger was created.
#[derive(Debug, Clone)]
pub struct RunLogger {
    choreography: String,
    mode: ProcessingMode,
    started: Instant,
}

impl RunLogger {
    pub fn new(choreography: &str, mode: ProcessingMode) -> Self {
        Self {
            choreography: choreography.to_string(),
            mode,
            started: Instant::now(),
        }
    }

    /// Extractor document read from disk.
    pub fn log_loaded(&self, input: &Path, frames: usize, fps: f64) {
        info!(
            choreography = %self.choreography,
            mode = %self.mode,
            input = %input.display(),
            frames,
            fps,
            "Pose sequence loaded"
        );
    }

    pub fn log_decimated(&self, skip_frames: usize, kept: usize) {
        debug!(
            choreography = %self.choreography,
            skip_frames,
            kept,
            "Sequence decimated"
        );
    }

    /// Outcome of loading training data; failures leave the run heuristic-only.
    pub fn log_training(&self, path: &Path, outcome: &PoseResult<usize>) {
        match outcome {
            Ok(samples) => info!(
                choreography = %self.choreography,
                path = %path.display(),
                samples,
                "Learned tier fitted"
            ),
            Err(e) => warn!(
                choreography = %self.choreography,
                path = %path.display(),
                error = %e,
                "Continuing without learned tier"
            ),
        }
    }

    pub fn log_continuous(&self, stats: &ContinuousStats) {
        info!(
            choreography = %self.choreography,
            poses = stats.total_poses,
            fps_effective = stats.fps_effective,
            "Continuous poses built"
        );
    }

    pub fn log_key_poses(&self, stats: &KeyPoseStats) {
        info!(
            choreography = %self.choreography,
            key_poses = stats.count,
            average_gap = stats.average_gap,
            "Key poses extracted"
        );
    }

    pub fn log_saved(&self, path: &Path, poses: usize) {
        info!(
            choreography = %self.choreography,
            mode = %self.mode,
            output = %path.display(),
            poses,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Choreography written"
        );
    }

    pub fn log_failed(&self, err: &dyn std::fmt::Display) {
        error!(
            choreography = %self.choreography,
            mode = %self.mode,
            error = %err,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "Choreography run failed"
        );
    }

    pub fn choreography(&self) -> &str {
        &self.choreography
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Span covering the whole run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "choreography_run",
            choreography = %self.choreography,
            mode = %self.mode
        )
    }
}
