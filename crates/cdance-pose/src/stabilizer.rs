//! Temporal label stabilization.
//!
//! Exponential moving average of per-label confidence across frames. The
//! observed label is pulled toward the new confidence while every other label
//! decays, so a single noisy frame cannot flip the reported pose.
//!
//! Labels that stop appearing decay toward zero but keep their entry until
//! [`TemporalStabilizer::reset`] is called.

use std::collections::BTreeMap;

use tracing::debug;

use cdance_models::{ClassificationResult, PoseLabel};

use crate::config::validate_alpha;
use crate::error::PoseResult;

/// Default smoothing factor.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// EMA smoother over pose labels.
#[derive(Debug, Clone)]
pub struct TemporalStabilizer {
    alpha: f64,
    smoothed: BTreeMap<PoseLabel, f64>,
    frame_count: u64,
}

impl Default for TemporalStabilizer {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            smoothed: BTreeMap::new(),
            frame_count: 0,
        }
    }
}

impl TemporalStabilizer {
    /// Create a stabilizer with a custom alpha.
    ///
    /// # Errors
    /// `PoseError::InvalidConfig` unless `0 < alpha <= 1`.
    pub fn new(alpha: f64) -> PoseResult<Self> {
        validate_alpha(alpha)?;
        Ok(Self {
            alpha,
            ..Default::default()
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Frames observed since creation or the last reset.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Smoothed confidence for a label; 0.0 for labels never observed.
    pub fn smoothed(&self, label: PoseLabel) -> f64 {
        self.smoothed.get(&label).copied().unwrap_or(0.0)
    }

    /// Number of labels currently tracked.
    pub fn tracked_labels(&self) -> usize {
        self.smoothed.len()
    }

    /// Fold one observation in and return the smoothed winner.
    pub fn update(&mut self, label: PoseLabel, confidence: f64) -> ClassificationResult {
        let alpha = self.alpha;
        let previous = self.smoothed(label);

        for (tracked, value) in self.smoothed.iter_mut() {
            if *tracked != label {
                *value *= 1.0 - alpha;
            }
        }
        self.smoothed
            .insert(label, alpha * confidence + (1.0 - alpha) * previous);
        self.frame_count += 1;

        let result = self.best();
        debug!(
            frame = self.frame_count,
            observed = %label,
            reported = %result.label,
            confidence = result.confidence,
            "Stabilizer update"
        );
        result
    }

    /// Clear all smoothing state and the frame counter.
    pub fn reset(&mut self) {
        self.smoothed.clear();
        self.frame_count = 0;
    }

    /// Arg-max over the map; ties go to the earliest label in catalog order.
    fn best(&self) -> ClassificationResult {
        let mut best: Option<(PoseLabel, f64)> = None;
        for (label, value) in &self.smoothed {
            if best.map_or(true, |(_, v)| *value > v) {
                best = Some((*label, *value));
            }
        }
        best.map(|(label, value)| ClassificationResult::new(label, value))
            .unwrap_or_else(ClassificationResult::neutral)
    }
}
