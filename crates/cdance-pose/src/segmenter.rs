//! Motion-peak segmentation.
//!
//! Picks the frames of a recorded routine where the dancer moves the most.
//!
//! # Algorithm
//! 1. Movement per consecutive frame pair: mean 3D displacement over the key
//!    joints visible in both frames (frame 0 is 0, no shared joint is 0)
//! 2. Peaks: strict local maxima above `movement_threshold`, excluding the
//!    first and last frame
//! 3. De-duplication: a peak more than `min_time_gap` after the last retained
//!    event opens a new event, otherwise it replaces that event when strictly
//!    stronger

use tracing::{debug, info};

use cdance_models::{index::*, Landmark, PoseFrame};

use crate::config::SegmenterConfig;
use crate::error::PoseResult;
use crate::metrics;

/// Joints whose displacement counts as movement.
pub const KEY_JOINTS: [usize; 12] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
    LEFT_KNEE,
    RIGHT_KNEE,
    LEFT_ANKLE,
    RIGHT_ANKLE,
];

/// Full result of a segmentation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    /// Movement magnitude per frame
    pub movement: Vec<f64>,
    /// Peak candidates before de-duplication
    pub peaks: Vec<usize>,
    /// Retained frame indices, in order
    pub retained: Vec<usize>,
}

impl Segmentation {
    /// Movement at a frame, 0.0 when out of range.
    pub fn intensity(&self, idx: usize) -> f64 {
        self.movement.get(idx).copied().unwrap_or(0.0)
    }
}

/// Mean displacement of the key joints between two frames.
///
/// Joints missing from either frame, or at or below `visibility_threshold`
/// in either, are ignored.
pub fn movement_between(prev: &[Landmark], curr: &[Landmark], visibility_threshold: f64) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for idx in KEY_JOINTS {
        if let (Some(a), Some(b)) = (prev.get(idx), curr.get(idx)) {
            if a.is_visible(visibility_threshold) && b.is_visible(visibility_threshold) {
                total += a.distance(b);
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Per-frame movement series; element 0 is always 0.
pub fn movement_series(frames: &[PoseFrame], visibility_threshold: f64) -> Vec<f64> {
    let mut movement = Vec::with_capacity(frames.len());
    if frames.is_empty() {
        return movement;
    }
    movement.push(0.0);
    movement.extend(
        frames
            .windows(2)
            .map(|w| movement_between(&w[0].landmarks, &w[1].landmarks, visibility_threshold)),
    );
    movement
}

/// Strict local maxima above `threshold`, endpoints excluded.
pub fn detect_peaks(movement: &[f64], threshold: f64) -> Vec<usize> {
    if movement.len() < 3 {
        return Vec::new();
    }
    (1..movement.len() - 1)
        .filter(|&i| {
            let m = movement[i];
            m > movement[i - 1] && m > movement[i + 1] && m > threshold
        })
        .collect()
}

/// Collapse peaks closer than `min_time_gap` seconds.
///
/// Each candidate is compared only against the most recently retained event.
pub fn deduplicate(
    peaks: &[usize],
    movement: &[f64],
    timestamps: &[f64],
    min_time_gap: f64,
) -> Vec<usize> {
    let mut retained: Vec<usize> = Vec::with_capacity(peaks.len());
    for &idx in peaks {
        let (Some(&t), Some(&m)) = (timestamps.get(idx), movement.get(idx)) else {
            continue;
        };
        match retained.last_mut() {
            Some(last) if t - timestamps[*last] <= min_time_gap => {
                if m > movement[*last] {
                    *last = idx;
                }
            }
            _ => retained.push(idx),
        }
    }
    retained
}

/// Offline motion segmenter.
#[derive(Debug, Clone, Default)]
pub struct MotionSegmenter {
    config: SegmenterConfig,
}

impl MotionSegmenter {
    /// Create a segmenter with a validated config.
    pub fn new(config: SegmenterConfig) -> PoseResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Retained key-frame indices.
    pub fn segment(&self, frames: &[PoseFrame]) -> Vec<usize> {
        self.analyze(frames).retained
    }

    /// Run all three passes and keep the intermediate series.
    pub fn analyze(&self, frames: &[PoseFrame]) -> Segmentation {
        let movement = movement_series(frames, self.config.visibility_threshold);
        let peaks = detect_peaks(&movement, self.config.movement_threshold);
        let timestamps: Vec<f64> = frames.iter().map(|f| f.timestamp).collect();
        let retained = deduplicate(&peaks, &movement, &timestamps, self.config.min_time_gap);

        debug!(
            frames = frames.len(),
            max_movement = movement.iter().copied().fold(0.0, f64::max),
            "Movement series computed"
        );
        info!(
            frames = frames.len(),
            peaks = peaks.len(),
            retained = retained.len(),
            threshold = self.config.movement_threshold,
            min_time_gap = self.config.min_time_gap,
            "Segmentation complete"
        );
        metrics::record_segmentation(peaks.len(), retained.len());

        Segmentation {
            movement,
            peaks,
            retained,
        }
    }
}
