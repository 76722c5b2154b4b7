//! Metrics for the pose pipeline.
//!
//! Emitted through the `metrics` facade; nothing is recorded unless the
//! embedding application installs a recorder.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    // Classification metrics
    pub const FRAMES_CLASSIFIED_TOTAL: &str = "cdance_frames_classified_total";
    pub const FRAMES_DROPPED_TOTAL: &str = "cdance_frames_dropped_total";
    pub const CLASSIFICATION_CONFIDENCE: &str = "cdance_classification_confidence";

    // Training metrics
    pub const TRAINING_SAMPLES_ACCEPTED_TOTAL: &str = "cdance_training_samples_accepted_total";
    pub const TRAINING_SAMPLES_SKIPPED_TOTAL: &str = "cdance_training_samples_skipped_total";

    // Segmentation metrics
    pub const KEY_POSES_EXTRACTED_TOTAL: &str = "cdance_key_poses_extracted_total";
    pub const MOVEMENT_PEAKS_TOTAL: &str = "cdance_movement_peaks_total";
}

/// Record a classified frame and the tier that answered it.
pub fn record_frame_classified(tier: &str, label: &str, confidence: f64) {
    let labels = [("tier", tier.to_string()), ("label", label.to_string())];
    counter!(names::FRAMES_CLASSIFIED_TOTAL, &labels).increment(1);
    histogram!(names::CLASSIFICATION_CONFIDENCE, "tier" => tier.to_string()).record(confidence);
}

/// Record a frame rejected before classification.
pub fn record_frame_dropped(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::FRAMES_DROPPED_TOTAL, &labels).increment(1);
}

/// Record the outcome of a fitting pass.
pub fn record_training_samples(accepted: usize, skipped: usize) {
    counter!(names::TRAINING_SAMPLES_ACCEPTED_TOTAL).increment(accepted as u64);
    counter!(names::TRAINING_SAMPLES_SKIPPED_TOTAL).increment(skipped as u64);
}

/// Record a segmentation pass.
pub fn record_segmentation(peaks: usize, retained: usize) {
    counter!(names::MOVEMENT_PEAKS_TOTAL).increment(peaks as u64);
    counter!(names::KEY_POSES_EXTRACTED_TOTAL).increment(retained as u64);
}
