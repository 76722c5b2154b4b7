//! Rule-based pose detection.
//!
//! Two rule sets:
//! - **Quick checks** run on raw image coordinates before anything else and
//!   only report unmistakable poses.
//! - **Fallback rules** run on the normalized skeleton (torso units, y grows
//!   downward) when the learned model is unavailable or unsure. They are
//!   evaluated in table order and the first match wins.

use cdance_models::{index::*, ClassificationResult, Landmark, PoseLabel};

use crate::normalizer::NormalizedSkeleton;

/// Confidence reported by a quick-check hit.
pub const QUICK_CHECK_CONFIDENCE: f64 = 0.95;

/// Quick checks require this visibility on the joints they inspect.
const QUICK_CHECK_VISIBILITY: f64 = 0.7;

/// Wrist rise above the shoulder, raw image units.
const QUICK_ARMS_UP_MARGIN: f64 = 0.35;

/// Fallback rules ignore joints at or below this visibility.
const RULE_VISIBILITY: f64 = 0.5;

/// Confidence of a fallback match.
const RULE_CONFIDENCE: f64 = 0.85;

/// A single fallback rule over a normalized skeleton.
#[derive(Clone, Copy)]
pub struct HeuristicRule {
    pub label: PoseLabel,
    pub confidence: f64,
    pub matches: fn(&NormalizedSkeleton) -> bool,
}

impl std::fmt::Debug for HeuristicRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicRule")
            .field("label", &self.label)
            .field("confidence", &self.confidence)
            .finish()
    }
}

/// Fallback rules in evaluation order.
pub const FALLBACK_RULES: [HeuristicRule; 12] = [
    HeuristicRule { label: PoseLabel::Jump, confidence: 0.80, matches: is_jump },
    HeuristicRule { label: PoseLabel::Crouch, confidence: RULE_CONFIDENCE, matches: is_crouch },
    HeuristicRule { label: PoseLabel::ArmsUp, confidence: RULE_CONFIDENCE, matches: is_arms_up },
    HeuristicRule { label: PoseLabel::ArmsSpread, confidence: RULE_CONFIDENCE, matches: is_arms_spread },
    HeuristicRule { label: PoseLabel::RightArmUp, confidence: RULE_CONFIDENCE, matches: is_right_arm_up },
    HeuristicRule { label: PoseLabel::LeftArmUp, confidence: RULE_CONFIDENCE, matches: is_left_arm_up },
    HeuristicRule { label: PoseLabel::RightLegRaised, confidence: RULE_CONFIDENCE, matches: is_right_leg_raised },
    HeuristicRule { label: PoseLabel::LeftLegRaised, confidence: RULE_CONFIDENCE, matches: is_left_leg_raised },
    HeuristicRule { label: PoseLabel::HandsOnHips, confidence: RULE_CONFIDENCE, matches: is_hands_on_hips },
    HeuristicRule { label: PoseLabel::ArmsForward, confidence: RULE_CONFIDENCE, matches: is_arms_forward },
    HeuristicRule { label: PoseLabel::TurnRight, confidence: RULE_CONFIDENCE, matches: is_turn_right },
    HeuristicRule { label: PoseLabel::TurnLeft, confidence: RULE_CONFIDENCE, matches: is_turn_left },
];

// ============================================================================
// Quick checks (raw coordinates)
// ============================================================================

/// Detect unmistakable poses directly from raw landmarks.
///
/// Works on any slice; missing indices simply fail the check.
pub fn quick_check(landmarks: &[Landmark]) -> Option<ClassificationResult> {
    if quick_arms_up(landmarks) {
        return Some(ClassificationResult::new(PoseLabel::ArmsUp, QUICK_CHECK_CONFIDENCE));
    }
    if quick_deep_squat(landmarks) {
        return Some(ClassificationResult::new(PoseLabel::Crouch, QUICK_CHECK_CONFIDENCE));
    }
    None
}

fn quick_arms_up(landmarks: &[Landmark]) -> bool {
    let pairs = [(LEFT_WRIST, LEFT_SHOULDER), (RIGHT_WRIST, RIGHT_SHOULDER)];
    pairs.iter().all(|(wrist, shoulder)| {
        match (landmarks.get(*wrist), landmarks.get(*shoulder)) {
            (Some(w), Some(s)) => {
                w.is_visible(QUICK_CHECK_VISIBILITY) && w.y < s.y - QUICK_ARMS_UP_MARGIN
            }
            _ => false,
        }
    })
}

fn quick_deep_squat(landmarks: &[Landmark]) -> bool {
    let pairs = [(LEFT_HIP, LEFT_KNEE), (RIGHT_HIP, RIGHT_KNEE)];
    pairs.iter().all(|(hip, knee)| {
        match (landmarks.get(*hip), landmarks.get(*knee)) {
            (Some(h), Some(k)) => k.is_visible(QUICK_CHECK_VISIBILITY) && h.y >= k.y,
            _ => false,
        }
    })
}

// ============================================================================
// Fallback rules (torso units)
// ============================================================================

/// Run the fallback table; first rule at or above `threshold` wins,
/// otherwise neutral.
pub fn fallback(skeleton: &NormalizedSkeleton, threshold: f64) -> ClassificationResult {
    FALLBACK_RULES
        .iter()
        .find(|rule| rule.confidence >= threshold && (rule.matches)(skeleton))
        .map(|rule| ClassificationResult::new(rule.label, rule.confidence))
        .unwrap_or_else(ClassificationResult::neutral)
}

#[inline]
fn visible(s: &NormalizedSkeleton, idx: usize) -> bool {
    s.get(idx).is_visible(RULE_VISIBILITY)
}

fn wrist_raised(s: &NormalizedSkeleton, wrist: usize, shoulder: usize) -> bool {
    visible(s, wrist) && s.get(wrist).y < s.get(shoulder).y - 0.3
}

fn is_jump(s: &NormalizedSkeleton) -> bool {
    if !visible(s, LEFT_ANKLE) || !visible(s, RIGHT_ANKLE) {
        return false;
    }
    let ankle_y = (s.get(LEFT_ANKLE).y + s.get(RIGHT_ANKLE).y) / 2.0;
    let hip_y = (s.get(LEFT_HIP).y + s.get(RIGHT_HIP).y) / 2.0;
    // Legs tucked under the body
    ankle_y - hip_y < 0.5
}

fn is_crouch(s: &NormalizedSkeleton) -> bool {
    [(LEFT_KNEE, LEFT_HIP), (RIGHT_KNEE, RIGHT_HIP)]
        .iter()
        .all(|(knee, hip)| visible(s, *knee) && s.get(*knee).y - s.get(*hip).y < 0.35)
}

fn is_arms_up(s: &NormalizedSkeleton) -> bool {
    wrist_raised(s, LEFT_WRIST, LEFT_SHOULDER) && wrist_raised(s, RIGHT_WRIST, RIGHT_SHOULDER)
}

fn is_arms_spread(s: &NormalizedSkeleton) -> bool {
    if !visible(s, LEFT_WRIST) || !visible(s, RIGHT_WRIST) {
        return false;
    }
    let (lw, rw) = (s.get(LEFT_WRIST), s.get(RIGHT_WRIST));
    let (ls, rs) = (s.get(LEFT_SHOULDER), s.get(RIGHT_SHOULDER));
    let level = (lw.y - ls.y).abs() < 0.2 && (rw.y - rs.y).abs() < 0.2;
    let wide = (lw.x - rw.x).abs() > 2.0 * (ls.x - rs.x).abs();
    level && wide
}

fn is_right_arm_up(s: &NormalizedSkeleton) -> bool {
    wrist_raised(s, RIGHT_WRIST, RIGHT_SHOULDER) && !wrist_raised(s, LEFT_WRIST, LEFT_SHOULDER)
}

fn is_left_arm_up(s: &NormalizedSkeleton) -> bool {
    wrist_raised(s, LEFT_WRIST, LEFT_SHOULDER) && !wrist_raised(s, RIGHT_WRIST, RIGHT_SHOULDER)
}

fn is_right_leg_raised(s: &NormalizedSkeleton) -> bool {
    visible(s, LEFT_ANKLE)
        && visible(s, RIGHT_ANKLE)
        && s.get(RIGHT_ANKLE).y < s.get(LEFT_ANKLE).y - 0.5
}

fn is_left_leg_raised(s: &NormalizedSkeleton) -> bool {
    visible(s, LEFT_ANKLE)
        && visible(s, RIGHT_ANKLE)
        && s.get(LEFT_ANKLE).y < s.get(RIGHT_ANKLE).y - 0.5
}

fn is_hands_on_hips(s: &NormalizedSkeleton) -> bool {
    let sides = [
        (LEFT_WRIST, LEFT_ELBOW, LEFT_SHOULDER, LEFT_HIP),
        (RIGHT_WRIST, RIGHT_ELBOW, RIGHT_SHOULDER, RIGHT_HIP),
    ];
    sides.iter().all(|(wrist, elbow, shoulder, hip)| {
        if !visible(s, *wrist) || !visible(s, *elbow) {
            return false;
        }
        let (w, h) = (s.get(*wrist), s.get(*hip));
        let on_hip = ((w.x - h.x).powi(2) + (w.y - h.y).powi(2)).sqrt() < 0.35;
        // Elbows flared outward
        let flared = s.get(*elbow).x.abs() > s.get(*shoulder).x.abs() + 0.2;
        on_hip && flared
    })
}

fn is_arms_forward(s: &NormalizedSkeleton) -> bool {
    [(LEFT_WRIST, LEFT_SHOULDER), (RIGHT_WRIST, RIGHT_SHOULDER)]
        .iter()
        .all(|(wrist, shoulder)| {
            let (w, sh) = (s.get(*wrist), s.get(*shoulder));
            visible(s, *wrist) && (w.y - sh.y).abs() < 0.25 && w.z < sh.z - 0.3
        })
}

/// Shoulders foreshortened: the body is side-on to the camera.
fn shoulders_turned(s: &NormalizedSkeleton) -> bool {
    visible(s, LEFT_SHOULDER)
        && visible(s, RIGHT_SHOULDER)
        && (s.get(LEFT_SHOULDER).x - s.get(RIGHT_SHOULDER).x).abs() < 0.3
}

fn is_turn_right(s: &NormalizedSkeleton) -> bool {
    shoulders_turned(s) && s.get(LEFT_SHOULDER).z < s.get(RIGHT_SHOULDER).z
}

fn is_turn_left(s: &NormalizedSkeleton) -> bool {
    shoulders_turned(s) && s.get(RIGHT_SHOULDER).z < s.get(LEFT_SHOULDER).z
}
