use serde::{Deserialize, Serialize};

use crate::exercise::{AlignmentCheck, CheckWindow};
use crate::smoothing::median3;
use crate::types::{AngleFrame, Quality, RepPhase, GOOD_FORM_FEEDBACK};

pub const WARNING_PENALTY: i32 = 15;
pub const FLOOR_PENALTY: i32 = 30;
pub const TEMPO_PENALTY: i32 = 10;
pub const GOOD_CUTOFF: u8 = 80;
pub const BAD_CUTOFF: u8 = 50;
pub const TOO_FAST_FEEDBACK: &str = "Slow down";

/// En frame i repens bane, merket med fasen den ble observert i.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedFrame {
    pub phase: RepPhase,
    pub frame: AngleFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormVerdict {
    pub form_score: u8,
    pub quality: Quality,
    pub feedback: Vec<String>,
}

/// Kvalitet ut fra score: good ≥ 80, warning > 50, ellers bad.
pub fn quality_for(score: u8) -> Quality {
    if score >= GOOD_CUTOFF {
        Quality::Good
    } else if score > BAD_CUTOFF {
        Quality::Warning
    } else {
        Quality::Bad
    }
}

/// Trekk for ett form-mål: 0, WARNING_PENALTY eller FLOOR_PENALTY.
///
/// Verdiene medianfiltreres før vi ser på verste sample, så én støyframe
/// gir ikke trekk. Mål uten gyldige samples i vinduet gir ingen trekk.
pub fn alignment_penalty(check: &AlignmentCheck, trajectory: &[TrackedFrame], min_confidence: f64) -> i32 {
    let series: Vec<f64> = trajectory
        .iter()
        .filter(|tf| match check.window {
            CheckWindow::WholeRep => true,
            CheckWindow::Bottom => tf.phase == RepPhase::Bottom,
        })
        .filter_map(|tf| check.metric.sample(&tf.frame, min_confidence))
        .collect();

    let worst = median3(&series).into_iter().reduce(f64::min);
    match worst {
        Some(w) if w < check.floor => FLOOR_PENALTY,
        Some(w) if w < check.warning => WARNING_PENALTY,
        _ => 0,
    }
}

/// Form-score for én fullført rep. Start på 100, trekk per form-mål og for
/// for raskt tempo, klem til [0, 100].
pub fn score_rep(
    trajectory: &[TrackedFrame],
    checks: &[AlignmentCheck],
    duration_ms: u64,
    min_rep_ms: u64,
    min_confidence: f64,
) -> FormVerdict {
    let mut score = 100i32;
    let mut feedback: Vec<String> = Vec::new();

    for check in checks {
        let penalty = alignment_penalty(check, trajectory, min_confidence);
        if penalty > 0 {
            score -= penalty;
            if !feedback.iter().any(|f| f == check.message) {
                feedback.push(check.message.to_string());
            }
        }
    }

    if duration_ms < min_rep_ms {
        score -= TEMPO_PENALTY;
        feedback.push(TOO_FAST_FEEDBACK.to_string());
    }

    if feedback.is_empty() {
        feedback.push(GOOD_FORM_FEEDBACK.to_string());
    }

    let form_score = score.clamp(0, 100) as u8;
    FormVerdict { form_score, quality: quality_for(form_score), feedback }
}
