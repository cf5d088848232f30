// core/tests/test_scoring.rs
use reptrack_core::exercise::{BICEP_CURL_ALIGNMENT, PUSHUP_ALIGNMENT};
use reptrack_core::scoring::{quality_for, score_rep, TrackedFrame};
use reptrack_core::{AngleFrame, Joint, Quality, RepPhase, GOOD_FORM_FEEDBACK};

fn tracked(phase: RepPhase, body_line: f64, shoulder: f64) -> TrackedFrame {
    TrackedFrame {
        phase,
        frame: AngleFrame::new(0)
            .with_angle(Joint::LeftBodyLine, body_line)
            .with_angle(Joint::RightBodyLine, body_line)
            .with_angle(Joint::LeftShoulder, shoulder)
            .with_angle(Joint::RightShoulder, shoulder),
    }
}

fn rep_with(body_line: f64, bottom_shoulder: f64) -> Vec<TrackedFrame> {
    vec![
        tracked(RepPhase::Eccentric, body_line, 40.0),
        tracked(RepPhase::Eccentric, body_line, 45.0),
        tracked(RepPhase::Bottom, body_line, bottom_shoulder),
        tracked(RepPhase::Bottom, body_line, bottom_shoulder),
        tracked(RepPhase::Concentric, body_line, 45.0),
        tracked(RepPhase::Top, body_line, 40.0),
    ]
}

#[test]
fn quality_cutoffs() {
    assert_eq!(quality_for(100), Quality::Good);
    assert_eq!(quality_for(80), Quality::Good);
    assert_eq!(quality_for(79), Quality::Warning);
    assert_eq!(quality_for(51), Quality::Warning);
    assert_eq!(quality_for(50), Quality::Bad);
    assert_eq!(quality_for(0), Quality::Bad);
}

#[test]
fn clean_rep_scores_full() {
    let v = score_rep(&rep_with(176.0, 45.0), PUSHUP_ALIGNMENT, 1500, 600, 0.5);
    assert_eq!(v.form_score, 100);
    assert_eq!(v.quality, Quality::Good);
    assert_eq!(v.feedback, vec![GOOD_FORM_FEEDBACK.to_string()]);
}

#[test]
fn warning_and_floor_penalties() {
    let warn = score_rep(&rep_with(155.0, 45.0), PUSHUP_ALIGNMENT, 1500, 600, 0.5);
    assert_eq!(warn.form_score, 85);
    assert_eq!(warn.quality, Quality::Good);
    assert_eq!(warn.feedback, vec!["Body not aligned".to_string()]);

    let floor = score_rep(&rep_with(140.0, 45.0), PUSHUP_ALIGNMENT, 1500, 600, 0.5);
    assert_eq!(floor.form_score, 70);
    assert_eq!(floor.quality, Quality::Warning);
}

#[test]
fn bottom_window_check_ignores_other_phases() {
    // flare utenfor bunnen teller ikke
    let mut traj = rep_with(176.0, 45.0);
    traj[0] = tracked(RepPhase::Eccentric, 176.0, 95.0);
    traj[1] = tracked(RepPhase::Eccentric, 176.0, 95.0);
    let v = score_rep(&traj, PUSHUP_ALIGNMENT, 1500, 600, 0.5);
    assert_eq!(v.form_score, 100);

    // 95° i bunnen → 180-95 = 85 < floor 90
    let v = score_rep(&rep_with(176.0, 95.0), PUSHUP_ALIGNMENT, 1500, 600, 0.5);
    assert_eq!(v.form_score, 70);
    assert_eq!(v.feedback, vec!["Elbow flare".to_string()]);
}

#[test]
fn single_noisy_sample_is_not_penalised() {
    let mut traj = rep_with(176.0, 45.0);
    traj[4] = tracked(RepPhase::Concentric, 120.0, 45.0);
    let v = score_rep(&traj, PUSHUP_ALIGNMENT, 1500, 600, 0.5);
    assert_eq!(v.form_score, 100);
}

#[test]
fn penalties_stack_and_feedback_is_ordered() {
    let v = score_rep(&rep_with(140.0, 95.0), PUSHUP_ALIGNMENT, 400, 600, 0.5);
    assert_eq!(v.form_score, 30);
    assert_eq!(v.quality, Quality::Bad);
    assert_eq!(
        v.feedback,
        vec!["Body not aligned".to_string(), "Elbow flare".to_string(), "Slow down".to_string()]
    );
}

#[test]
fn score_is_clamped_at_zero() {
    let checks: Vec<_> = PUSHUP_ALIGNMENT
        .iter()
        .chain(PUSHUP_ALIGNMENT)
        .chain(PUSHUP_ALIGNMENT)
        .copied()
        .collect();
    let v = score_rep(&rep_with(100.0, 120.0), &checks, 100, 600, 0.5);
    assert_eq!(v.form_score, 0);
    // samme melding flere ganger gir én feedback
    assert_eq!(v.feedback.len(), 3);
}

#[test]
fn curl_swing_flagged() {
    let traj: Vec<TrackedFrame> = (0..5)
        .map(|_| TrackedFrame {
            phase: RepPhase::Concentric,
            frame: AngleFrame::new(0)
                .with_angle(Joint::LeftShoulder, 40.0)
                .with_angle(Joint::RightShoulder, 15.0)
                .with_angle(Joint::LeftHip, 176.0)
                .with_angle(Joint::RightHip, 176.0),
        })
        .collect();
    let v = score_rep(&traj, BICEP_CURL_ALIGNMENT, 1500, 700, 0.5);
    // 180-40 = 140: under warning 150, over floor 135
    assert_eq!(v.form_score, 85);
    assert_eq!(v.feedback, vec!["Keep elbows pinned to your sides".to_string()]);
}
