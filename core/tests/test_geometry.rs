// core/tests/test_geometry.rs
use reptrack_core::geometry::is_indeterminate;
use reptrack_core::models::idx;
use reptrack_core::{frame_from_pose, joint_angle, Exercise, Joint, Landmark, Pose, Rep, RepDetector};

/// Pose med begge armer bøyd til `elbow_deg` (2D, skulder → albue langs x-aksen).
fn arms_pose(elbow_deg: f64) -> Pose {
    let mut pose = Pose::default();
    let theta = std::f64::consts::PI - elbow_deg.to_radians();
    for (s, e, w, y) in [
        (idx::LEFT_SHOULDER, idx::LEFT_ELBOW, idx::LEFT_WRIST, 0.0),
        (idx::RIGHT_SHOULDER, idx::RIGHT_ELBOW, idx::RIGHT_WRIST, 2.0),
    ] {
        pose.landmarks[s] = Landmark::new(0.0, y, 0.95);
        pose.landmarks[e] = Landmark::new(1.0, y, 0.9);
        pose.landmarks[w] = Landmark::new(1.0 + theta.cos(), y + theta.sin(), 0.8);
    }
    pose
}

#[test]
fn frame_contains_only_determinable_joints() {
    let frame = frame_from_pose(40, &arms_pose(90.0), 0.5);
    assert_eq!(frame.timestamp_ms, 40);

    let left = frame.angle(Joint::LeftElbow, 0.5).unwrap();
    assert!((left - 90.0).abs() < 1e-6);
    assert!(frame.angles.contains_key(&Joint::RightElbow));
    // hofter/knær har confidence 0 i default-posen
    assert!(!frame.angles.contains_key(&Joint::LeftKnee));
    assert!(!frame.angles.contains_key(&Joint::LeftBodyLine));

    let conf = frame.confidence.as_ref().unwrap();
    assert_eq!(conf[&Joint::LeftElbow], 0.8);
}

#[test]
fn short_pose_is_tolerated() {
    let pose = Pose::new(vec![Landmark::new(0.0, 0.0, 1.0); 5]);
    let frame = frame_from_pose(0, &pose, 0.5);
    assert!(frame.angles.is_empty());
}

#[test]
fn angles_stay_in_range() {
    let b = Landmark::new(0.0, 0.0, 1.0);
    for i in 0..360 {
        let t = (i as f64).to_radians();
        let a = joint_angle(&Landmark::new(1.0, 0.0, 1.0), &b, &Landmark::new(t.cos(), t.sin(), 1.0), 0.5);
        assert!(!is_indeterminate(a));
        assert!((0.0..=180.0).contains(&a), "{a}");
    }
}

#[test]
fn pose_stream_drives_detector() {
    let mut det = RepDetector::new(Exercise::Pushup);
    let reps: Vec<Rep> = [170.0, 115.0, 85.0, 115.0, 165.0]
        .iter()
        .enumerate()
        .filter_map(|(i, deg)| det.observe(frame_from_pose(i as u64 * 250, &arms_pose(*deg), 0.5)))
        .collect();
    assert_eq!(reps.len(), 1);
    assert_eq!(reps[0].duration_ms, 750);
}
