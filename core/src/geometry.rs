use crate::models::{idx, Landmark, Pose};
use crate::types::{AngleFrame, Joint};

/// Sentinel for "vinkel kan ikke bestemmes" (lav confidence / degenerert segment).
pub const INDETERMINATE: f64 = f64::NAN;

#[inline]
pub fn is_indeterminate(angle: f64) -> bool {
    !angle.is_finite()
}

/// Vinkel (grader, 0–180) i midtleddet `b` mellom segmentene b→a og b→c.
///
/// Returnerer `INDETERMINATE` når et av landemerkene har confidence under
/// `min_confidence` eller et segment har null lengde. Panikker aldri.
pub fn joint_angle(a: &Landmark, b: &Landmark, c: &Landmark, min_confidence: f64) -> f64 {
    if a.confidence < min_confidence || b.confidence < min_confidence || c.confidence < min_confidence {
        return INDETERMINATE;
    }

    let v1 = [a.x - b.x, a.y - b.y, a.z - b.z];
    let v2 = [c.x - b.x, c.y - b.y, c.z - b.z];
    let n1 = (v1[0] * v1[0] + v1[1] * v1[1] + v1[2] * v1[2]).sqrt();
    let n2 = (v2[0] * v2[0] + v2[1] * v2[1] + v2[2] * v2[2]).sqrt();
    if n1 <= f64::EPSILON || n2 <= f64::EPSILON || !n1.is_finite() || !n2.is_finite() {
        return INDETERMINATE;
    }

    let dot = v1[0] * v2[0] + v1[1] * v2[1] + v1[2] * v2[2];
    // avrunding kan gi |cos| litt over 1
    let cos = (dot / (n1 * n2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Landemerke-triplett (ytre, midt, ytre) for hvert ledd.
fn joint_landmarks(joint: Joint) -> (usize, usize, usize) {
    match joint {
        Joint::LeftElbow => (idx::LEFT_SHOULDER, idx::LEFT_ELBOW, idx::LEFT_WRIST),
        Joint::RightElbow => (idx::RIGHT_SHOULDER, idx::RIGHT_ELBOW, idx::RIGHT_WRIST),
        Joint::LeftShoulder => (idx::LEFT_HIP, idx::LEFT_SHOULDER, idx::LEFT_ELBOW),
        Joint::RightShoulder => (idx::RIGHT_HIP, idx::RIGHT_SHOULDER, idx::RIGHT_ELBOW),
        Joint::LeftHip => (idx::LEFT_SHOULDER, idx::LEFT_HIP, idx::LEFT_KNEE),
        Joint::RightHip => (idx::RIGHT_SHOULDER, idx::RIGHT_HIP, idx::RIGHT_KNEE),
        Joint::LeftKnee => (idx::LEFT_HIP, idx::LEFT_KNEE, idx::LEFT_ANKLE),
        Joint::RightKnee => (idx::RIGHT_HIP, idx::RIGHT_KNEE, idx::RIGHT_ANKLE),
        Joint::LeftBodyLine => (idx::LEFT_SHOULDER, idx::LEFT_HIP, idx::LEFT_ANKLE),
        Joint::RightBodyLine => (idx::RIGHT_SHOULDER, idx::RIGHT_HIP, idx::RIGHT_ANKLE),
    }
}

/// Bygg en `AngleFrame` med alle ledd som lar seg beregne fra posen.
/// Ubestemmelige ledd utelates; confidence per ledd = laveste av de tre landemerkene.
pub fn frame_from_pose(timestamp_ms: u64, pose: &Pose, min_confidence: f64) -> AngleFrame {
    let mut frame = AngleFrame::new(timestamp_ms);
    for joint in Joint::ALL {
        let (ia, ib, ic) = joint_landmarks(joint);
        let (Some(a), Some(b), Some(c)) = (pose.get(ia), pose.get(ib), pose.get(ic)) else {
            continue;
        };
        let angle = joint_angle(a, b, c, min_confidence);
        if is_indeterminate(angle) {
            continue;
        }
        let conf = a.confidence.min(b.confidence).min(c.confidence);
        frame = frame.with_angle(joint, angle).with_confidence(joint, conf);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f64, y: f64) -> Landmark {
        Landmark::new(x, y, 0.9)
    }

    #[test]
    fn right_angle() {
        let a = joint_angle(&lm(1.0, 0.0), &lm(0.0, 0.0), &lm(0.0, 1.0), 0.5);
        assert!((a - 90.0).abs() < 1e-9);
    }

    #[test]
    fn straight_and_folded() {
        let straight = joint_angle(&lm(-1.0, 0.0), &lm(0.0, 0.0), &lm(2.0, 0.0), 0.5);
        let folded = joint_angle(&lm(1.0, 0.0), &lm(0.0, 0.0), &lm(3.0, 0.0), 0.5);
        assert!((straight - 180.0).abs() < 1e-9);
        assert!(folded.abs() < 1e-9);
    }

    #[test]
    fn uses_z_when_present() {
        let a = joint_angle(
            &lm(1.0, 0.0),
            &lm(0.0, 0.0),
            &Landmark::new(0.0, 0.0, 0.9).with_z(1.0),
            0.5,
        );
        assert!((a - 90.0).abs() < 1e-9);
    }

    #[test]
    fn low_confidence_is_indeterminate() {
        let weak = Landmark::new(0.0, 1.0, 0.1);
        assert!(is_indeterminate(joint_angle(&lm(1.0, 0.0), &lm(0.0, 0.0), &weak, 0.5)));
    }

    #[test]
    fn zero_length_segment_is_indeterminate() {
        assert!(is_indeterminate(joint_angle(&lm(0.0, 0.0), &lm(0.0, 0.0), &lm(1.0, 0.0), 0.5)));
    }
}
