// core/tests/test_session.rs
use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use reptrack_core::{
    AngleFrame, Exercise, Joint, Rep, RepDetector, RepObserver, RepPhase, WorkoutSession,
};

fn elbows(t: u64, deg: f64) -> AngleFrame {
    AngleFrame::new(t)
        .with_angle(Joint::LeftElbow, deg)
        .with_angle(Joint::RightElbow, deg)
}

fn feed_rep(session: &mut WorkoutSession, t0: u64) -> usize {
    let mut emitted = 0;
    for (i, a) in [170.0, 115.0, 85.0, 115.0, 165.0].iter().enumerate() {
        if session.push_frame(elbows(t0 + i as u64 * 250, *a)).is_some() {
            emitted += 1;
        }
    }
    emitted
}

struct Counter {
    hits: Rc<RefCell<u32>>,
}

impl RepObserver for Counter {
    fn on_rep(&mut self, _exercise: Exercise, _rep: &Rep) {
        *self.hits.borrow_mut() += 1;
    }
}

#[test]
fn observers_see_every_rep_in_order() {
    let mut session = WorkoutSession::new(RepDetector::new(Exercise::Pushup));

    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let hits = Rc::new(RefCell::new(0u32));

    let l1 = Rc::clone(&log);
    session.subscribe(move |ex: Exercise, rep: &Rep| {
        l1.borrow_mut().push(format!("cue:{}:{}", ex, rep.duration_ms));
    });
    let l2 = Rc::clone(&log);
    session.subscribe(move |_ex: Exercise, _rep: &Rep| {
        l2.borrow_mut().push("counter".to_string());
    });
    session.subscribe(Counter { hits: Rc::clone(&hits) });

    assert_eq!(feed_rep(&mut session, 0), 1);
    assert_eq!(feed_rep(&mut session, 2_000), 1);

    assert_eq!(session.reps().len(), 2);
    assert_eq!(*hits.borrow(), 2);
    assert_eq!(
        *log.borrow(),
        vec!["cue:pushup:750", "counter", "cue:pushup:750", "counter"]
    );
}

#[test]
fn cancel_rep_keeps_completed_reps() {
    let mut session = WorkoutSession::new(RepDetector::new(Exercise::Pushup));
    assert_eq!(feed_rep(&mut session, 0), 1);

    session.push_frame(elbows(2_000, 170.0));
    session.push_frame(elbows(2_250, 115.0));
    assert_eq!(session.detector().phase(), RepPhase::Eccentric);
    session.cancel_rep();
    assert_eq!(session.detector().phase(), RepPhase::Idle);

    assert!(session.push_frame(elbows(2_500, 85.0)).is_none());
    assert!(session.push_frame(elbows(2_750, 165.0)).is_none());
    assert_eq!(session.reps().len(), 1);
}

#[test]
fn session_analysis_reflects_reps() {
    let mut session = WorkoutSession::new(RepDetector::new(Exercise::Pushup));
    assert_eq!(session.analysis().overall_score, 0);

    feed_rep(&mut session, 0);
    feed_rep(&mut session, 2_000);
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
    let a = session.analysis_at(at);
    assert_eq!(a.overall_score, 100);
    assert_eq!(a.consistency, 100);
    assert_eq!(a.range_of_motion, 100);
    assert!(a.issues.is_empty());
    assert_eq!(session.exercise(), Exercise::Pushup);
}
