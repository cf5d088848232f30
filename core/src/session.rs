use chrono::{DateTime, Utc};

use crate::detector::RepDetector;
use crate::exercise::Exercise;
use crate::metrics::{analyze_form, analyze_form_at};
use crate::types::{AngleFrame, FormAnalysis, Rep};

/// Mottar fullførte reps (lyd-cue, teller i UI, lagring …).
pub trait RepObserver {
    fn on_rep(&mut self, exercise: Exercise, rep: &Rep);
}

impl<F> RepObserver for F
where
    F: FnMut(Exercise, &Rep),
{
    fn on_rep(&mut self, exercise: Exercise, rep: &Rep) {
        self(exercise, rep)
    }
}

/// Én aktiv øvelse: detektor + replisten. Observatører registreres eksplisitt
/// på økta som eier dem.
pub struct WorkoutSession {
    detector: RepDetector,
    reps: Vec<Rep>,
    observers: Vec<Box<dyn RepObserver>>,
}

impl WorkoutSession {
    pub fn new(detector: RepDetector) -> Self {
        Self { detector, reps: Vec::new(), observers: Vec::new() }
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: RepObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn exercise(&self) -> Exercise {
        self.detector.exercise()
    }

    pub fn detector(&self) -> &RepDetector {
        &self.detector
    }

    /// Mat én frame inn. Ved fullført rep legges den til lista og alle
    /// observatører varsles i registreringsrekkefølge.
    pub fn push_frame(&mut self, frame: AngleFrame) -> Option<&Rep> {
        let rep = self.detector.observe(frame)?;
        let exercise = self.detector.exercise();
        for obs in self.observers.iter_mut() {
            obs.on_rep(exercise, &rep);
        }
        self.reps.push(rep);
        self.reps.last()
    }

    /// Forkast påbegynt rep. Fullførte reps beholdes.
    pub fn cancel_rep(&mut self) {
        self.detector.reset();
    }

    pub fn reps(&self) -> &[Rep] {
        &self.reps
    }

    pub fn analysis(&self) -> FormAnalysis {
        analyze_form(&self.reps)
    }

    pub fn analysis_at(&self, at: DateTime<Utc>) -> FormAnalysis {
        analyze_form_at(&self.reps, at)
    }
}
