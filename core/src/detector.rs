use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::exercise::{AlignmentCheck, Exercise, Thresholds};
use crate::scoring::{score_rep, TrackedFrame};
use crate::smoothing::TrailingAverage;
use crate::telemetry::{FRAMES_REJECTED, REPS_ABORTED, REPS_DETECTED};
use crate::types::{AngleFrame, DetectorConfig, Rep, RepPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AbortReason {
    Timeout,
    Partial,
    Reset,
}

impl AbortReason {
    fn as_str(&self) -> &'static str {
        match self {
            AbortReason::Timeout => "timeout",
            AbortReason::Partial => "partial",
            AbortReason::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transition {
    Stay,
    Enter(RepPhase),
    Complete,
    Abort(AbortReason),
}

/// Fasemaskin for én øvelse: idle → eccentric → bottom → concentric → top.
///
/// All timing kommer fra tidsstemplene i framene, aldri fra veggklokka.
/// En instans eies av én konsument og mates i ankomstrekkefølge.
#[derive(Debug, Clone)]
pub struct RepDetector {
    exercise: Exercise,
    thresholds: Thresholds,
    checks: &'static [AlignmentCheck],
    min_confidence: f64,
    smoother: TrailingAverage,

    phase: RepPhase,
    phase_started_ms: u64,
    bottom_started_ms: u64,
    rep_started_ms: u64,
    prev_angle: Option<f64>,
    // vinkelen har vært ≥ eccentric_start siden forrige start/avbrudd
    armed: bool,
    last_timestamp_ms: Option<u64>,

    // teller kun frames med gyldig primærvinkel
    frame_index: u64,
    last_transition_index: u64,
    last_abort_index: Option<u64>,

    trajectory: Vec<TrackedFrame>,
}

impl RepDetector {
    /// Detektor med øvelsens innebygde tabell.
    pub fn new(exercise: Exercise) -> Self {
        let thresholds = exercise.thresholds();
        Self::build(exercise, thresholds, DetectorConfig::DEFAULT_MIN_CONFIDENCE)
    }

    /// Detektor med konfig lagt oppå tabellen. Ugyldig konfig feiler her,
    /// ikke midt i en økt.
    pub fn with_config(exercise: Exercise, cfg: &DetectorConfig) -> Result<Self> {
        let thresholds = exercise.thresholds().with_config(cfg)?;
        let min_confidence = cfg.min_confidence();
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(Error::InvalidConfig(format!(
                "min_confidence must be in [0, 1], got {min_confidence}"
            )));
        }
        Ok(Self::build(exercise, thresholds, min_confidence))
    }

    /// Fabrikk for valg fra UI (øvelse + ev. knebøy-modus).
    pub fn from_selection(exercise: &str, difficulty: Option<&str>, cfg: &DetectorConfig) -> Result<Self> {
        let exercise = Exercise::from_selection(exercise, difficulty)?;
        Self::with_config(exercise, cfg)
    }

    fn build(exercise: Exercise, thresholds: Thresholds, min_confidence: f64) -> Self {
        Self {
            exercise,
            thresholds,
            checks: exercise.alignment_checks(),
            min_confidence,
            smoother: TrailingAverage::new(thresholds.smoothing_window),
            phase: RepPhase::Idle,
            phase_started_ms: 0,
            bottom_started_ms: 0,
            rep_started_ms: 0,
            prev_angle: None,
            armed: false,
            last_timestamp_ms: None,
            frame_index: 0,
            last_transition_index: 0,
            last_abort_index: None,
            trajectory: Vec::new(),
        }
    }

    pub fn exercise(&self) -> Exercise {
        self.exercise
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    /// Konsumer én frame. Returnerer en `Rep` kun på framen som lukker en hel syklus.
    pub fn observe(&mut self, frame: AngleFrame) -> Option<Rep> {
        let ts = frame.timestamp_ms;
        if let Some(last) = self.last_timestamp_ms {
            if ts <= last {
                warn!("{}: hopper over frame med tidsstempel {ts} ms (siste {last} ms)", self.label());
                FRAMES_REJECTED.with_label_values(&[self.label(), "out_of_order"]).inc();
                return None;
            }
        }
        self.last_timestamp_ms = Some(ts);

        // Tracking-dropout: hold fase og siste vinkel
        let Some(raw) = self.thresholds.primary.sample(&frame, self.min_confidence) else {
            debug!("{}: ubestemt vinkel @ {ts} ms, holder fase {}", self.label(), self.phase);
            FRAMES_REJECTED.with_label_values(&[self.label(), "indeterminate"]).inc();
            return None;
        };
        let angle = self.smoother.push(raw);
        self.frame_index += 1;

        if self.phase != RepPhase::Idle
            && ts.saturating_sub(self.phase_started_ms) > self.thresholds.max_phase_ms
        {
            self.abort(AbortReason::Timeout);
        }

        let prev = self.prev_angle.replace(angle);

        loop {
            match self.next_transition(prev, angle) {
                Transition::Stay => break,
                Transition::Enter(next) => self.enter(next, ts),
                Transition::Abort(reason) => {
                    self.abort(reason);
                    break;
                }
                Transition::Complete => return Some(self.complete(frame)),
            }
        }

        if self.phase == RepPhase::Idle {
            // en krysning som faller i debounce-vinduet holdes til vinduet er ute
            self.armed |= angle >= self.thresholds.eccentric_start;
        } else {
            self.trajectory.push(TrackedFrame { phase: self.phase, frame });
        }
        None
    }

    /// Tilbake til idle uten ventende timere. Brukes ved bytte av øvelse.
    pub fn reset(&mut self) {
        self.abort(AbortReason::Reset);
        self.smoother.reset();
        self.phase = RepPhase::Idle;
        self.phase_started_ms = 0;
        self.bottom_started_ms = 0;
        self.rep_started_ms = 0;
        self.prev_angle = None;
        self.armed = false;
        self.last_timestamp_ms = None;
        self.frame_index = 0;
        self.last_transition_index = 0;
        self.last_abort_index = None;
        self.trajectory.clear();
    }

    fn next_transition(&self, prev: Option<f64>, angle: f64) -> Transition {
        let t = &self.thresholds;
        match self.phase {
            RepPhase::Idle => {
                // krysning ovenfra: siste vinkel i idle var ≥ eccentric_start
                if self.armed && angle < t.eccentric_start && !self.recently_aborted() {
                    Transition::Enter(RepPhase::Eccentric)
                } else {
                    Transition::Stay
                }
            }
            RepPhase::Eccentric => {
                if angle < t.bottom {
                    Transition::Enter(RepPhase::Bottom)
                } else if angle >= t.top && !self.within_debounce() {
                    Transition::Abort(AbortReason::Partial)
                } else {
                    Transition::Stay
                }
            }
            RepPhase::Bottom => {
                let ascending = prev.map_or(false, |p| angle > p);
                if ascending && angle > t.concentric_end {
                    Transition::Enter(RepPhase::Concentric)
                } else {
                    Transition::Stay
                }
            }
            RepPhase::Concentric => {
                if angle >= t.top {
                    Transition::Complete
                } else if angle < t.bottom {
                    Transition::Enter(RepPhase::Bottom)
                } else {
                    Transition::Stay
                }
            }
            // top er kun et merke på lukkeframen
            RepPhase::Top => Transition::Stay,
        }
    }

    fn within_debounce(&self) -> bool {
        self.frame_index - self.last_transition_index < self.thresholds.debounce_frames as u64
    }

    fn recently_aborted(&self) -> bool {
        self.last_abort_index
            .map_or(false, |i| self.frame_index - i < self.thresholds.debounce_frames as u64)
    }

    fn enter(&mut self, next: RepPhase, ts: u64) {
        debug!("{}: {} → {} @ {ts} ms", self.label(), self.phase, next);
        if self.phase == RepPhase::Idle {
            self.rep_started_ms = ts;
            self.armed = false;
            self.trajectory.clear();
        }
        match (self.phase, next) {
            // tilbake fra concentric: timeout gjelder hele bunn/concentric-spennet
            (RepPhase::Concentric, RepPhase::Bottom) => self.phase_started_ms = self.bottom_started_ms,
            (_, RepPhase::Bottom) => {
                self.bottom_started_ms = ts;
                self.phase_started_ms = ts;
            }
            _ => self.phase_started_ms = ts,
        }
        self.phase = next;
        self.last_transition_index = self.frame_index;
    }

    fn abort(&mut self, reason: AbortReason) {
        if self.phase == RepPhase::Idle {
            return;
        }
        warn!("{}: avbryter syklus i fase {} ({})", self.label(), self.phase, reason.as_str());
        REPS_ABORTED.with_label_values(&[self.label(), reason.as_str()]).inc();
        self.phase = RepPhase::Idle;
        self.armed = false;
        self.trajectory.clear();
        self.last_abort_index = Some(self.frame_index);
    }

    fn complete(&mut self, frame: AngleFrame) -> Rep {
        let ts = frame.timestamp_ms;
        self.trajectory.push(TrackedFrame { phase: RepPhase::Top, frame });

        // start og slutt kan aldri være samme frame (top > eccentric_start)
        let duration_ms = ts - self.rep_started_ms;
        let verdict = score_rep(
            &self.trajectory,
            self.checks,
            duration_ms,
            self.thresholds.min_rep_ms,
            self.min_confidence,
        );

        info!(
            "{}: rep fullført på {duration_ms} ms, score {} ({:?})",
            self.label(),
            verdict.form_score,
            verdict.quality
        );
        REPS_DETECTED.with_label_values(&[self.label()]).inc();

        self.trajectory.clear();
        self.phase = RepPhase::Idle;
        // lukkevinkelen er ≥ top > eccentric_start
        self.armed = true;
        self.phase_started_ms = ts;
        self.last_transition_index = self.frame_index;

        Rep {
            duration_ms,
            form_score: verdict.form_score,
            quality: verdict.quality,
            feedback: verdict.feedback,
            completed_at_ms: ts,
        }
    }

    fn label(&self) -> &'static str {
        self.exercise.detector_type().as_str()
    }
}
