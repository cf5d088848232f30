use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{AngleFrame, DetectorConfig, Joint};

/// Øvelsene kjernen kan telle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseDetectorType {
    Pushup,
    BicepCurl,
    AlternatingBicepCurl,
    Squat,
}

impl ExerciseDetectorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseDetectorType::Pushup => "pushup",
            ExerciseDetectorType::BicepCurl => "bicep-curl",
            ExerciseDetectorType::AlternatingBicepCurl => "alternating-bicep-curl",
            ExerciseDetectorType::Squat => "squat",
        }
    }
}

impl fmt::Display for ExerciseDetectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseDetectorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pushup" => Ok(ExerciseDetectorType::Pushup),
            "bicep-curl" => Ok(ExerciseDetectorType::BicepCurl),
            "alternating-bicep-curl" => Ok(ExerciseDetectorType::AlternatingBicepCurl),
            "squat" => Ok(ExerciseDetectorType::Squat),
            other => Err(Error::UnknownExercise(other.to_string())),
        }
    }
}

/// Dybdemål for knebøy. Velges før økta starter og endres ikke underveis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SquatDepth {
    Easy,
    #[default]
    NinetyDegree,
    Atg,
}

pub const SQUAT_BOTTOM_EASY: f64 = 120.0;
pub const SQUAT_BOTTOM_NINETY_DEGREE: f64 = 95.0;
pub const SQUAT_BOTTOM_ATG: f64 = 70.0;

impl SquatDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SquatDepth::Easy => "easy",
            SquatDepth::NinetyDegree => "ninety-degree",
            SquatDepth::Atg => "atg",
        }
    }

    /// Knevinkel som må passeres for at bunnen regnes som nådd.
    pub fn bottom_angle(&self) -> f64 {
        match self {
            SquatDepth::Easy => SQUAT_BOTTOM_EASY,
            SquatDepth::NinetyDegree => SQUAT_BOTTOM_NINETY_DEGREE,
            SquatDepth::Atg => SQUAT_BOTTOM_ATG,
        }
    }
}

impl fmt::Display for SquatDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SquatDepth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "easy" => Ok(SquatDepth::Easy),
            "ninety-degree" => Ok(SquatDepth::NinetyDegree),
            "atg" => Ok(SquatDepth::Atg),
            other => Err(Error::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Hvordan primærvinkelen hentes ut av en frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimaryAngle {
    /// Snitt av tilgjengelige ledd (begge sider jobber samtidig).
    Mean(&'static [Joint]),
    /// Minste vinkel, altså den siden som jobber (vekselvis curl).
    Min(&'static [Joint]),
}

impl PrimaryAngle {
    pub fn sample(&self, frame: &AngleFrame, min_confidence: f64) -> Option<f64> {
        match self {
            PrimaryAngle::Mean(joints) => mean_of(frame, joints, min_confidence),
            PrimaryAngle::Min(joints) => joints
                .iter()
                .filter_map(|j| frame.angle(*j, min_confidence))
                .reduce(f64::min),
        }
    }
}

/// Avledet form-mål. Høyere verdi = bedre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignmentMetric {
    /// Snittvinkel; 180° = helt rett.
    Straightness(&'static [Joint]),
    /// 180° minus største vinkel; små vinkler (ledd holdt inntil) gir høy verdi.
    Pinned(&'static [Joint]),
    /// 180° minus forskjellen mellom venstre og høyre.
    Symmetry(Joint, Joint),
}

impl AlignmentMetric {
    pub fn sample(&self, frame: &AngleFrame, min_confidence: f64) -> Option<f64> {
        match self {
            AlignmentMetric::Straightness(joints) => mean_of(frame, joints, min_confidence),
            AlignmentMetric::Pinned(joints) => joints
                .iter()
                .filter_map(|j| frame.angle(*j, min_confidence))
                .reduce(f64::max)
                .map(|worst| 180.0 - worst),
            AlignmentMetric::Symmetry(left, right) => {
                let l = frame.angle(*left, min_confidence)?;
                let r = frame.angle(*right, min_confidence)?;
                Some(180.0 - (l - r).abs())
            }
        }
    }
}

/// Hvilke frames i repen et form-mål vurderes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckWindow {
    WholeRep,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentCheck {
    pub metric: AlignmentMetric,
    pub window: CheckWindow,
    pub warning: f64,
    pub floor: f64,
    pub message: &'static str,
}

/// Terskeltabell for fasemaskinen. Alle øvelser er "synkende" på primærvinkelen:
/// top > concentric_end > bottom og top > eccentric_start > bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub top: f64,
    pub concentric_end: f64,
    pub eccentric_start: f64,
    pub bottom: f64,
    pub primary: PrimaryAngle,
    pub min_rep_ms: u64,
    pub smoothing_window: usize,
    pub max_phase_ms: u64,
    pub debounce_frames: usize,
}

const ELBOWS: &[Joint] = &[Joint::LeftElbow, Joint::RightElbow];
const KNEES: &[Joint] = &[Joint::LeftKnee, Joint::RightKnee];
const SHOULDERS: &[Joint] = &[Joint::LeftShoulder, Joint::RightShoulder];
const HIPS: &[Joint] = &[Joint::LeftHip, Joint::RightHip];
const BODY_LINES: &[Joint] = &[Joint::LeftBodyLine, Joint::RightBodyLine];

pub const DEFAULT_MAX_PHASE_MS: u64 = 8_000;
pub const DEFAULT_DEBOUNCE_FRAMES: usize = 2;

pub const PUSHUP_THRESHOLDS: Thresholds = Thresholds {
    top: 160.0,
    concentric_end: 140.0,
    eccentric_start: 120.0,
    bottom: 90.0,
    primary: PrimaryAngle::Mean(ELBOWS),
    min_rep_ms: 600,
    smoothing_window: 1,
    max_phase_ms: DEFAULT_MAX_PHASE_MS,
    debounce_frames: DEFAULT_DEBOUNCE_FRAMES,
};

pub const BICEP_CURL_THRESHOLDS: Thresholds = Thresholds {
    top: 145.0,
    concentric_end: 100.0,
    eccentric_start: 125.0,
    bottom: 60.0,
    primary: PrimaryAngle::Mean(ELBOWS),
    min_rep_ms: 700,
    smoothing_window: 1,
    max_phase_ms: DEFAULT_MAX_PHASE_MS,
    debounce_frames: DEFAULT_DEBOUNCE_FRAMES,
};

pub const ALTERNATING_BICEP_CURL_THRESHOLDS: Thresholds = Thresholds {
    primary: PrimaryAngle::Min(ELBOWS),
    ..BICEP_CURL_THRESHOLDS
};

// bottom byttes ut etter valgt SquatDepth
pub const SQUAT_THRESHOLDS: Thresholds = Thresholds {
    top: 165.0,
    concentric_end: 140.0,
    eccentric_start: 150.0,
    bottom: SQUAT_BOTTOM_NINETY_DEGREE,
    primary: PrimaryAngle::Mean(KNEES),
    min_rep_ms: 800,
    smoothing_window: 1,
    max_phase_ms: DEFAULT_MAX_PHASE_MS,
    debounce_frames: DEFAULT_DEBOUNCE_FRAMES,
};

pub const PUSHUP_ALIGNMENT: &[AlignmentCheck] = &[
    AlignmentCheck {
        metric: AlignmentMetric::Straightness(BODY_LINES),
        window: CheckWindow::WholeRep,
        warning: 160.0, // BODY_ALIGNMENT_WARNING
        floor: 145.0,
        message: "Body not aligned",
    },
    AlignmentCheck {
        metric: AlignmentMetric::Pinned(SHOULDERS),
        window: CheckWindow::Bottom,
        warning: 105.0,
        floor: 90.0,
        message: "Elbow flare",
    },
];

pub const BICEP_CURL_ALIGNMENT: &[AlignmentCheck] = &[
    AlignmentCheck {
        metric: AlignmentMetric::Pinned(SHOULDERS),
        window: CheckWindow::WholeRep,
        warning: 150.0,
        floor: 135.0,
        message: "Keep elbows pinned to your sides",
    },
    AlignmentCheck {
        metric: AlignmentMetric::Straightness(HIPS),
        window: CheckWindow::WholeRep,
        warning: 165.0,
        floor: 155.0,
        message: "Avoid swinging your body",
    },
];

pub const SQUAT_ALIGNMENT: &[AlignmentCheck] = &[
    AlignmentCheck {
        metric: AlignmentMetric::Symmetry(Joint::LeftKnee, Joint::RightKnee),
        window: CheckWindow::WholeRep,
        warning: 165.0,
        floor: 150.0,
        message: "Uneven depth between legs",
    },
    AlignmentCheck {
        metric: AlignmentMetric::Straightness(HIPS),
        window: CheckWindow::Bottom,
        warning: 40.0,
        floor: 25.0,
        message: "Keep your chest up",
    },
];

/// Lukket sett av øvelser, hver med sine egne tabeller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exercise {
    Pushup,
    BicepCurl,
    AlternatingBicepCurl,
    Squat { depth: SquatDepth },
}

impl Exercise {
    /// Bygg fra valg i UI. Ukjent øvelse/modus feiler; manglende
    /// knebøy-modus betyr `ninety-degree`.
    pub fn from_selection(exercise: &str, difficulty: Option<&str>) -> Result<Self> {
        let kind: ExerciseDetectorType = exercise.parse()?;
        Self::from_type(kind, difficulty.map(str::parse::<SquatDepth>).transpose()?)
    }

    pub fn from_type(kind: ExerciseDetectorType, depth: Option<SquatDepth>) -> Result<Self> {
        match (kind, depth) {
            (ExerciseDetectorType::Squat, d) => Ok(Exercise::Squat { depth: d.unwrap_or_default() }),
            (other, Some(_)) => Err(Error::DifficultyNotApplicable(other)),
            (ExerciseDetectorType::Pushup, None) => Ok(Exercise::Pushup),
            (ExerciseDetectorType::BicepCurl, None) => Ok(Exercise::BicepCurl),
            (ExerciseDetectorType::AlternatingBicepCurl, None) => Ok(Exercise::AlternatingBicepCurl),
        }
    }

    pub fn detector_type(&self) -> ExerciseDetectorType {
        match self {
            Exercise::Pushup => ExerciseDetectorType::Pushup,
            Exercise::BicepCurl => ExerciseDetectorType::BicepCurl,
            Exercise::AlternatingBicepCurl => ExerciseDetectorType::AlternatingBicepCurl,
            Exercise::Squat { .. } => ExerciseDetectorType::Squat,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        match self {
            Exercise::Pushup => PUSHUP_THRESHOLDS,
            Exercise::BicepCurl => BICEP_CURL_THRESHOLDS,
            Exercise::AlternatingBicepCurl => ALTERNATING_BICEP_CURL_THRESHOLDS,
            Exercise::Squat { depth } => Thresholds { bottom: depth.bottom_angle(), ..SQUAT_THRESHOLDS },
        }
    }

    pub fn alignment_checks(&self) -> &'static [AlignmentCheck] {
        match self {
            Exercise::Pushup => PUSHUP_ALIGNMENT,
            Exercise::BicepCurl | Exercise::AlternatingBicepCurl => BICEP_CURL_ALIGNMENT,
            Exercise::Squat { .. } => SQUAT_ALIGNMENT,
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exercise::Squat { depth } => write!(f, "squat ({depth})"),
            other => f.write_str(other.detector_type().as_str()),
        }
    }
}

impl Thresholds {
    /// Legg konfig oppå tabellen og valider resultatet.
    pub fn with_config(self, cfg: &DetectorConfig) -> Result<Self> {
        let mut t = self;
        if let Some(o) = &cfg.thresholds {
            t.top = o.top.unwrap_or(t.top);
            t.bottom = o.bottom.unwrap_or(t.bottom);
            t.eccentric_start = o.eccentric_start.unwrap_or(t.eccentric_start);
            t.concentric_end = o.concentric_end.unwrap_or(t.concentric_end);
        }
        if let Some(w) = cfg.smoothing_window {
            if w == 0 {
                return Err(Error::InvalidConfig("smoothing_window must be >= 1".into()));
            }
            t.smoothing_window = w;
        }
        if let Some(ms) = cfg.max_phase_ms {
            if ms == 0 {
                return Err(Error::InvalidConfig("max_phase_ms must be > 0".into()));
            }
            t.max_phase_ms = ms;
        }
        if let Some(d) = cfg.debounce_frames {
            t.debounce_frames = d;
        }
        t.validate()?;
        Ok(t)
    }

    pub fn validate(&self) -> Result<()> {
        let all = [self.top, self.concentric_end, self.eccentric_start, self.bottom];
        if all.iter().any(|a| !a.is_finite() || *a <= 0.0 || *a > 180.0) {
            return Err(Error::InvalidThresholds(format!(
                "all angles must be in (0, 180], got {all:?}"
            )));
        }
        if !(self.top > self.concentric_end && self.concentric_end > self.bottom) {
            return Err(Error::InvalidThresholds(format!(
                "expected top > concentric_end > bottom, got {} / {} / {}",
                self.top, self.concentric_end, self.bottom
            )));
        }
        if !(self.top > self.eccentric_start && self.eccentric_start > self.bottom) {
            return Err(Error::InvalidThresholds(format!(
                "expected top > eccentric_start > bottom, got {} / {} / {}",
                self.top, self.eccentric_start, self.bottom
            )));
        }
        Ok(())
    }
}

fn mean_of(frame: &AngleFrame, joints: &[Joint], min_confidence: f64) -> Option<f64> {
    let mut sum = 0.0;
    let mut cnt = 0usize;
    for j in joints {
        if let Some(a) = frame.angle(*j, min_confidence) {
            sum += a;
            cnt += 1;
        }
    }
    if cnt == 0 { None } else { Some(sum / cnt as f64) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_valid() {
        for ex in [
            Exercise::Pushup,
            Exercise::BicepCurl,
            Exercise::AlternatingBicepCurl,
            Exercise::Squat { depth: SquatDepth::Easy },
            Exercise::Squat { depth: SquatDepth::NinetyDegree },
            Exercise::Squat { depth: SquatDepth::Atg },
        ] {
            assert!(ex.thresholds().validate().is_ok(), "{ex}");
        }
    }

    #[test]
    fn min_primary_picks_working_arm() {
        let f = AngleFrame::new(0)
            .with_angle(Joint::LeftElbow, 70.0)
            .with_angle(Joint::RightElbow, 165.0);
        assert_eq!(PrimaryAngle::Min(ELBOWS).sample(&f, 0.5), Some(70.0));
        assert_eq!(PrimaryAngle::Mean(ELBOWS).sample(&f, 0.5), Some(117.5));
    }
}
