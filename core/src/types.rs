use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feedback når en rep ikke har noen anmerkninger.
pub const GOOD_FORM_FEEDBACK: &str = "Good form!";

/// Navngitte vinkler en `AngleFrame` kan bære.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Joint {
    LeftElbow,     // skulder-albue-håndledd
    RightElbow,
    LeftShoulder,  // hofte-skulder-albue
    RightShoulder,
    LeftHip,       // skulder-hofte-kne
    RightHip,
    LeftKnee,      // hofte-kne-ankel
    RightKnee,
    LeftBodyLine,  // skulder-hofte-ankel
    RightBodyLine,
}

impl Joint {
    pub const ALL: [Joint; 10] = [
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftBodyLine,
        Joint::RightBodyLine,
    ];
}

/// Ett tidsstemplet sett med leddvinkler (grader).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleFrame {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub angles: BTreeMap<Joint, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<BTreeMap<Joint, f64>>,
}

impl AngleFrame {
    pub fn new(timestamp_ms: u64) -> Self {
        Self { timestamp_ms, angles: BTreeMap::new(), confidence: None }
    }

    pub fn with_angle(mut self, joint: Joint, degrees: f64) -> Self {
        self.angles.insert(joint, degrees);
        self
    }

    pub fn with_confidence(mut self, joint: Joint, confidence: f64) -> Self {
        self.confidence.get_or_insert_with(BTreeMap::new).insert(joint, confidence);
        self
    }

    /// Vinkel for leddet hvis den er brukbar: finnes, er endelig og har
    /// confidence >= `min_confidence` (mangler confidence regnes som sikker).
    pub fn angle(&self, joint: Joint, min_confidence: f64) -> Option<f64> {
        let a = *self.angles.get(&joint)?;
        if !a.is_finite() {
            return None;
        }
        let conf = self
            .confidence
            .as_ref()
            .and_then(|c| c.get(&joint).copied())
            .unwrap_or(1.0);
        if conf < min_confidence { None } else { Some(a) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepPhase {
    Idle,
    Eccentric,
    Bottom,
    Concentric,
    Top,
}

impl fmt::Display for RepPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepPhase::Idle => "idle",
            RepPhase::Eccentric => "eccentric",
            RepPhase::Bottom => "bottom",
            RepPhase::Concentric => "concentric",
            RepPhase::Top => "top",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quality {
    Good,
    Warning,
    Bad,
}

/// En fullført repetisjon. Opprettes én gang og endres aldri.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rep {
    pub duration_ms: u64,
    pub form_score: u8,       // 0–100
    pub quality: Quality,
    pub feedback: Vec<String>,
    #[serde(default)]
    pub completed_at_ms: u64, // tidsstempel på frame som lukket repen
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tempo {
    TooFast,
    Good,
    TooSlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Sammendrag for en hel økt. Beregnes på nytt ved hver forespørsel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAnalysis {
    pub overall_score: u8,
    pub consistency: u8,
    pub range_of_motion: u8,
    pub tempo: Tempo,
    pub issues: Vec<Issue>,
}

impl Default for FormAnalysis {
    fn default() -> Self {
        Self {
            overall_score: 0,
            consistency: 0,
            range_of_motion: 0,
            tempo: Tempo::Good,
            issues: Vec::new(),
        }
    }
}

/// Overstyring av terskeltabellen. Felt som mangler beholder tabellverdien.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ThresholdOverrides {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub eccentric_start: Option<f64>,
    pub concentric_end: Option<f64>,
}

/// Detektor-konfig. Leses fra JSON (se `storage`) og låses ved konstruksjon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DetectorConfig {
    pub min_confidence: Option<f64>,
    pub smoothing_window: Option<usize>,
    pub max_phase_ms: Option<u64>,
    pub debounce_frames: Option<usize>,
    pub thresholds: Option<ThresholdOverrides>,
}

impl DetectorConfig {
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence.unwrap_or(Self::DEFAULT_MIN_CONFIDENCE)
    }
}
