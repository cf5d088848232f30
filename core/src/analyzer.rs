use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::detector::RepDetector;
use crate::metrics::analyze_form;
use crate::types::{AngleFrame, DetectorConfig, FormAnalysis, Rep};

/// Resultat fra `detect_reps_json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub exercise: String,
    pub frames: usize,
    pub reps: Vec<Rep>,
    pub analysis: FormAnalysis,
}

fn parse<'de, T: Deserialize<'de>>(json: &'de str) -> std::result::Result<T, crate::Error> {
    let de = &mut serde_json::Deserializer::from_str(json);
    Ok(serde_path_to_error::deserialize(de)?)
}

/// Kjør en hel frame-sekvens (JSON-liste av `AngleFrame`) gjennom en ny
/// detektor og returner reps + øktanalyse som JSON.
pub fn detect_reps_json(
    exercise: &str,
    difficulty: Option<&str>,
    frames_json: &str,
    cfg_json: Option<&str>,
) -> Result<String> {
    let cfg: DetectorConfig = match cfg_json {
        Some(s) => parse(s).context("cfg_json")?,
        None => DetectorConfig::default(),
    };
    let frames: Vec<AngleFrame> = parse(frames_json).context("frames_json")?;
    let mut detector = RepDetector::from_selection(exercise, difficulty, &cfg)
        .with_context(|| format!("detector for {exercise:?}"))?;

    let n = frames.len();
    let reps: Vec<Rep> = frames.into_iter().filter_map(|f| detector.observe(f)).collect();
    let report = DetectionReport {
        exercise: detector.exercise().to_string(),
        frames: n,
        analysis: analyze_form(&reps),
        reps,
    };
    Ok(serde_json::to_string(&report)?)
}

/// Øktanalyse for en JSON-liste av `Rep`.
pub fn analyze_form_json(reps_json: &str) -> Result<String> {
    let reps: Vec<Rep> = parse(reps_json).context("reps_json")?;
    Ok(serde_json::to_string(&analyze_form(&reps))?)
}
