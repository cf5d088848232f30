use chrono::{DateTime, Utc};

use crate::types::{FormAnalysis, Issue, Quality, Rep, Severity, Tempo, GOOD_FORM_FEEDBACK};

/// Snittvarighet under dette regnes som for raskt (ms).
pub const TEMPO_TOO_FAST_MS: f64 = 1_000.0;
/// Snittvarighet over dette regnes som for tregt (ms).
pub const TEMPO_TOO_SLOW_MS: f64 = 5_000.0;
/// En feedback må forekomme i minst så mange reps for å bli et issue.
pub const MIN_ISSUE_OCCURRENCES: usize = 2;

/// Øktanalyse med veggklokka som tidsstempel på issues.
pub fn analyze_form(reps: &[Rep]) -> FormAnalysis {
    analyze_form_at(reps, Utc::now())
}

/// Øktanalyse med gitt analysetidspunkt. Ren funksjon: samme input gir
/// identisk output.
pub fn analyze_form_at(reps: &[Rep], at: DateTime<Utc>) -> FormAnalysis {
    if reps.is_empty() {
        return FormAnalysis::default();
    }

    FormAnalysis {
        overall_score: overall_score(reps),
        consistency: consistency(reps),
        range_of_motion: range_of_motion(reps),
        tempo: tempo(reps),
        issues: aggregate_issues(reps, at),
    }
}

/// Avrundet snitt av form-score. 0 for tom liste.
pub fn overall_score(reps: &[Rep]) -> u8 {
    if reps.is_empty() {
        return 0;
    }
    let sum: f64 = reps.iter().map(|r| r.form_score as f64).sum();
    to_pct(sum / reps.len() as f64)
}

/// 100 − variasjonskoeffisient (%) av varighetene, klemt til [0, 100].
/// Færre enn to reps gir 100 (ingen variasjon å straffe).
/// Tom økt rapporteres som 0 av `analyze_form_at`; gå via den for hele økter.
pub fn consistency(reps: &[Rep]) -> u8 {
    if reps.len() < 2 {
        return 100;
    }
    let durations: Vec<f64> = reps.iter().map(|r| r.duration_ms as f64).collect();
    let n = durations.len() as f64;
    let mean = durations.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 100;
    }
    let var = durations.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
    let cv = var.sqrt() / mean * 100.0;
    to_pct(100.0 - cv)
}

/// Andel reps med kvalitet `good`, i prosent.
pub fn range_of_motion(reps: &[Rep]) -> u8 {
    if reps.is_empty() {
        return 0;
    }
    let good = reps.iter().filter(|r| r.quality == Quality::Good).count();
    to_pct(good as f64 / reps.len() as f64 * 100.0)
}

pub fn tempo(reps: &[Rep]) -> Tempo {
    if reps.is_empty() {
        return Tempo::Good;
    }
    let avg = reps.iter().map(|r| r.duration_ms as f64).sum::<f64>() / reps.len() as f64;
    if avg < TEMPO_TOO_FAST_MS {
        Tempo::TooFast
    } else if avg > TEMPO_TOO_SLOW_MS {
        Tempo::TooSlow
    } else {
        Tempo::Good
    }
}

/// Gjentakende feedback (≥ 2 reps) som issues, i rekkefølgen de først dukket opp.
/// `error` når forekomsten er over halvparten av repene, ellers `warning`.
pub fn aggregate_issues(reps: &[Rep], at: DateTime<Utc>) -> Vec<Issue> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for rep in reps {
        let mut seen: Vec<&str> = Vec::new();
        for msg in &rep.feedback {
            let msg = msg.as_str();
            if msg == GOOD_FORM_FEEDBACK || seen.contains(&msg) {
                continue;
            }
            seen.push(msg);
            match tally.iter_mut().find(|(m, _)| *m == msg) {
                Some((_, count)) => *count += 1,
                None => tally.push((msg, 1)),
            }
        }
    }

    let total = reps.len();
    tally
        .into_iter()
        .filter(|(_, count)| *count >= MIN_ISSUE_OCCURRENCES)
        .map(|(msg, count)| Issue {
            severity: if count * 2 > total { Severity::Error } else { Severity::Warning },
            message: format!("{msg} ({count}/{total} reps)"),
            timestamp: at,
        })
        .collect()
}

/// Varighet per rep i sekunder.
pub fn calculate_time_per_rep(reps: &[Rep]) -> Vec<f64> {
    reps.iter().map(|r| r.duration_ms as f64 / 1000.0).collect()
}

/// Snittvarighet i sekunder; 0 for tom liste.
pub fn calculate_average_time_per_rep(reps: &[Rep]) -> f64 {
    if reps.is_empty() {
        return 0.0;
    }
    calculate_time_per_rep(reps).iter().sum::<f64>() / reps.len() as f64
}

fn to_pct(x: f64) -> u8 {
    if x.is_finite() { x.round().clamp(0.0, 100.0) as u8 } else { 0 }
}
