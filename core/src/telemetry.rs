use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Kjernens egen registry; vertsappen kan hente ut teksten via `gather_text`.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn counter_vec(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let c = IntCounterVec::new(Opts::new(name, help), labels).expect("valid metric opts");
    REGISTRY
        .register(Box::new(c.clone()))
        .expect("metric registered once");
    c
}

pub static REPS_DETECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    counter_vec(
        "reptrack_reps_detected_total",
        "Completed repetitions emitted by rep detectors",
        &["exercise"],
    )
});

pub static REPS_ABORTED: Lazy<IntCounterVec> = Lazy::new(|| {
    counter_vec(
        "reptrack_reps_aborted_total",
        "Phase cycles abandoned without emitting a repetition",
        &["exercise", "reason"],
    )
});

pub static FRAMES_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    counter_vec(
        "reptrack_frames_rejected_total",
        "Angle frames skipped by rep detectors",
        &["exercise", "reason"],
    )
});

pub fn reps_detected(exercise: &str) -> u64 {
    REPS_DETECTED.with_label_values(&[exercise]).get()
}

pub fn reps_aborted(exercise: &str, reason: &str) -> u64 {
    REPS_ABORTED.with_label_values(&[exercise, reason]).get()
}

pub fn frames_rejected(exercise: &str, reason: &str) -> u64 {
    FRAMES_REJECTED.with_label_values(&[exercise, reason]).get()
}

/// Registry i Prometheus tekstformat.
pub fn gather_text() -> String {
    // tving registrering slik at tellerne finnes selv før første hendelse
    Lazy::force(&REPS_DETECTED);
    Lazy::force(&REPS_ABORTED);
    Lazy::force(&FRAMES_REJECTED);

    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buf) {
        log::warn!("klarte ikke å kode metrikker: {e}");
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
