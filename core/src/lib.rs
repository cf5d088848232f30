pub mod analyzer;
pub mod detector;
pub mod error;
pub mod exercise;
pub mod geometry;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod session;
pub mod smoothing;
pub mod storage;
pub mod telemetry;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use analyzer::{analyze_form_json, detect_reps_json, DetectionReport};
pub use detector::RepDetector;
pub use error::{Error, Result};
pub use exercise::{Exercise, ExerciseDetectorType, SquatDepth, Thresholds};
pub use geometry::{frame_from_pose, joint_angle};
pub use metrics::{analyze_form, analyze_form_at, calculate_average_time_per_rep, calculate_time_per_rep};
pub use models::{Landmark, Pose};
pub use scoring::{score_rep, FormVerdict};
pub use session::{RepObserver, WorkoutSession};
pub use storage::{load_config, save_config};
pub use types::{
    AngleFrame, DetectorConfig, FormAnalysis, Issue, Joint, Quality, Rep, RepPhase, Severity,
    Tempo, ThresholdOverrides, GOOD_FORM_FEEDBACK,
};
