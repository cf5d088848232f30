use thiserror::Error;

use crate::exercise::ExerciseDetectorType;

/// Feil fra kjernen. Kun konfigurasjon og I/O kan feile; selve
/// frame-strømmen tolereres alltid (se `RepDetector::observe`).
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown exercise type: {0:?}")]
    UnknownExercise(String),

    #[error("unknown difficulty mode: {0:?}")]
    UnknownDifficulty(String),

    #[error("difficulty mode is not supported for exercise {0}")]
    DifficultyNotApplicable(ExerciseDetectorType),

    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json error at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = e.path().to_string();
        Error::Json { path, source: e.into_inner() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
