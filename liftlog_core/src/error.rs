//! Error types for the liftlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record store error
    #[error("Store error: {0}")]
    Store(String),
}

/// A workout submission that failed admission.
///
/// The `Display` text of each variant is the exact message returned to
/// clients.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No body, or a body that does not decode as a workout
    #[error("Body missing")]
    BodyMissing,

    #[error("date is required")]
    DateRequired,

    #[error("exercise is required")]
    ExerciseRequired,

    #[error("provide sets or duration")]
    NoSetsOrDuration,

    #[error("reps must be > 0")]
    NonPositiveReps,

    #[error("weight must be >= 0")]
    NegativeWeight,
}
