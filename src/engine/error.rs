use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("unknown event type: {0} (expected run, trail_run, road_cycle, gravel or mtb)")]
    UnknownEventType(String),

    #[error("unknown scoring version: {0} (expected v1 or v2)")]
    UnknownScoringVersion(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },

    #[error("{field} is empty")]
    Blank { field: &'static str },

    #[error("{field}: '{text}' is not a number")]
    NotANumber { field: &'static str, text: String },
}
