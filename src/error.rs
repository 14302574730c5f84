use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Metric tables held by a precomputed spatial metrics cache
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricKind {
    MeasurementDistance,
    LinearDistance,
    RouteLength,
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            MetricKind::MeasurementDistance => write!(f, "measurement distance"),
            MetricKind::LinearDistance => write!(f, "linear distance"),
            MetricKind::RouteLength => write!(f, "route length"),
        }
    }
}

/// Map matching error types
///
/// Every variant is fatal for the current matching run. Expected data states
/// such as an unreachable route or a broken sequence are not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchingError {
    #[error("Road position fraction must lie in [0, 1], got {0}")]
    InvalidFraction(f64),

    #[error("Non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("Invalid model parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Candidate {0} is declared more than once")]
    DuplicateCandidate(String),

    #[error("Time difference between subsequent measurements must be > 0 s, got {0} s")]
    NonIncreasingTime(f64),

    #[error("Duplicate {kind} for key {key}")]
    DuplicateKey { kind: MetricKind, key: String },

    #[error("No {kind} stored for key {key}")]
    MissingKey { kind: MetricKind, key: String },

    #[error("Invalid {kind}: {value}")]
    InvalidDistance { kind: MetricKind, value: f64 },

    #[error("Adding a {0} is not supported, it is computed on demand")]
    NotApplicable(MetricKind),

    #[error("Unknown candidate: {0}")]
    UnknownCandidate(String),

    #[error("Duplicate {kind} log probability for {key}")]
    DuplicateProbability { kind: &'static str, key: String },

    #[error("Time step {0} already holds log probabilities")]
    AlreadyScored(usize),
}

/// Result type for map matching operations
pub type MatchingResult<T> = Result<T, MatchingError>;
