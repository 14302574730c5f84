//! Offline map matching with a hidden Markov model
//!
//! Scores candidate road positions for a trace of noisy location measurements
//! following Newson & Krumm (2009): Gaussian emission densities over the
//! distance to the measurement, exponential transition densities over the
//! difference between route length and linear distance. The scores are fed to
//! a caller-supplied sequence decoder (e.g. Viterbi) through
//! [`map_match::SequenceDecoder`].
//!
//! Routing and candidate search are not part of this crate. Their results
//! enter through [`map_match::SpatialMetrics`], typically as a
//! [`map_match::PrecomputedSpatialMetrics`] filled before matching starts.

pub mod error;
pub mod map_match;
pub mod types;

pub use error::{MatchingError, MatchingResult, MetricKind};
