pub mod distributions;
pub mod euclidean;
pub mod hmm;
pub mod matcher;
pub mod metrics;
pub mod precomputed;
pub mod probabilities;

pub use euclidean::EuclideanSpatialMetrics;
pub use hmm::{MostLikelySequence, SequenceDecoder, TimeStep};
pub use matcher::OfflineMapMatcher;
pub use metrics::{DefaultTemporalMetrics, SpatialMetrics, TemporalMetrics};
pub use precomputed::PrecomputedSpatialMetrics;
pub use probabilities::{DefaultHmmProbabilities, HmmParameters, MapMatchingHmmProbabilities, BETA, SIGMA};
