use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::distributions::{log_exponential_distribution, log_normal_distribution};
use super::{DefaultTemporalMetrics, SpatialMetrics, TemporalMetrics, TimeStep};
use crate::error::{MatchingError, MatchingResult};
use crate::types::{GpsMeasurement, Identified, RoadPosition, RouteLength};

/// Standard deviation [m] of the GPS error, from Newson & Krumm
pub const SIGMA: f64 = 4.07;

/// Rate of the exponential transition distribution
///
/// Computed from the Microsoft ground truth data for shortest route lengths at
/// a 60 s sampling interval. Transition metrics are normalized by the squared
/// time difference, which keeps this value valid for other intervals.
pub const BETA: f64 = 0.00959442;

/// Parameters of the map matching HMM
///
/// Missing fields deserialize to the published defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HmmParameters {
    /// Emission standard deviation [m]
    pub sigma: f64,
    /// Transition rate [s²/m]
    pub beta: f64,
}

impl Default for HmmParameters {
    fn default() -> Self {
        HmmParameters { sigma: SIGMA, beta: BETA }
    }
}

impl HmmParameters {
    /// Both parameters must be finite and strictly positive
    pub fn validate(&self) -> MatchingResult<()> {
        for (name, value) in [("sigma", self.sigma), ("beta", self.beta)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MatchingError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Log emission density for a road position `measurement_distance` meters
    /// away from its measurement
    pub fn emission_log_probability(&self, measurement_distance: f64) -> f64 {
        log_normal_distribution(self.sigma, measurement_distance)
    }

    /// |linear_distance - route_length| / time_difference² in [m/s²]
    ///
    /// In contrast to Newson & Krumm the distance difference is divided by
    /// the squared time difference, which decouples beta from the sampling
    /// interval.
    ///
    /// # Returns
    /// None if the target cannot be reached from the source
    ///
    /// # Errors
    /// `NonIncreasingTime` unless `time_difference` > 0
    pub fn normalized_transition_metric(
        route_length: RouteLength,
        linear_distance: f64,
        time_difference: f64,
    ) -> MatchingResult<Option<f64>> {
        // Written so that NaN is rejected too
        if !(time_difference > 0.0) {
            return Err(MatchingError::NonIncreasingTime(time_difference));
        }

        Ok(route_length
            .meters()
            .map(|route| (linear_distance - route).abs() / (time_difference * time_difference)))
    }

    /// Log transition density, -inf if the target is unreachable
    pub fn transition_log_probability(
        &self,
        route_length: RouteLength,
        linear_distance: f64,
        time_difference: f64,
    ) -> MatchingResult<f64> {
        let metric = Self::normalized_transition_metric(route_length, linear_distance, time_difference)?;
        Ok(self.transition_log_probability_from_metric(metric))
    }

    fn transition_log_probability_from_metric(&self, metric: Option<f64>) -> f64 {
        match metric {
            Some(metric) => log_exponential_distribution(self.beta, metric),
            None => f64::NEG_INFINITY,
        }
    }
}

/// HMM probabilities for map matching, based on Newson, Paul, and John Krumm.
/// "Hidden Markov map matching through noise and sparseness." ACM SIGSPATIAL 2009.
///
/// # Type parameters
/// - `S`: road position (HMM state)
/// - `O`: location measurement (HMM observation)
/// - `SM`, `TM`: spatial and temporal metric providers
///
/// Transition scoring needs the measurement behind each road position. The
/// model indexes every candidate of the given time steps by id when it is
/// built, so candidate ids must be unique across the whole run.
pub struct MapMatchingHmmProbabilities<'a, S: Identified, O, SM, TM> {
    parameters: HmmParameters,
    observations: Vec<O>,
    observation_index: HashMap<S::Id, usize>,
    spatial_metrics: &'a SM,
    temporal_metrics: &'a TM,
}

/// Probabilities over the crate's own measurement and road position types
pub type DefaultHmmProbabilities<'a, SM> =
    MapMatchingHmmProbabilities<'a, RoadPosition, GpsMeasurement, SM, DefaultTemporalMetrics>;

impl<'a, S, O, SM, TM> MapMatchingHmmProbabilities<'a, S, O, SM, TM>
where
    S: Identified,
    O: Clone,
    SM: SpatialMetrics<S, O>,
    TM: TemporalMetrics<O>,
{
    /// Build the model for one matching run
    ///
    /// # Errors
    /// - `InvalidParameter` for non-positive sigma or beta
    /// - `DuplicateCandidate` if a candidate id occurs in more than one step
    pub fn new(
        parameters: HmmParameters,
        time_steps: &[TimeStep<S, O>],
        spatial_metrics: &'a SM,
        temporal_metrics: &'a TM,
    ) -> MatchingResult<Self> {
        parameters.validate()?;

        let mut observations = Vec::with_capacity(time_steps.len());
        let mut observation_index = HashMap::new();
        for (index, time_step) in time_steps.iter().enumerate() {
            observations.push(time_step.observation().clone());
            for candidate in time_step.candidates() {
                if observation_index.insert(candidate.id(), index).is_some() {
                    return Err(MatchingError::DuplicateCandidate(format!("{:?}", candidate.id())));
                }
            }
        }

        Ok(MapMatchingHmmProbabilities {
            parameters,
            observations,
            observation_index,
            spatial_metrics,
            temporal_metrics,
        })
    }

    pub fn parameters(&self) -> &HmmParameters {
        &self.parameters
    }

    /// Log emission density of `road_position` given `measurement`
    pub fn emission_log_probability(&self, road_position: &S, measurement: &O) -> MatchingResult<f64> {
        let distance = self.spatial_metrics.measurement_distance(road_position, measurement)?;
        Ok(self.parameters.emission_log_probability(distance))
    }

    /// Normalized transition metric between two candidates of consecutive steps
    ///
    /// See [`HmmParameters::normalized_transition_metric`]. Returns None if
    /// there is no route from `source` to `target`.
    pub fn normalized_transition_metric(&self, source: &S, target: &S) -> MatchingResult<Option<f64>> {
        let source_measurement = self.observation_of(source)?;
        let target_measurement = self.observation_of(target)?;

        let time_difference = self
            .temporal_metrics
            .time_difference(source_measurement, target_measurement);
        if !(time_difference > 0.0) {
            return Err(MatchingError::NonIncreasingTime(time_difference));
        }

        let linear_distance = self
            .spatial_metrics
            .linear_distance(source_measurement, target_measurement)?;
        let route_length = self.spatial_metrics.route_length(source, target)?;

        HmmParameters::normalized_transition_metric(route_length, linear_distance, time_difference)
    }

    /// Log transition density from `source` to `target`, -inf if unreachable
    pub fn transition_log_probability(&self, source: &S, target: &S) -> MatchingResult<f64> {
        let metric = self.normalized_transition_metric(source, target)?;
        Ok(self.parameters.transition_log_probability_from_metric(metric))
    }

    fn observation_of(&self, candidate: &S) -> MatchingResult<&O> {
        self.observation_index
            .get(&candidate.id())
            .map(|&index| &self.observations[index])
            .ok_or_else(|| MatchingError::UnknownCandidate(format!("{:?}", candidate.id())))
    }
}
