use super::{
    HmmParameters, MapMatchingHmmProbabilities, MostLikelySequence, SequenceDecoder, SpatialMetrics,
    TemporalMetrics, TimeStep,
};
use crate::error::{MatchingError, MatchingResult};
use crate::types::Identified;

/// Offline map matcher for a complete trace
///
/// # Architecture
/// - Builds the HMM probabilities over all time steps of the trace
/// - Scores emissions for every candidate of every step
/// - Scores transitions for every (previous candidate, candidate) pair
/// - Feeds the steps in time order to a [`SequenceDecoder`] and returns its result
///
/// # Outcomes
/// - `Ok(Matched(..))`: one road position per time step
/// - `Ok(Broken)`: no candidate sequence has non-zero probability
///   (e.g. a step without candidates, or only unreachable transitions)
/// - `Err(..)`: invalid input or metric cache misuse; time steps stay
///   unscored and the decoder is not fed
///
/// # Usage
/// ```no_run
/// use offline_map_matching::map_match::{
///     DefaultTemporalMetrics, OfflineMapMatcher, PrecomputedSpatialMetrics, SequenceDecoder, TimeStep,
/// };
/// use offline_map_matching::types::{GpsMeasurement, RoadPosition};
///
/// # fn run(
/// #     time_steps: &mut [TimeStep<RoadPosition, GpsMeasurement>],
/// #     metrics: &PrecomputedSpatialMetrics<RoadPosition, GpsMeasurement>,
/// #     viterbi: &mut impl SequenceDecoder<RoadPosition, GpsMeasurement>,
/// # ) -> offline_map_matching::MatchingResult<()> {
/// let matcher = OfflineMapMatcher::default();
/// let result = matcher.compute_most_likely_sequence(time_steps, &DefaultTemporalMetrics, metrics, viterbi)?;
///
/// match result.sequence() {
///     Some(road_positions) => println!("Matched {} positions", road_positions.len()),
///     None => println!("HMM break"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct OfflineMapMatcher {
    parameters: HmmParameters,
}

impl OfflineMapMatcher {
    /// Create a matcher with custom HMM parameters
    ///
    /// # Errors
    /// `InvalidParameter` if sigma or beta is not finite and positive
    pub fn new(parameters: HmmParameters) -> MatchingResult<Self> {
        parameters.validate()?;
        Ok(OfflineMapMatcher { parameters })
    }

    pub fn parameters(&self) -> &HmmParameters {
        &self.parameters
    }

    /// Score all time steps and compute the most likely road position sequence
    ///
    /// # Arguments
    /// * `time_steps` - Unscored trace in time order; probability maps are
    ///   filled in place once every step has been scored
    /// * `temporal_metrics` - Time differences between measurements
    /// * `spatial_metrics` - Distances and route lengths, fully populated
    /// * `decoder` - Sequence inference engine, fresh for this trace
    pub fn compute_most_likely_sequence<S, O, SM, TM, D>(
        &self,
        time_steps: &mut [TimeStep<S, O>],
        temporal_metrics: &TM,
        spatial_metrics: &SM,
        decoder: &mut D,
    ) -> MatchingResult<MostLikelySequence<S>>
    where
        S: Identified,
        O: Clone,
        SM: SpatialMetrics<S, O>,
        TM: TemporalMetrics<O>,
        D: SequenceDecoder<S, O>,
    {
        log::info!("Starting map matching for {} time steps", time_steps.len());

        if let Some(index) = time_steps.iter().position(|time_step| time_step.is_scored()) {
            return Err(MatchingError::AlreadyScored(index));
        }

        let probabilities =
            MapMatchingHmmProbabilities::new(self.parameters, time_steps, spatial_metrics, temporal_metrics)?;

        // Score the whole trace before touching any time step or the decoder
        let mut scores = Vec::with_capacity(time_steps.len());
        for (index, time_step) in time_steps.iter().enumerate() {
            let emissions = Self::emission_log_probabilities(&probabilities, time_step)?;
            let transitions = match index.checked_sub(1) {
                Some(previous) => {
                    Self::transition_log_probabilities(&probabilities, &time_steps[previous], time_step)?
                }
                None => Vec::new(),
            };
            scores.push((emissions, transitions));
        }

        for (index, (time_step, (emissions, transitions))) in time_steps.iter_mut().zip(scores).enumerate() {
            for (candidate, log_probability) in emissions {
                time_step.add_emission_log_probability(candidate, log_probability)?;
            }
            for (from, to, log_probability) in transitions {
                time_step.add_transition_log_probability(from, to, log_probability)?;
            }

            log::debug!(
                "Time step {}: {} candidates, {} transitions scored",
                index,
                time_step.candidates().len(),
                time_step.transition_log_probabilities().len()
            );
        }

        if let Some((first, rest)) = time_steps.split_first() {
            decoder.start_with_initial_observation(first);
            for time_step in rest {
                decoder.next_step(time_step);
            }
        }

        let sequence = decoder.compute_most_likely_sequence();
        match &sequence {
            MostLikelySequence::Matched(states) => {
                log::info!("Map matching completed with {} matched positions", states.len());
            }
            MostLikelySequence::Broken => {
                log::warn!("HMM break: no candidate sequence with non-zero probability");
            }
        }

        Ok(sequence)
    }

    fn emission_log_probabilities<S, O, SM, TM>(
        probabilities: &MapMatchingHmmProbabilities<'_, S, O, SM, TM>,
        time_step: &TimeStep<S, O>,
    ) -> MatchingResult<Vec<(S::Id, f64)>>
    where
        S: Identified,
        O: Clone,
        SM: SpatialMetrics<S, O>,
        TM: TemporalMetrics<O>,
    {
        time_step
            .candidates()
            .iter()
            .map(|candidate| {
                let log_probability =
                    probabilities.emission_log_probability(candidate, time_step.observation())?;
                log::trace!("Emission {:?}: {:.4}", candidate.id(), log_probability);
                Ok((candidate.id(), log_probability))
            })
            .collect()
    }

    fn transition_log_probabilities<S, O, SM, TM>(
        probabilities: &MapMatchingHmmProbabilities<'_, S, O, SM, TM>,
        previous_step: &TimeStep<S, O>,
        time_step: &TimeStep<S, O>,
    ) -> MatchingResult<Vec<(S::Id, S::Id, f64)>>
    where
        S: Identified,
        O: Clone,
        SM: SpatialMetrics<S, O>,
        TM: TemporalMetrics<O>,
    {
        let mut transitions =
            Vec::with_capacity(previous_step.candidates().len() * time_step.candidates().len());
        for from in previous_step.candidates() {
            for to in time_step.candidates() {
                let log_probability = probabilities.transition_log_probability(from, to)?;
                log::trace!("Transition {:?} -> {:?}: {:.4}", from.id(), to.id(), log_probability);
                transitions.push((from.id(), to.id(), log_probability));
            }
        }
        Ok(transitions)
    }
}
