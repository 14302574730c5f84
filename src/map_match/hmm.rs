//! Interface to the sequence inference engine
//!
//! A [`TimeStep`] pairs one observation with its candidate states and
//! collects the log probabilities the engine consumes. The engine itself is
//! supplied by the caller through [`SequenceDecoder`].

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::error::{MatchingError, MatchingResult};
use crate::types::Identified;

/// One observation with its fixed set of candidate states
///
/// Probability maps are append-only: each candidate (or candidate pair) can
/// be scored exactly once.
#[derive(Clone, Debug)]
pub struct TimeStep<S: Identified, O> {
    observation: O,
    candidates: Vec<S>,
    candidate_ids: HashSet<S::Id>,
    emission_log_probabilities: HashMap<S::Id, f64>,
    transition_log_probabilities: HashMap<(S::Id, S::Id), f64>,
}

impl<S: Identified, O> TimeStep<S, O> {
    /// Create a time step
    ///
    /// An empty candidate list is valid and makes the sequence break at this step.
    pub fn new(observation: O, candidates: Vec<S>) -> MatchingResult<Self> {
        let mut candidate_ids = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if !candidate_ids.insert(candidate.id()) {
                return Err(MatchingError::DuplicateCandidate(format!("{:?}", candidate.id())));
            }
        }

        Ok(TimeStep {
            observation,
            candidates,
            candidate_ids,
            emission_log_probabilities: HashMap::new(),
            transition_log_probabilities: HashMap::new(),
        })
    }

    pub fn observation(&self) -> &O {
        &self.observation
    }

    pub fn candidates(&self) -> &[S] {
        &self.candidates
    }

    pub fn has_candidate(&self, id: S::Id) -> bool {
        self.candidate_ids.contains(&id)
    }

    /// True once any emission or transition has been added
    pub fn is_scored(&self) -> bool {
        !self.emission_log_probabilities.is_empty() || !self.transition_log_probabilities.is_empty()
    }

    pub fn emission_log_probabilities(&self) -> &HashMap<S::Id, f64> {
        &self.emission_log_probabilities
    }

    /// Transition log probabilities keyed by (previous candidate, candidate)
    pub fn transition_log_probabilities(&self) -> &HashMap<(S::Id, S::Id), f64> {
        &self.transition_log_probabilities
    }

    pub fn add_emission_log_probability(&mut self, candidate: S::Id, log_probability: f64) -> MatchingResult<()> {
        if !self.has_candidate(candidate) {
            return Err(MatchingError::UnknownCandidate(format!("{:?}", candidate)));
        }

        match self.emission_log_probabilities.entry(candidate) {
            Entry::Occupied(_) => Err(MatchingError::DuplicateProbability {
                kind: "emission",
                key: format!("{:?}", candidate),
            }),
            Entry::Vacant(entry) => {
                entry.insert(log_probability);
                Ok(())
            }
        }
    }

    /// Add the transition log probability from a candidate of the previous step
    ///
    /// `to` must be a candidate of this step; `from` is not checked here.
    pub fn add_transition_log_probability(
        &mut self,
        from: S::Id,
        to: S::Id,
        log_probability: f64,
    ) -> MatchingResult<()> {
        if !self.has_candidate(to) {
            return Err(MatchingError::UnknownCandidate(format!("{:?}", to)));
        }

        match self.transition_log_probabilities.entry((from, to)) {
            Entry::Occupied(_) => Err(MatchingError::DuplicateProbability {
                kind: "transition",
                key: format!("{:?}", (from, to)),
            }),
            Entry::Vacant(entry) => {
                entry.insert(log_probability);
                Ok(())
            }
        }
    }
}

/// Outcome of sequence inference
#[derive(Clone, Debug, PartialEq)]
pub enum MostLikelySequence<S> {
    /// One selected state per time step, in time order
    Matched(Vec<S>),
    /// No state sequence has non-zero probability
    Broken,
}

impl<S> MostLikelySequence<S> {
    pub fn is_broken(&self) -> bool {
        matches!(self, MostLikelySequence::Broken)
    }

    pub fn sequence(&self) -> Option<&[S]> {
        match self {
            MostLikelySequence::Matched(states) => Some(states),
            MostLikelySequence::Broken => None,
        }
    }

    pub fn into_sequence(self) -> Option<Vec<S>> {
        match self {
            MostLikelySequence::Matched(states) => Some(states),
            MostLikelySequence::Broken => None,
        }
    }
}

/// Sequence inference engine (e.g. Viterbi) fed one time step at a time
///
/// Every candidate of a step has an emission entry. Every step after the
/// first has a transition entry for each (previous candidate, candidate)
/// pair; `f64::NEG_INFINITY` marks an impossible transition.
pub trait SequenceDecoder<S: Identified, O> {
    fn start_with_initial_observation(&mut self, step: &TimeStep<S, O>);

    fn next_step(&mut self, step: &TimeStep<S, O>);

    fn compute_most_likely_sequence(&mut self) -> MostLikelySequence<S>;
}
