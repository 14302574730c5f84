#![allow(dead_code)]

use offline_map_matching::map_match::{MostLikelySequence, SequenceDecoder, TimeStep};
use offline_map_matching::types::Identified;

/// Viterbi scores and back pointers for one time step
struct Column<S> {
    states: Vec<S>,
    scores: Vec<f64>,
    back_pointers: Vec<Option<usize>>,
}

/// Reference Viterbi decoder over log probabilities
///
/// Missing transition entries count as impossible. The sequence breaks as
/// soon as no state of a step has a finite score.
pub struct ViterbiDecoder<S> {
    columns: Vec<Column<S>>,
    broken: bool,
}

impl<S> ViterbiDecoder<S> {
    pub fn new() -> Self {
        ViterbiDecoder {
            columns: Vec::new(),
            broken: false,
        }
    }

    fn push(&mut self, column: Column<S>) {
        if column.scores.iter().all(|score| *score == f64::NEG_INFINITY) {
            self.broken = true;
        }
        self.columns.push(column);
    }
}

fn emission<S: Identified, O>(step: &TimeStep<S, O>, state: &S) -> f64 {
    step.emission_log_probabilities()
        .get(&state.id())
        .copied()
        .unwrap_or(f64::NEG_INFINITY)
}

impl<S: Identified + Clone, O> SequenceDecoder<S, O> for ViterbiDecoder<S> {
    fn start_with_initial_observation(&mut self, step: &TimeStep<S, O>) {
        let states = step.candidates().to_vec();
        let scores = states.iter().map(|state| emission(step, state)).collect();
        let back_pointers = vec![None; states.len()];
        self.push(Column {
            states,
            scores,
            back_pointers,
        });
    }

    fn next_step(&mut self, step: &TimeStep<S, O>) {
        if self.broken {
            return;
        }
        let previous = self.columns.last().expect("next_step called before start");

        let states = step.candidates().to_vec();
        let mut scores = Vec::with_capacity(states.len());
        let mut back_pointers = Vec::with_capacity(states.len());
        for state in &states {
            let mut best_score = f64::NEG_INFINITY;
            let mut best_previous = None;
            for (index, previous_state) in previous.states.iter().enumerate() {
                let transition = step
                    .transition_log_probabilities()
                    .get(&(previous_state.id(), state.id()))
                    .copied()
                    .unwrap_or(f64::NEG_INFINITY);
                let score = previous.scores[index] + transition;
                if score > best_score {
                    best_score = score;
                    best_previous = Some(index);
                }
            }
            scores.push(best_score + emission(step, state));
            back_pointers.push(best_previous);
        }

        self.push(Column {
            states,
            scores,
            back_pointers,
        });
    }

    fn compute_most_likely_sequence(&mut self) -> MostLikelySequence<S> {
        if self.broken {
            return MostLikelySequence::Broken;
        }
        let Some(last) = self.columns.last() else {
            return MostLikelySequence::Matched(Vec::new());
        };

        let mut best = 0;
        for (index, score) in last.scores.iter().enumerate() {
            if *score > last.scores[best] {
                best = index;
            }
        }

        let mut sequence = Vec::with_capacity(self.columns.len());
        let mut current = Some(best);
        for column in self.columns.iter().rev() {
            let index = current.expect("finite score without back pointer");
            sequence.push(column.states[index].clone());
            current = column.back_pointers[index];
        }
        sequence.reverse();

        MostLikelySequence::Matched(sequence)
    }
}
