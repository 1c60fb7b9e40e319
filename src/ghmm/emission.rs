//!
//! Per-call emission lookup of the GHMM states
//!
//! One evaluator is built per distinct observation model (states sharing a
//! model share its evaluator), then every state maps segments to the
//! evaluator range of its emission window.
//!
use super::state::State;
use crate::common::{StateId, Symbol};
use crate::error::Result;
use crate::model::Evaluator;
use crate::prob::Prob;
use fnv::FnvHashMap;
use std::sync::Arc;

pub struct Emissions<'a> {
    evaluators: Vec<Evaluator<'a>>,
    /// index into `evaluators` for each state
    of_state: Vec<usize>,
    states: &'a [State],
    length: usize,
}

impl<'a> Emissions<'a> {
    pub fn new(states: &'a [State], sequence: &'a [Symbol], cached: bool) -> Self {
        let mut evaluators = Vec::new();
        let mut by_model: FnvHashMap<usize, usize> = FnvHashMap::default();
        let of_state = states
            .iter()
            .map(|state| {
                let key = Arc::as_ptr(state.observation_ptr()) as *const () as usize;
                *by_model.entry(key).or_insert_with(|| {
                    evaluators.push(Evaluator::new(state.observation(), sequence, cached));
                    evaluators.len() - 1
                })
            })
            .collect();
        Emissions {
            evaluators,
            of_state,
            states,
            length: sequence.len(),
        }
    }
    /// number of distinct evaluators
    pub fn n_evaluators(&self) -> usize {
        self.evaluators.len()
    }
    ///
    /// Emission probability of the segment `[begin, end)` by `state`,
    /// zero if its emission window is inadmissible.
    ///
    pub fn segment(&self, state: StateId, begin: usize, end: usize) -> Result<Prob> {
        match self.states[state].emission_window(begin, end, self.length) {
            Some((b, e)) => self.evaluators[self.of_state[state]].probability_of(b, e),
            None => Ok(Prob::zero()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghmm::Duration;
    use crate::model::{DiscreteIIDModel, ProbabilisticModelPtr};

    #[test]
    fn phases_share_one_evaluator() {
        let obs: ProbabilisticModelPtr = Arc::new(DiscreteIIDModel::new(vec![0.2, 0.8]).unwrap());
        let trans = Arc::new(DiscreteIIDModel::uniform(3).unwrap());
        let other: ProbabilisticModelPtr = Arc::new(DiscreteIIDModel::uniform(2).unwrap());
        let states = vec![
            State::new(0, "p0", obs.clone(), trans.clone(), Duration::Geometric).with_phases(0, 1),
            State::new(1, "p2", obs, trans.clone(), Duration::Geometric).with_phases(2, 0),
            State::new(2, "other", other, trans, Duration::Geometric),
        ];
        let xs = vec![1, 0, 1, 1];
        for cached in [true, false] {
            let emissions = Emissions::new(&states, &xs, cached);
            assert_eq!(emissions.n_evaluators(), 2);
            for b in 0..xs.len() {
                for e in b..=xs.len() {
                    assert_eq!(
                        emissions.segment(0, b, e).unwrap(),
                        emissions.segment(1, b, e).unwrap()
                    );
                }
            }
            assert_abs_diff_eq!(
                emissions.segment(0, 1, 3).unwrap().to_value(),
                0.2 * 0.8,
                epsilon = 1e-12
            );
        }
    }
}
