//!
//! Definition of the generalized HMM and supervised evaluation
//!
use super::emission::Emissions;
use super::segment::Segment;
use super::state::State;
use crate::common::{find_invalid_symbol, StateId, Symbol};
use crate::error::{ModelError, Result};
use crate::model::{DiscreteIIDModel, ProbabilisticModel};
use crate::params::GhmmParams;
use crate::prob::Prob;
use log::{debug, warn};
use std::sync::Arc;

///
/// Generalized hidden Markov model
///
/// Built once from a wired state graph, then read-only: every inference
/// call allocates its own tables, so one model can serve many sequences
/// (also from several threads).
///
#[derive(Debug, Clone)]
pub struct GeneralizedHiddenMarkovModel {
    states: Vec<State>,
    initial: Arc<DiscreteIIDModel>,
    observation_alphabet_size: usize,
    params: GhmmParams,
}

impl GeneralizedHiddenMarkovModel {
    ///
    /// Build the model from its states.
    ///
    /// * `states[i].id()` must be `i`
    /// * adjacency lists must only refer to existing states
    /// * initial and transition distributions are over `states.len()` symbols
    ///
    /// Explicit durations are capped to `params.max_explicit_duration` and
    /// non-geometric states get their self-transition removed. An edge listed
    /// on one side only (predecessor or successor) is added to the other.
    ///
    pub fn new(
        mut states: Vec<State>,
        initial: Arc<DiscreteIIDModel>,
        observation_alphabet_size: usize,
        params: GhmmParams,
    ) -> Result<Self> {
        let n_states = states.len();
        if initial.alphabet_size() != n_states {
            return Err(ModelError::AlphabetMismatch {
                what: "initial distribution".to_string(),
                expected: n_states,
                actual: initial.alphabet_size(),
            });
        }
        for (index, state) in states.iter_mut().enumerate() {
            if state.id() != index {
                return Err(ModelError::StateIdMismatch {
                    index,
                    id: state.id(),
                });
            }
            if let Some(&target) = state
                .predecessors()
                .iter()
                .chain(state.successors().iter())
                .find(|&&t| t >= n_states)
            {
                return Err(ModelError::MissingState {
                    state: index,
                    target,
                });
            }
            if state.transition().alphabet_size() != n_states {
                return Err(ModelError::AlphabetMismatch {
                    what: format!("transition of state {}", index),
                    expected: n_states,
                    actual: state.transition().alphabet_size(),
                });
            }
            if state.observation().alphabet_size() != observation_alphabet_size {
                return Err(ModelError::AlphabetMismatch {
                    what: format!("observation of state {}", index),
                    expected: observation_alphabet_size,
                    actual: state.observation().alphabet_size(),
                });
            }
            let duration = state.duration().clone().capped(params.max_explicit_duration);
            duration.validate()?;
            state.set_duration(duration);
            if !state.is_geometric() && !state.transition_probability(index).is_zero() {
                warn!("removing self-transition of state {}", state.name());
                state.fix_transition_distribution()?;
            }
        }
        // predecessor and successor lists describe the same edges
        let edges: Vec<(StateId, StateId)> = states
            .iter()
            .flat_map(|s| {
                let k = s.id();
                s.predecessors()
                    .iter()
                    .map(move |&p| (p, k))
                    .chain(s.successors().iter().map(move |&q| (k, q)))
            })
            .collect();
        for (from, to) in edges {
            states[from].add_successor(to);
            states[to].add_predecessor(from);
        }
        Ok(GeneralizedHiddenMarkovModel {
            states,
            initial,
            observation_alphabet_size,
            params,
        })
    }

    //
    // accessors
    //
    pub fn n_states(&self) -> usize {
        self.states.len()
    }
    pub fn state_alphabet_size(&self) -> usize {
        self.states.len()
    }
    pub fn observation_alphabet_size(&self) -> usize {
        self.observation_alphabet_size
    }
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }
    pub fn states(&self) -> &[State] {
        &self.states
    }
    pub fn initial(&self) -> &DiscreteIIDModel {
        &self.initial
    }
    pub fn params(&self) -> &GhmmParams {
        &self.params
    }
    ///
    /// `P(state is the first state)`
    ///
    pub fn initial_probability(&self, state: StateId) -> Prob {
        self.initial.probability_of(state)
    }
    ///
    /// `P(from -> to)`
    ///
    pub fn transition_probability(&self, from: StateId, to: StateId) -> Prob {
        self.states[from].transition_probability(to)
    }

    //
    // helpers of the dynamic programs
    //

    ///
    /// Every symbol must be in the observation alphabet.
    ///
    pub fn validate_sequence(&self, xs: &[Symbol]) -> Result<()> {
        match find_invalid_symbol(xs, self.observation_alphabet_size) {
            Some((position, symbol)) => Err(ModelError::SymbolOutOfRange {
                symbol,
                position,
                alphabet_size: self.observation_alphabet_size,
            }),
            None => Ok(()),
        }
    }
    pub(crate) fn emissions<'a>(&'a self, xs: &'a [Symbol]) -> Emissions<'a> {
        Emissions::new(&self.states, xs, self.params.cached_emissions)
    }
    ///
    /// Admissible lengths of a segment of `state` ending at position `i`
    /// (inclusive), ascending.
    ///
    pub(crate) fn durations_ending_at(
        &self,
        state: StateId,
        i: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let limit = (i + 1).min(self.params.max_backtracking);
        self.states[state]
            .durations()
            .take_while(move |&d| d <= limit)
    }
    ///
    /// Admissible lengths of a segment of `state` starting at position `b`
    /// in a sequence of length `n`, ascending.
    ///
    pub(crate) fn durations_starting_at(
        &self,
        state: StateId,
        b: usize,
        n: usize,
    ) -> impl Iterator<Item = usize> + '_ {
        let limit = (n - b).min(self.params.max_backtracking);
        self.states[state]
            .durations()
            .take_while(move |&d| d <= limit)
    }

    //
    // supervised evaluation
    //

    ///
    /// Joint probability `P(xs, ys)` of observations and a labeling.
    ///
    /// The labeling is split into maximal runs. Each run adds a transition
    /// term (initial distribution for the first run), a duration term and
    /// the emission of its span. A run of a geometric state is a chain of
    /// length-1 segments joined by self-transitions.
    ///
    pub fn evaluate(&self, xs: &[Symbol], ys: &[StateId]) -> Result<Prob> {
        if xs.len() != ys.len() {
            return Err(ModelError::LengthMismatch {
                observations: xs.len(),
                labels: ys.len(),
            });
        }
        self.validate_sequence(xs)?;
        if let Some((position, symbol)) = find_invalid_symbol(ys, self.n_states()) {
            return Err(ModelError::SymbolOutOfRange {
                symbol,
                position,
                alphabet_size: self.n_states(),
            });
        }
        debug!("evaluate labeling of length {}", xs.len());
        let emissions = self.emissions(xs);
        let mut prob = Prob::one();
        let mut previous: Option<StateId> = None;
        for segment in Segment::read_sequence(ys) {
            let k = segment.state;
            let state = &self.states[k];
            prob *= match previous {
                None => self.initial_probability(k),
                Some(p) => self.transition_probability(p, k),
            };
            if state.is_geometric() {
                prob *= state.transition_probability(k).powi(segment.len() - 1);
                for i in segment.start..segment.end {
                    prob *= state.duration_probability(1) * emissions.segment(k, i, i + 1)?;
                }
            } else {
                prob *= state.duration_probability(segment.len());
                prob *= emissions.segment(k, segment.start, segment.end)?;
            }
            previous = Some(k);
        }
        Ok(prob)
    }
}

///
/// Fill the predecessor/successor lists of every state from the non-zero
/// entries of the transition distributions.
///
pub fn link_states(states: &mut [State]) {
    let edges: Vec<(StateId, StateId)> = states
        .iter()
        .flat_map(|from| {
            from.transition()
                .log_probabilities()
                .iter()
                .enumerate()
                .filter(|(_, p)| !p.is_zero())
                .map(move |(to, _)| (from.id(), to))
        })
        .collect();
    for (from, to) in edges {
        if from < states.len() && to < states.len() {
            states[from].add_successor(to);
            states[to].add_predecessor(from);
        }
    }
}

impl std::fmt::Display for GeneralizedHiddenMarkovModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "initial: {}", self.initial)?;
        for state in self.states.iter() {
            writeln!(f, "{}", state)?;
        }
        Ok(())
    }
}
