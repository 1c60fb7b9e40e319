//!
//! State of the generalized HMM
//!
use super::duration::{Duration, DurationRange};
use crate::common::StateId;
use crate::error::Result;
use crate::model::{DiscreteIIDModel, ProbabilisticModel, ProbabilisticModelPtr};
use crate::prob::Prob;
use std::sync::Arc;

///
/// A node of the GHMM graph
///
/// * `observation`: emission model, possibly shared with other states
/// * `transition`: distribution over successor state ids
/// * `duration`: law of the segment length
/// * predecessor/successor ids, filled by the model builder
/// * input/output phases for periodic models
/// * joinable flags and start/stop offsets for boundary-aware states
///
#[derive(Debug, Clone)]
pub struct State {
    id: StateId,
    name: String,
    observation: ProbabilisticModelPtr,
    transition: Arc<DiscreteIIDModel>,
    duration: Duration,
    predecessors: Vec<StateId>,
    successors: Vec<StateId>,
    input_phase: usize,
    output_phase: usize,
    left_joinable: bool,
    right_joinable: bool,
    start: usize,
    stop: usize,
}

impl State {
    pub fn new(
        id: StateId,
        name: &str,
        observation: ProbabilisticModelPtr,
        transition: Arc<DiscreteIIDModel>,
        duration: Duration,
    ) -> State {
        State {
            id,
            name: name.to_string(),
            observation,
            transition,
            duration,
            predecessors: Vec::new(),
            successors: Vec::new(),
            input_phase: 0,
            output_phase: 0,
            left_joinable: false,
            right_joinable: false,
            start: 0,
            stop: 0,
        }
    }
    pub fn with_phases(mut self, input_phase: usize, output_phase: usize) -> State {
        self.input_phase = input_phase;
        self.output_phase = output_phase;
        self
    }
    pub fn with_joinable(mut self, left: bool, right: bool) -> State {
        self.left_joinable = left;
        self.right_joinable = right;
        self
    }
    ///
    /// Extend the emission window of each segment by `start` positions
    /// to the left and `stop` positions to the right.
    ///
    pub fn with_offsets(mut self, start: usize, stop: usize) -> State {
        self.start = start;
        self.stop = stop;
        self
    }
    pub fn add_predecessor(&mut self, state: StateId) {
        if !self.predecessors.contains(&state) {
            self.predecessors.push(state);
        }
    }
    pub fn add_successor(&mut self, state: StateId) {
        if !self.successors.contains(&state) {
            self.successors.push(state);
        }
    }
    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    //
    // accessors
    //
    pub fn id(&self) -> StateId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn observation(&self) -> &dyn ProbabilisticModel {
        self.observation.as_ref()
    }
    pub(crate) fn observation_ptr(&self) -> &ProbabilisticModelPtr {
        &self.observation
    }
    pub fn transition(&self) -> &DiscreteIIDModel {
        &self.transition
    }
    pub fn duration(&self) -> &Duration {
        &self.duration
    }
    pub fn predecessors(&self) -> &[StateId] {
        &self.predecessors
    }
    pub fn successors(&self) -> &[StateId] {
        &self.successors
    }
    pub fn input_phase(&self) -> usize {
        self.input_phase
    }
    pub fn output_phase(&self) -> usize {
        self.output_phase
    }
    pub fn is_left_joinable(&self) -> bool {
        self.left_joinable
    }
    pub fn is_right_joinable(&self) -> bool {
        self.right_joinable
    }
    pub fn start(&self) -> usize {
        self.start
    }
    pub fn stop(&self) -> usize {
        self.stop
    }

    //
    // probabilities
    //
    pub fn is_geometric(&self) -> bool {
        self.duration.is_geometric()
    }
    ///
    /// `P(this state -> to)`
    ///
    pub fn transition_probability(&self, to: StateId) -> Prob {
        self.transition.probability_of(to)
    }
    pub fn duration_probability(&self, length: usize) -> Prob {
        self.duration.probability(length)
    }
    pub fn durations(&self) -> DurationRange {
        self.duration.durations()
    }
    ///
    /// Remove the self-transition mass and renormalize the rest.
    /// Self-transitions are meaningless when the duration is modeled
    /// explicitly. Calling it twice has no further effect.
    ///
    pub fn fix_transition_distribution(&mut self) -> Result<()> {
        if !self.transition_probability(self.id).is_zero() {
            self.transition = Arc::new(self.transition.without_symbol(self.id)?);
        }
        Ok(())
    }
    ///
    /// Emission window `[begin - start, end + stop)` of the segment
    /// `[begin, end)` in a sequence of length `length`.
    ///
    /// A window crossing the start (end) of the sequence is clamped if the
    /// state is left (right) joinable, and inadmissible (`None`) otherwise.
    ///
    pub fn emission_window(&self, begin: usize, end: usize, length: usize) -> Option<(usize, usize)> {
        let begin = match begin.checked_sub(self.start) {
            Some(b) => b,
            None if self.left_joinable => 0,
            None => return None,
        };
        let end = if end + self.stop <= length {
            end + self.stop
        } else if self.right_joinable {
            length
        } else {
            return None;
        };
        Some((begin, end))
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}({}) duration={} phase={}->{} transition={}",
            self.name, self.id, self.duration, self.input_phase, self.output_phase, self.transition
        )
    }
}
