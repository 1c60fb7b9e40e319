//!
//! Viterbi algorithm definitions
//!
use super::common::GeneralizedHiddenMarkovModel;
use super::segment::Segment;
use crate::common::{StateId, Symbol};
use crate::error::{ModelError, Result};
use crate::prob::Prob;
use log::{debug, warn};
use ndarray::Array2;
use rayon::prelude::*;

/// `psi` of segments entered from the initial distribution
const NO_PREDECESSOR: StateId = StateId::MAX;

///
/// Best labeling and the Viterbi table
///
#[derive(Debug, Clone)]
pub struct ViterbiResult {
    /// MAP state of each position
    pub path: Vec<StateId>,
    /// `P(x, path)`
    pub probability: Prob,
    /// `gamma[[k, i]]` = max P(emits `x[0..=i]` and a segment of `k` ends at `i`)
    pub gamma: Array2<Prob>,
}

impl ViterbiResult {
    /// maximal runs of the path
    pub fn segments(&self) -> Vec<Segment> {
        Segment::read_sequence(&self.path)
    }
}

impl GeneralizedHiddenMarkovModel {
    ///
    /// Run Viterbi algorithm to the observations
    ///
    /// ```text
    /// gamma[k][i] = max_d max_p gamma[p][i-d] t(p -> k) D_k(d) E_k(i-d+1, i+1)
    /// ```
    ///
    /// where a segment starting at position 0 uses `initial(k)` instead of
    /// the predecessor term. Ties keep the first candidate found, scanning
    /// durations ascending, predecessors in list order and states ascending.
    ///
    /// Returns `ImpossibleSequence` if every labeling has zero probability.
    ///
    pub fn viterbi(&self, xs: &[Symbol]) -> Result<ViterbiResult> {
        self.validate_sequence(xs)?;
        let n = xs.len();
        let m = self.n_states();
        debug!("viterbi states={} length={}", m, n);
        if n == 0 {
            return Ok(ViterbiResult {
                path: Vec::new(),
                probability: Prob::one(),
                gamma: Array2::from_elem((m, 0), Prob::zero()),
            });
        }
        let emissions = self.emissions(xs);
        let mut gamma = Array2::from_elem((m, n), Prob::zero());
        let mut psi = Array2::from_elem((m, n), NO_PREDECESSOR);
        let mut psilen = Array2::from_elem((m, n), 0usize);
        // best (score, predecessor) to enter each state at each position
        let mut entry = Array2::from_elem((m, n), (Prob::zero(), NO_PREDECESSOR));
        for i in 0..n {
            for k in 0..m {
                entry[[k, i]] = self.v_entry(k, i, &gamma);
            }
            for k in 0..m {
                let state = self.state(k);
                let mut best = Prob::zero();
                let mut best_pred = NO_PREDECESSOR;
                let mut best_len = 0;
                for d in self.durations_ending_at(k, i) {
                    let b = i + 1 - d;
                    let (score, pred) = entry[[k, b]];
                    if score.is_zero() {
                        continue;
                    }
                    let candidate =
                        score * state.duration_probability(d) * emissions.segment(k, b, i + 1)?;
                    if candidate > best {
                        best = candidate;
                        best_pred = pred;
                        best_len = d;
                    }
                }
                gamma[[k, i]] = best;
                psi[[k, i]] = best_pred;
                psilen[[k, i]] = best_len;
            }
        }

        // termination
        let mut best = Prob::zero();
        let mut last = NO_PREDECESSOR;
        for k in 0..m {
            if gamma[[k, n - 1]] > best {
                best = gamma[[k, n - 1]];
                last = k;
            }
        }
        if last == NO_PREDECESSOR {
            warn!("viterbi: sequence of length {} has zero likelihood", n);
            return Err(ModelError::ImpossibleSequence);
        }

        // backtrack
        let mut path = vec![0; n];
        let mut k = last;
        let mut end = n;
        loop {
            let d = psilen[[k, end - 1]];
            let begin = end - d;
            for label in path[begin..end].iter_mut() {
                *label = k;
            }
            if begin == 0 {
                break;
            }
            k = psi[[k, end - 1]];
            end = begin;
        }
        Ok(ViterbiResult {
            path,
            probability: best,
            gamma,
        })
    }
    ///
    /// Best way to enter `k` at position `b`, with the predecessor achieving it
    ///
    fn v_entry(&self, k: StateId, b: usize, gamma: &Array2<Prob>) -> (Prob, StateId) {
        if b == 0 {
            return (self.initial_probability(k), NO_PREDECESSOR);
        }
        let mut best = Prob::zero();
        let mut best_pred = NO_PREDECESSOR;
        for &p in self.state(k).predecessors() {
            let score = gamma[[p, b - 1]] * self.transition_probability(p, k);
            if score > best {
                best = score;
                best_pred = p;
            }
        }
        (best, best_pred)
    }
    ///
    /// Viterbi of each sequence, with rayon parallel calculation
    ///
    pub fn viterbi_many<T>(&self, seqs: &[T]) -> Vec<Result<ViterbiResult>>
    where
        T: AsRef<[Symbol]> + Sync,
    {
        seqs.par_iter().map(|seq| self.viterbi(seq.as_ref())).collect()
    }
}
