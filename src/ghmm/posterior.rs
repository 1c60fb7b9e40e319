//!
//! Posterior decoding
//!
//! The probability that position `i` is emitted by state `k` sums, over every
//! segment `[b, e)` of `k` covering `i`,
//!
//! ```text
//! entry[k][b] D_k(e-b) E_k(b, e) beta[k][e-1] / P(x)
//! ```
//!
//! Each segment adds its weight to every position it covers. Weights are
//! summed with [`Prob`] addition, so occupancies far below `f64` precision
//! stay representable. A geometric state reduces to `alpha[k][i] beta[k][i] / P(x)`.
//!
use super::backward::BackwardResult;
use super::common::GeneralizedHiddenMarkovModel;
use super::forward::ForwardResult;
use crate::common::{StateId, Symbol};
use crate::error::{ModelError, Result};
use crate::prob::Prob;
use log::{debug, warn};
use ndarray::Array2;

///
/// Posterior occupancy and the per-position argmax
///
#[derive(Debug, Clone)]
pub struct PosteriorResult {
    /// state maximizing the posterior at each position
    pub path: Vec<StateId>,
    /// `posterior[[k, i]]` = P(x[i] is emitted by `k` | x)
    pub posterior: Array2<Prob>,
    /// `P(x)`
    pub total: Prob,
}

impl GeneralizedHiddenMarkovModel {
    ///
    /// Posterior decoding
    ///
    /// The path is chosen independently at each position, so it may contain
    /// transitions the model forbids. Ties keep the lowest state id.
    ///
    pub fn posterior_decoding(&self, xs: &[Symbol]) -> Result<PosteriorResult> {
        let forward = self.forward(xs)?;
        let backward = self.backward(xs)?;
        self.posterior_from(xs, &forward, &backward)
    }
    ///
    /// Posterior decoding from already computed forward/backward tables of `xs`
    ///
    pub fn posterior_from(
        &self,
        xs: &[Symbol],
        forward: &ForwardResult,
        backward: &BackwardResult,
    ) -> Result<PosteriorResult> {
        let n = xs.len();
        let m = self.n_states();
        debug!("posterior states={} length={}", m, n);
        let total = forward.total;
        if total.is_zero() {
            warn!("posterior: sequence of length {} has zero likelihood", n);
            return Err(ModelError::ImpossibleSequence);
        }
        let emissions = self.emissions(xs);

        let mut posterior = Array2::from_elem((m, n), Prob::zero());
        for k in 0..m {
            let state = self.state(k);
            for e in 1..=n {
                let i = e - 1;
                let b_end = backward.beta[[k, i]];
                if b_end.is_zero() {
                    continue;
                }
                for d in self.durations_ending_at(k, i) {
                    let b = e - d;
                    let f_begin = forward.entry[[k, b]];
                    if f_begin.is_zero() {
                        continue;
                    }
                    let w = f_begin
                        * state.duration_probability(d)
                        * emissions.segment(k, b, e)?
                        * b_end
                        / total;
                    for j in b..e {
                        posterior[[k, j]] += w;
                    }
                }
            }
        }

        let path = (0..n)
            .map(|i| {
                let mut best = 0;
                for k in 1..m {
                    if posterior[[k, i]] > posterior[[best, i]] {
                        best = k;
                    }
                }
                best
            })
            .collect();
        Ok(PosteriorResult {
            path,
            posterior,
            total,
        })
    }
}
