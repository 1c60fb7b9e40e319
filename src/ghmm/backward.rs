//!
//! Backward algorithm definitions
//!
use super::common::GeneralizedHiddenMarkovModel;
use crate::common::Symbol;
use crate::error::Result;
use crate::prob::Prob;
use log::debug;
use ndarray::Array2;

///
/// Tables of the backward algorithm
///
#[derive(Debug, Clone)]
pub struct BackwardResult {
    /// `beta[[k, i]]` = P(emits `x[i+1..n]` | a segment of `k` ends at `i`)
    pub beta: Array2<Prob>,
    /// `exit[[k, b]]` = P(emits `x[b..n]` | a segment of `k` starts at `b`)
    pub exit: Array2<Prob>,
    /// `P(x)`
    pub total: Prob,
}

impl GeneralizedHiddenMarkovModel {
    ///
    /// Run Backward algorithm to the observations
    ///
    /// ```text
    /// beta[k][n-1] = 1
    /// beta[k][i]   = sum_q t(k -> q) exit[q][i+1]
    ///
    /// exit[q][b]   = sum_d D_q(d) E_q(b, b+d) beta[q][b+d-1]
    ///
    /// P(x) = sum_k initial(k) exit[k][0]
    /// ```
    ///
    pub fn backward(&self, xs: &[Symbol]) -> Result<BackwardResult> {
        self.validate_sequence(xs)?;
        let n = xs.len();
        let m = self.n_states();
        debug!("backward states={} length={}", m, n);
        let emissions = self.emissions(xs);
        let mut beta = Array2::from_elem((m, n), Prob::zero());
        let mut exit = Array2::from_elem((m, n), Prob::zero());
        for i in (0..n).rev() {
            for k in 0..m {
                beta[[k, i]] = if i + 1 == n {
                    Prob::one()
                } else {
                    self.state(k)
                        .successors()
                        .iter()
                        .map(|&q| self.transition_probability(k, q) * exit[[q, i + 1]])
                        .sum()
                };
            }
            for q in 0..m {
                let state = self.state(q);
                let mut e = Prob::zero();
                for d in self.durations_starting_at(q, i, n) {
                    let b = beta[[q, i + d - 1]];
                    if b.is_zero() {
                        continue;
                    }
                    e += state.duration_probability(d) * emissions.segment(q, i, i + d)? * b;
                }
                exit[[q, i]] = e;
            }
        }
        let total = if n == 0 {
            Prob::one()
        } else {
            (0..m)
                .map(|k| self.initial_probability(k) * exit[[k, 0]])
                .sum()
        };
        Ok(BackwardResult { beta, exit, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghmm::mocks::{mock_casino, mock_mixed};
    use crate::params::GhmmParams;
    use crate::random_seq::generate;

    #[test]
    fn backward_last_column_is_one() {
        let ghmm = mock_casino(GhmmParams::default()).unwrap();
        let r = ghmm.backward(&[0, 1, 5]).unwrap();
        assert!(r.beta[[0, 2]].is_one());
        assert!(r.beta[[1, 2]].is_one());
    }
    #[test]
    fn backward_total_matches_forward() {
        for seed in 0..4 {
            let xs = generate(30, 6, seed);
            let ghmm = mock_casino(GhmmParams::default()).unwrap();
            let f = ghmm.forward(&xs).unwrap();
            let b = ghmm.backward(&xs).unwrap();
            assert_abs_diff_eq!(f.total, b.total, epsilon = 1e-9);
        }
        for seed in 0..4 {
            let xs = generate(25, 2, seed);
            let ghmm = mock_mixed(GhmmParams::default()).unwrap();
            let f = ghmm.forward(&xs).unwrap();
            let b = ghmm.backward(&xs).unwrap();
            assert_abs_diff_eq!(f.total, b.total, epsilon = 1e-9);
        }
    }
    #[test]
    fn backward_empty_sequence() {
        let ghmm = mock_mixed(GhmmParams::default()).unwrap();
        let r = ghmm.backward(&[]).unwrap();
        assert!(r.total.is_one());
    }
}
