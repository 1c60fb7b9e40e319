//!
//! Forward algorithm definitions
//!
use super::common::GeneralizedHiddenMarkovModel;
use crate::common::{StateId, Symbol};
use crate::error::Result;
use crate::prob::Prob;
use log::debug;
use ndarray::Array2;
use rayon::prelude::*;

///
/// Tables of the forward algorithm
///
#[derive(Debug, Clone)]
pub struct ForwardResult {
    /// `alpha[[k, i]]` = P(emits `x[0..=i]` and a segment of `k` ends at `i`)
    pub alpha: Array2<Prob>,
    /// `entry[[k, b]]` = P(emits `x[0..b]` and a segment of `k` starts at `b`)
    pub entry: Array2<Prob>,
    /// `P(x)`
    pub total: Prob,
}

impl ForwardResult {
    pub fn n_positions(&self) -> usize {
        self.alpha.ncols()
    }
}

impl GeneralizedHiddenMarkovModel {
    ///
    /// Run Forward algorithm to the observations
    ///
    /// ```text
    /// entry[k][b] = initial(k)                          (b = 0)
    ///               sum_p alpha[p][b-1] t(p -> k)       (b > 0)
    ///
    /// alpha[k][i] = sum_d entry[k][i-d+1] D_k(d) E_k(i-d+1, i+1)
    /// ```
    ///
    /// The total probability of an empty sequence is one.
    ///
    pub fn forward(&self, xs: &[Symbol]) -> Result<ForwardResult> {
        self.validate_sequence(xs)?;
        let n = xs.len();
        let m = self.n_states();
        debug!("forward states={} length={}", m, n);
        let emissions = self.emissions(xs);
        let mut alpha = Array2::from_elem((m, n), Prob::zero());
        let mut entry = Array2::from_elem((m, n), Prob::zero());
        for i in 0..n {
            for k in 0..m {
                entry[[k, i]] = self.f_entry(k, i, &alpha);
            }
            for k in 0..m {
                let state = self.state(k);
                let mut a = Prob::zero();
                for d in self.durations_ending_at(k, i) {
                    let b = i + 1 - d;
                    let e = entry[[k, b]];
                    if e.is_zero() {
                        continue;
                    }
                    a += e * state.duration_probability(d) * emissions.segment(k, b, i + 1)?;
                }
                alpha[[k, i]] = a;
            }
        }
        let total = if n == 0 {
            Prob::one()
        } else {
            (0..m).map(|k| alpha[[k, n - 1]]).sum()
        };
        Ok(ForwardResult {
            alpha,
            entry,
            total,
        })
    }
    ///
    /// Probability of emitting `x[0..b]` and entering `k` at `b`
    ///
    fn f_entry(&self, k: StateId, b: usize, alpha: &Array2<Prob>) -> Prob {
        if b == 0 {
            self.initial_probability(k)
        } else {
            self.state(k)
                .predecessors()
                .iter()
                .map(|&p| alpha[[p, b - 1]] * self.transition_probability(p, k))
                .sum()
        }
    }
    ///
    /// `P(x)` of each sequence, with rayon parallel calculation
    ///
    pub fn forward_many<T>(&self, seqs: &[T]) -> Result<Vec<Prob>>
    where
        T: AsRef<[Symbol]> + Sync,
    {
        seqs.par_iter()
            .map(|seq| self.forward(seq.as_ref()).map(|r| r.total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghmm::mocks::mock_casino;
    use crate::params::GhmmParams;

    #[test]
    fn forward_single_roll() {
        // P(x0 = 5) = .5 * 1/6 + .5 * .5
        let ghmm = mock_casino(GhmmParams::default()).unwrap();
        let r = ghmm.forward(&[5]).unwrap();
        assert_abs_diff_eq!(r.total.to_value(), 0.5 / 6.0 + 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(r.alpha[[1, 0]].to_value(), 0.25, epsilon = 1e-12);
    }
    #[test]
    fn forward_two_rolls() {
        let ghmm = mock_casino(GhmmParams::default()).unwrap();
        let r = ghmm.forward(&[0, 5]).unwrap();
        let f = 1.0 / 6.0;
        let a_fair = 0.5 * f;
        let a_loaded = 0.5 * 0.1;
        let expected = (a_fair * 0.95 + a_loaded * 0.1) * f + (a_fair * 0.05 + a_loaded * 0.9) * 0.5;
        assert_abs_diff_eq!(r.total.to_value(), expected, epsilon = 1e-12);
        assert_eq!(r.n_positions(), 2);
    }
    #[test]
    fn forward_empty_sequence() {
        let ghmm = mock_casino(GhmmParams::default()).unwrap();
        let r = ghmm.forward(&[]).unwrap();
        assert!(r.total.is_one());
        assert_eq!(r.n_positions(), 0);
    }
    #[test]
    fn forward_many_matches_forward() {
        let ghmm = mock_casino(GhmmParams::default()).unwrap();
        let seqs = vec![vec![0, 1, 2], vec![5, 5, 5, 5], vec![3]];
        let totals = ghmm.forward_many(&seqs).unwrap();
        for (seq, total) in seqs.iter().zip(totals.iter()) {
            assert_eq!(ghmm.forward(seq).unwrap().total, *total);
        }
    }
    #[test]
    fn forward_rejects_out_of_range_symbol() {
        let ghmm = mock_casino(GhmmParams::default()).unwrap();
        assert!(ghmm.forward(&[0, 6]).is_err());
    }
}
