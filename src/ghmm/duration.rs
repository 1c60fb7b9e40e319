//!
//! Duration laws of GHMM states
//!
//! * `Geometric`: implicit. Every segment has length 1 and runs are encoded
//!   by self-transitions of the state.
//! * `Fixed(k)` / `Signal(k)`: every segment has length exactly `k`.
//! * `Explicit`: the length `l` is drawn from a distribution whose symbols
//!   are lengths, truncated to `1..=max_size`.
//!
use crate::common::Symbol;
use crate::error::{ModelError, Result};
use crate::model::DiscreteIIDModel;
use crate::prob::Prob;
use rand::RngCore;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Duration {
    Geometric,
    Fixed(usize),
    Signal(usize),
    Explicit {
        distribution: Arc<DiscreteIIDModel>,
        max_size: usize,
    },
}

impl Duration {
    ///
    /// Explicit duration whose admissible lengths are `1..=max_size`,
    /// where `max_size` is the largest length the distribution can express.
    ///
    pub fn explicit(distribution: Arc<DiscreteIIDModel>) -> Self {
        let max_size = distribution.log_probabilities().len().saturating_sub(1);
        Duration::Explicit {
            distribution,
            max_size,
        }
    }
    ///
    /// Limit an explicit duration to lengths `<= cap`. Other laws are unchanged.
    ///
    pub fn capped(self, cap: usize) -> Self {
        match self {
            Duration::Explicit {
                distribution,
                max_size,
            } => Duration::Explicit {
                distribution,
                max_size: max_size.min(cap),
            },
            other => other,
        }
    }
    pub fn is_geometric(&self) -> bool {
        matches!(self, Duration::Geometric)
    }
    ///
    /// Probability that a segment has the given length
    ///
    pub fn probability(&self, length: usize) -> Prob {
        match self {
            Duration::Geometric => {
                if length == 1 {
                    Prob::one()
                } else {
                    Prob::zero()
                }
            }
            Duration::Fixed(k) | Duration::Signal(k) => {
                if length == *k {
                    Prob::one()
                } else {
                    Prob::zero()
                }
            }
            Duration::Explicit {
                distribution,
                max_size,
            } => {
                if (1..=*max_size).contains(&length) {
                    distribution.probability_of(length as Symbol)
                } else {
                    Prob::zero()
                }
            }
        }
    }
    ///
    /// Largest admissible length
    ///
    pub fn maximum_size(&self) -> usize {
        match self {
            Duration::Geometric => 1,
            Duration::Fixed(k) | Duration::Signal(k) => *k,
            Duration::Explicit { max_size, .. } => *max_size,
        }
    }
    ///
    /// Admissible lengths in ascending order
    ///
    pub fn durations(&self) -> DurationRange {
        match self {
            Duration::Geometric => DurationRange::new(1, 1),
            Duration::Fixed(k) | Duration::Signal(k) => DurationRange::new(*k, *k),
            Duration::Explicit { max_size, .. } => DurationRange::new(1, *max_size),
        }
    }
    ///
    /// At least one length must be admissible
    ///
    pub fn validate(&self) -> Result<()> {
        match self {
            Duration::Geometric => Ok(()),
            Duration::Fixed(0) | Duration::Signal(0) => Err(ModelError::InvalidDuration(
                "fixed duration of length 0".to_string(),
            )),
            Duration::Fixed(_) | Duration::Signal(_) => Ok(()),
            Duration::Explicit { max_size, .. } => {
                if (1..=*max_size).any(|l| !self.probability(l).is_zero()) {
                    Ok(())
                } else {
                    Err(ModelError::InvalidDuration(format!(
                        "explicit duration has no mass on lengths 1..={}",
                        max_size
                    )))
                }
            }
        }
    }
    ///
    /// Sample a segment length, `None` if no length has mass.
    ///
    pub fn choose(&self, rng: &mut dyn RngCore) -> Option<usize> {
        match self {
            Duration::Geometric => Some(1),
            Duration::Fixed(k) | Duration::Signal(k) => Some(*k),
            Duration::Explicit { max_size, .. } => {
                let choices: Vec<(usize, Prob)> =
                    (1..=*max_size).map(|l| (l, self.probability(l))).collect();
                crate::model::iid::pick_with_prob(rng, &choices)
            }
        }
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Duration::Geometric => write!(f, "geometric"),
            Duration::Fixed(k) => write!(f, "fixed({})", k),
            Duration::Signal(k) => write!(f, "signal({})", k),
            Duration::Explicit { max_size, .. } => write!(f, "explicit(<={})", max_size),
        }
    }
}

///
/// Lazy, restartable range of lengths `first..=last`.
/// Empty if `first > last`.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationRange {
    next: usize,
    last: usize,
}

impl DurationRange {
    pub fn new(first: usize, last: usize) -> Self {
        DurationRange { next: first, last }
    }
}

impl Iterator for DurationRange {
    type Item = usize;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next <= self.last {
            let d = self.next;
            self.next += 1;
            Some(d)
        } else {
            None
        }
    }
}
