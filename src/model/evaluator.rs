//!
//! Evaluators: a model bound to one sequence, answering
//! `P(seq[begin..end])` queries.
//!
//! `SimpleEvaluator` recomputes every query in `O(end - begin)`.
//! `CachedEvaluator` evaluates every position once at construction and
//! answers each query in `O(1)` from prefix sums. The cache is only valid
//! for models whose per-position score does not depend on anything but
//! the preceding symbols (IID, VLMC), which is the case for every
//! [`ProbabilisticModel`] in this crate.
//!
use super::ProbabilisticModel;
use crate::common::Symbol;
use crate::error::{ModelError, Result};
use crate::prob::{lp, Prob};

fn check_range(begin: usize, end: usize, length: usize) -> Result<()> {
    if begin <= end && end <= length {
        Ok(())
    } else {
        Err(ModelError::RangeOutOfBounds { begin, end, length })
    }
}

/// Stateless evaluator
#[derive(Debug, Clone, Copy)]
pub struct SimpleEvaluator<'a> {
    model: &'a dyn ProbabilisticModel,
    sequence: &'a [Symbol],
}

impl<'a> SimpleEvaluator<'a> {
    pub fn new(model: &'a dyn ProbabilisticModel, sequence: &'a [Symbol]) -> Self {
        SimpleEvaluator { model, sequence }
    }
    pub fn probability_of(&self, begin: usize, end: usize) -> Result<Prob> {
        check_range(begin, end, self.sequence.len())?;
        Ok(self.model.evaluate_sequence(self.sequence, begin, end))
    }
}

/// Prefix-sum evaluator
///
/// `prefix[i]` is the sum of the finite log probabilities of positions
/// `[0, i)` and `zeros[i]` counts the impossible positions among them,
/// so that a single `-inf` does not poison every later range.
#[derive(Debug, Clone)]
pub struct CachedEvaluator<'a> {
    sequence: &'a [Symbol],
    prefix: Vec<f64>,
    zeros: Vec<usize>,
}

impl<'a> CachedEvaluator<'a> {
    ///
    /// Evaluate every position of the sequence exactly once.
    ///
    pub fn make(model: &dyn ProbabilisticModel, sequence: &'a [Symbol]) -> Self {
        let mut prefix = Vec::with_capacity(sequence.len() + 1);
        let mut zeros = Vec::with_capacity(sequence.len() + 1);
        prefix.push(0.0);
        zeros.push(0);
        let (mut sum, mut n_zeros) = (0.0, 0);
        for i in 0..sequence.len() {
            let p = model.evaluate_position(sequence, i);
            if p.is_zero() {
                n_zeros += 1;
            } else {
                sum += p.to_log_value();
            }
            prefix.push(sum);
            zeros.push(n_zeros);
        }
        CachedEvaluator {
            sequence,
            prefix,
            zeros,
        }
    }
    pub fn probability_of(&self, begin: usize, end: usize) -> Result<Prob> {
        check_range(begin, end, self.sequence.len())?;
        if self.zeros[end] > self.zeros[begin] {
            Ok(Prob::zero())
        } else {
            Ok(lp(self.prefix[end] - self.prefix[begin]))
        }
    }
}

///
/// Either of the evaluators, chosen at construction.
///
/// There is no phase argument. Phases belong to GHMM states and every
/// observation model here scores a range the same way whatever the phase,
/// so states of different phases share one evaluator.
///
#[derive(Debug, Clone)]
pub enum Evaluator<'a> {
    Simple(SimpleEvaluator<'a>),
    Cached(CachedEvaluator<'a>),
}

impl<'a> Evaluator<'a> {
    pub fn new(model: &'a dyn ProbabilisticModel, sequence: &'a [Symbol], cached: bool) -> Self {
        if cached {
            Evaluator::Cached(CachedEvaluator::make(model, sequence))
        } else {
            Evaluator::Simple(SimpleEvaluator::new(model, sequence))
        }
    }
    pub fn sequence(&self) -> &'a [Symbol] {
        match self {
            Evaluator::Simple(e) => e.sequence,
            Evaluator::Cached(e) => e.sequence,
        }
    }
    pub fn len(&self) -> usize {
        self.sequence().len()
    }
    pub fn is_empty(&self) -> bool {
        self.sequence().is_empty()
    }
    pub fn is_cached(&self) -> bool {
        matches!(self, Evaluator::Cached(_))
    }
    ///
    /// `P(seq[begin..end])`; `begin == end` is one.
    ///
    pub fn probability_of(&self, begin: usize, end: usize) -> Result<Prob> {
        match self {
            Evaluator::Simple(e) => e.probability_of(begin, end),
            Evaluator::Cached(e) => e.probability_of(begin, end),
        }
    }
}
