//!
//! Probabilistic models over symbol sequences
//!
//! Every model implements [`ProbabilisticModel`], which is what GHMM states
//! use as observation models.
//!
//! * [`DiscreteIIDModel`]: flat categorical distribution
//! * [`ContextTree`]: suffix trie of categorical distributions
//! * [`VariableLengthMarkovChain`]: context tree used as an emission model
//! * [`Evaluator`]: model bound to a sequence, optionally prefix-cached
//!
pub mod context_tree;
pub mod evaluator;
pub mod iid;
pub mod vlmc;

pub use context_tree::{ContextTree, ContextTreeNode, NodeIndex};
pub use evaluator::{CachedEvaluator, Evaluator, SimpleEvaluator};
pub use iid::DiscreteIIDModel;
pub use vlmc::VariableLengthMarkovChain;

use crate::common::{Sequence, Symbol};
use crate::prob::Prob;
use rand::RngCore;
use std::sync::Arc;

///
/// Evaluation and sampling contract shared by all models
///
/// * `evaluate_position(&self, seq, i) -> Prob`
///     probability of `seq[i]` given `seq[..i]`.
///
/// * `evaluate_sequence(&self, seq, begin, end) -> Prob`
///     probability of `seq[begin..end]`, where positions before `begin`
///     may still be used as context.
///
/// * `choose_position(&self, rng, seq, i) -> Symbol`
///     sample a symbol for position `i` given `seq[..i]`. Only `seq[..i]`
///     is read, so `seq` may be exactly `i` long.
///
/// Models are immutable once built, so they are shared between states
/// (and threads) behind an `Arc`.
///
pub trait ProbabilisticModel: Send + Sync + std::fmt::Debug {
    ///
    /// number of symbols this model is defined over
    fn alphabet_size(&self) -> usize;
    ///
    /// `P(seq[i] | seq[..i])`
    fn evaluate_position(&self, seq: &[Symbol], i: usize) -> Prob;
    ///
    /// `P(seq[begin..end] | seq[..begin])`, the product of `evaluate_position`
    fn evaluate_sequence(&self, seq: &[Symbol], begin: usize, end: usize) -> Prob {
        (begin..end).map(|i| self.evaluate_position(seq, i)).product()
    }
    ///
    /// Sample `seq[i]` given `seq[..i]`. `INVALID_SYMBOL` if no symbol can be drawn.
    fn choose_position(&self, rng: &mut dyn RngCore, seq: &[Symbol], i: usize) -> Symbol;
    ///
    /// Sample a whole sequence of the given length, position by position.
    fn choose_sequence(&self, rng: &mut dyn RngCore, length: usize) -> Sequence {
        let mut seq = Vec::with_capacity(length);
        for i in 0..length {
            let symbol = self.choose_position(rng, &seq, i);
            seq.push(symbol);
        }
        seq
    }
    ///
    /// Bind the model to a sequence for range queries.
    fn evaluator<'a>(&'a self, seq: &'a [Symbol], cached: bool) -> Evaluator<'a>
    where
        Self: Sized,
    {
        Evaluator::new(self, seq, cached)
    }
}

/// Shared handle of a model used by several states
pub type ProbabilisticModelPtr = Arc<dyn ProbabilisticModel>;
