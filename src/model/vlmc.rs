//!
//! Variable-length Markov chain (VLMC)
//!
//! `P(x[i] | x[..i])` is given by the distribution of the deepest context
//! of the tree matching a suffix of `x[..i]`. Ties are purely structural:
//! the longest present suffix wins regardless of its probability mass.
//!
use super::context_tree::ContextTree;
use super::{DiscreteIIDModel, ProbabilisticModel};
use crate::common::{Sequence, Symbol, INVALID_SYMBOL};
use crate::error::Result;
use crate::prob::Prob;
use log::info;
use rand::RngCore;

#[derive(Debug, Clone)]
pub struct VariableLengthMarkovChain {
    tree: ContextTree,
}

impl VariableLengthMarkovChain {
    pub fn new(tree: ContextTree) -> Self {
        VariableLengthMarkovChain { tree }
    }
    pub fn tree(&self) -> &ContextTree {
        &self.tree
    }
    ///
    /// longest context length used by this chain
    ///
    pub fn order(&self) -> usize {
        self.tree.depth()
    }
    ///
    /// A usable chain has a distribution at the root, so that every
    /// position has a context.
    ///
    pub fn is_valid(&self) -> bool {
        self.tree.root().distribution().is_some()
    }
    ///
    /// Context algorithm: count contexts up to `max_order`, prune leaves whose
    /// likelihood gain is below `delta`, then normalize with pseudocounts.
    ///
    pub fn train_context_algorithm(
        sequences: &[Sequence],
        alphabet_size: usize,
        max_order: usize,
        delta: f64,
        pseudocounts: f64,
    ) -> Result<Self> {
        let mut tree = ContextTree::count(alphabet_size, sequences, max_order)?;
        tree.prune(delta);
        tree.normalize(pseudocounts)?;
        info!(
            "trained vlmc with context algorithm: {} contexts, order {}",
            tree.len(),
            tree.depth()
        );
        Ok(VariableLengthMarkovChain::new(tree))
    }
    ///
    /// Fixed-order Markov chain of order `order`, optionally blended with
    /// an a-priori model of weight `prior_weight`.
    ///
    pub fn train_fixed_length(
        sequences: &[Sequence],
        alphabet_size: usize,
        order: usize,
        pseudocounts: f64,
        prior: Option<(&dyn ProbabilisticModel, f64)>,
    ) -> Result<Self> {
        let mut tree = ContextTree::count(alphabet_size, sequences, order)?;
        match prior {
            Some((model, weight)) => tree.normalize_with_prior(model, weight)?,
            None => tree.normalize(pseudocounts)?,
        }
        info!("trained fixed order {} markov chain: {} contexts", order, tree.len());
        Ok(VariableLengthMarkovChain::new(tree))
    }
    ///
    /// Interpolated Markov chain: every context is smoothed towards its
    /// shorter context, the more so the fewer observations it has.
    /// Contexts seen less than `min_count` times are dropped first.
    ///
    pub fn train_interpolated(
        sequences: &[Sequence],
        alphabet_size: usize,
        order: usize,
        weight: f64,
        min_count: f64,
    ) -> Result<Self> {
        let mut tree = ContextTree::count(alphabet_size, sequences, order)?;
        tree.prune_rare(min_count);
        tree.interpolate(weight)?;
        info!("trained interpolated markov chain: {} contexts", tree.len());
        Ok(VariableLengthMarkovChain::new(tree))
    }
    ///
    /// Distribution used to predict position `i`
    ///
    pub fn distribution_at(&self, seq: &[Symbol], i: usize) -> Option<&DiscreteIIDModel> {
        self.tree
            .get_context(seq, i)
            .and_then(|node| node.distribution())
    }
}

impl ProbabilisticModel for VariableLengthMarkovChain {
    fn alphabet_size(&self) -> usize {
        self.tree.alphabet_size()
    }
    fn evaluate_position(&self, seq: &[Symbol], i: usize) -> Prob {
        match (seq.get(i), self.distribution_at(seq, i)) {
            (Some(&symbol), Some(distribution)) => distribution.probability_of(symbol),
            _ => Prob::zero(),
        }
    }
    fn choose_position(&self, rng: &mut dyn RngCore, seq: &[Symbol], i: usize) -> Symbol {
        match self.distribution_at(seq, i) {
            Some(distribution) => distribution.choose(rng),
            None => INVALID_SYMBOL,
        }
    }
}
