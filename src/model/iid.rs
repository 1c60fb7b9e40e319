//!
//! Discrete IID model, a categorical distribution over symbols
//!
//! Used as emission model, as transition distribution of GHMM states
//! (symbols are state ids), as initial state distribution and as length
//! distribution of explicit durations (symbols are lengths).
//!
use super::ProbabilisticModel;
use crate::common::{Sequence, Symbol, INVALID_SYMBOL};
use crate::distribution::normal_bin;
use crate::error::{ModelError, Result};
use crate::prob::Prob;
use rand::prelude::*;

///
/// pick randomly from the choices with its own probability.
/// `None` if every choice has probability zero.
///
pub fn pick_with_prob<R: Rng + ?Sized, T: Copy>(rng: &mut R, choices: &[(T, Prob)]) -> Option<T> {
    choices
        .choose_weighted(rng, |item| item.1.to_value())
        .ok()
        .map(|item| item.0)
}

/// Categorical distribution stored as per-symbol log probabilities
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteIIDModel {
    probs: Vec<Prob>,
}

impl DiscreteIIDModel {
    ///
    /// Create from linear-space weights, normalizing them to sum to one.
    ///
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(ModelError::InvalidDistribution(
                "empty distribution".to_string(),
            ));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ModelError::InvalidDistribution(format!(
                "weight {} is not a finite non-negative number",
                w
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(ModelError::InvalidDistribution(
                "weights sum to zero".to_string(),
            ));
        }
        Ok(DiscreteIIDModel {
            probs: weights
                .into_iter()
                .map(|w| Prob::from_prob(w / total))
                .collect(),
        })
    }
    ///
    /// Create from log probabilities that are already normalized.
    ///
    pub fn from_log_probabilities(probs: Vec<Prob>) -> Self {
        DiscreteIIDModel { probs }
    }
    ///
    /// `p(s) = 1/n` for all `s` in `0..n`
    ///
    pub fn uniform(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ModelError::InvalidDistribution(
                "uniform over an empty alphabet".to_string(),
            ));
        }
        Ok(DiscreteIIDModel {
            probs: vec![Prob::from_prob(1.0 / n as f64); n],
        })
    }
    ///
    /// `p(s) = (count(s) + pseudocounts) / (total + pseudocounts * n)`
    ///
    pub fn from_counts(counts: &[f64], pseudocounts: f64) -> Result<Self> {
        DiscreteIIDModel::new(counts.iter().map(|c| c + pseudocounts).collect())
    }
    ///
    /// Maximum likelihood estimate from training sequences, with pseudocounts.
    ///
    pub fn train_ml(sequences: &[Sequence], alphabet_size: usize, pseudocounts: f64) -> Result<Self> {
        let mut counts = vec![0.0; alphabet_size];
        for (position, &symbol) in sequences.iter().flatten().enumerate() {
            if symbol >= alphabet_size {
                return Err(ModelError::SymbolOutOfRange {
                    symbol,
                    position,
                    alphabet_size,
                });
            }
            counts[symbol] += 1.0;
        }
        DiscreteIIDModel::from_counts(&counts, pseudocounts)
    }
    ///
    /// Histogram of `values` over `0..=max_value`, each observation spread
    /// with a discretised normal kernel of standard deviation `bandwidth`.
    /// A non-positive bandwidth gives the plain histogram.
    ///
    /// Used to estimate explicit duration distributions from observed lengths.
    ///
    pub fn smoothed_histogram(values: &[usize], max_value: usize, bandwidth: f64) -> Result<Self> {
        let mut weights = vec![0.0; max_value + 1];
        for &v in values {
            if bandwidth > 0.0 {
                for (x, w) in weights.iter_mut().enumerate() {
                    *w += normal_bin(x, v as f64, bandwidth);
                }
            } else if v <= max_value {
                weights[v] += 1.0;
            }
        }
        DiscreteIIDModel::new(weights)
    }
    ///
    /// log probability of the symbol, zero if the symbol is not in the alphabet
    ///
    pub fn probability_of(&self, symbol: Symbol) -> Prob {
        self.probs.get(symbol).copied().unwrap_or_else(Prob::zero)
    }
    pub fn log_probabilities(&self) -> &[Prob] {
        &self.probs
    }
    ///
    /// Sample a symbol. `INVALID_SYMBOL` if the distribution has no mass.
    ///
    pub fn choose(&self, rng: &mut dyn RngCore) -> Symbol {
        let choices: Vec<(Symbol, Prob)> = self.probs.iter().copied().enumerate().collect();
        pick_with_prob(rng, &choices).unwrap_or(INVALID_SYMBOL)
    }
    ///
    /// The same distribution with `symbol` removed and the rest renormalized.
    ///
    pub fn without_symbol(&self, symbol: Symbol) -> Result<Self> {
        if self.probability_of(symbol).is_zero() {
            return Ok(self.clone());
        }
        let weights = self
            .probs
            .iter()
            .enumerate()
            .map(|(s, p)| if s == symbol { 0.0 } else { p.to_value() })
            .collect();
        DiscreteIIDModel::new(weights)
    }
    ///
    /// sum of linear probabilities, 1 for a normalized distribution
    ///
    pub fn total(&self) -> f64 {
        self.probs.iter().map(|p| p.to_value()).sum()
    }
}

impl ProbabilisticModel for DiscreteIIDModel {
    fn alphabet_size(&self) -> usize {
        self.probs.len()
    }
    fn evaluate_position(&self, seq: &[Symbol], i: usize) -> Prob {
        match seq.get(i) {
            Some(&symbol) => self.probability_of(symbol),
            None => Prob::zero(),
        }
    }
    fn choose_position(&self, rng: &mut dyn RngCore, _seq: &[Symbol], _i: usize) -> Symbol {
        self.choose(rng)
    }
}

impl std::fmt::Display for DiscreteIIDModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let body: Vec<String> = self
            .probs
            .iter()
            .enumerate()
            .map(|(s, p)| format!("{}: {:.4}", s, p.to_value()))
            .collect();
        write!(f, "{{{}}}", body.join(", "))
    }
}
