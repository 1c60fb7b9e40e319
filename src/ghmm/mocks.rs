//!
//! Mock GHMMs for testing
//!
use super::common::{link_states, GeneralizedHiddenMarkovModel};
use super::duration::Duration;
use super::state::State;
use crate::error::Result;
use crate::model::{
    ContextTree, DiscreteIIDModel, ProbabilisticModelPtr, VariableLengthMarkovChain,
};
use crate::params::GhmmParams;
use std::sync::Arc;

///
/// Dishonest casino
///
/// ```text
///          .95           .9
///         /---\        /---\
///         v   |  .05   v   |
///        fair -------> loaded
///             <-------
///                .1
/// ```
///
/// * `fair` (0) rolls a uniform die
/// * `loaded` (1) rolls `5` with probability .5 and the other faces with .1
/// * both states are geometric, initial distribution is uniform
///
pub fn mock_casino(params: GhmmParams) -> Result<GeneralizedHiddenMarkovModel> {
    let fair: ProbabilisticModelPtr = Arc::new(DiscreteIIDModel::uniform(6)?);
    let loaded: ProbabilisticModelPtr =
        Arc::new(DiscreteIIDModel::new(vec![0.1, 0.1, 0.1, 0.1, 0.1, 0.5])?);
    let mut states = vec![
        State::new(
            0,
            "fair",
            fair,
            Arc::new(DiscreteIIDModel::new(vec![0.95, 0.05])?),
            Duration::Geometric,
        ),
        State::new(
            1,
            "loaded",
            loaded,
            Arc::new(DiscreteIIDModel::new(vec![0.1, 0.9])?),
            Duration::Geometric,
        ),
    ];
    link_states(&mut states);
    GeneralizedHiddenMarkovModel::new(
        states,
        Arc::new(DiscreteIIDModel::new(vec![0.5, 0.5])?),
        6,
        params,
    )
}

///
/// Order-1 VLMC over `{0, 1}`
///
/// * root: `{.5, .5}`
/// * after `1`: `{.21, .79}`
/// * after `0`: `{.2, .8}`
///
pub fn mock_vlmc() -> Result<VariableLengthMarkovChain> {
    let mut tree = ContextTree::new(2);
    tree.set_distribution(0, DiscreteIIDModel::new(vec![0.5, 0.5])?)?;
    let a = tree.create_context();
    tree.set_child(0, a, 1)?;
    tree.set_distribution(a, DiscreteIIDModel::new(vec![0.21, 0.79])?)?;
    let b = tree.create_context();
    tree.set_child(0, b, 0)?;
    tree.set_distribution(b, DiscreteIIDModel::new(vec![0.2, 0.8])?)?;
    Ok(VariableLengthMarkovChain::new(tree))
}

///
/// Gene-like model over `{0, 1}` mixing every duration law
///
/// * `exon` (0): VLMC emission, explicit duration on `1..=5`,
///   goes to `intergenic` (.7) or `signal` (.3)
/// * `intergenic` (1): IID emission, geometric, stays with .8,
///   goes to `exon` with .2
/// * `signal` (2): IID emission, signal of length 2, goes to `intergenic`
///
/// `exon` is given a self-transition mass that the model construction removes.
///
pub fn mock_mixed(params: GhmmParams) -> Result<GeneralizedHiddenMarkovModel> {
    let vlmc: ProbabilisticModelPtr = Arc::new(mock_vlmc()?);
    let background: ProbabilisticModelPtr = Arc::new(DiscreteIIDModel::new(vec![0.6, 0.4])?);
    let site: ProbabilisticModelPtr = Arc::new(DiscreteIIDModel::new(vec![0.3, 0.7])?);
    let lengths = Arc::new(DiscreteIIDModel::new(vec![0.0, 0.1, 0.2, 0.3, 0.2, 0.2])?);
    let mut states = vec![
        State::new(
            0,
            "exon",
            vlmc,
            Arc::new(DiscreteIIDModel::new(vec![0.2, 0.56, 0.24])?),
            Duration::explicit(lengths),
        ),
        State::new(
            1,
            "intergenic",
            background,
            Arc::new(DiscreteIIDModel::new(vec![0.2, 0.8, 0.0])?),
            Duration::Geometric,
        ),
        State::new(
            2,
            "signal",
            site,
            Arc::new(DiscreteIIDModel::new(vec![0.0, 1.0, 0.0])?),
            Duration::Signal(2),
        ),
    ];
    link_states(&mut states);
    GeneralizedHiddenMarkovModel::new(
        states,
        Arc::new(DiscreteIIDModel::new(vec![0.3, 0.6, 0.1])?),
        2,
        params,
    )
}
