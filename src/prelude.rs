//!
//! globally-available parts
//!
pub use crate::common::{Sequence, StateId, Symbol};
pub use crate::error::{ModelError, Result};
pub use crate::ghmm::{Duration, GeneralizedHiddenMarkovModel, State};
pub use crate::model::{
    DiscreteIIDModel, ProbabilisticModel, ProbabilisticModelPtr, VariableLengthMarkovChain,
};
pub use crate::params::GhmmParams;
pub use crate::prob::{p, Prob};
