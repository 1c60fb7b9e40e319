//! Error types for model construction and inference.

use crate::common::{StateId, Symbol};
use thiserror::Error;

/// Errors that can occur while building or querying models.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A symbol outside of the model alphabet was found in the input
    #[error("symbol {symbol} at position {position} is outside the alphabet of size {alphabet_size}")]
    SymbolOutOfRange {
        symbol: Symbol,
        position: usize,
        alphabet_size: usize,
    },

    /// A range query outside of the bound sequence
    #[error("range [{begin}, {end}) is outside the sequence of length {length}")]
    RangeOutOfBounds {
        begin: usize,
        end: usize,
        length: usize,
    },

    /// The converter does not know this symbol
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    /// An adjacency list points to a state that does not exist
    #[error("state {state} refers to missing state {target}")]
    MissingState { state: StateId, target: StateId },

    /// State vector is not indexed by state id
    #[error("state at index {index} has id {id}")]
    StateIdMismatch { index: usize, id: StateId },

    /// A distribution has the wrong number of symbols
    #[error("{what}: expected alphabet of size {expected}, got {actual}")]
    AlphabetMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Probabilities that cannot be normalized
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    /// Linking context nodes would break the tree shape
    #[error("invalid context tree: {0}")]
    InvalidTree(String),

    /// Inference parameters out of their domain
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Duration with no admissible length
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Observation and label sequences differ in length
    #[error("observation length {observations} does not match label length {labels}")]
    LengthMismatch { observations: usize, labels: usize },

    /// No path through the model can emit the sequence
    #[error("sequence has zero probability under the model")]
    ImpossibleSequence,

    /// Sampling could not produce a symbol
    #[error("sampling failed: {0}")]
    Sampling(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
