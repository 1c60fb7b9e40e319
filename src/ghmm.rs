//!
//! Generalized hidden Markov model
//!
//! # Overview of calculation
//!
//! x = x[0],...,x[n-1] : observations of length n
//!
//! A labeling is cut into segments `[b, e)` of a single state `k`.
//! A segment contributes
//!
//! * a transition term: `initial(k)` if `b == 0`, else `t(p -> k)` from the
//!   state `p` of the previous segment
//! * a duration term `D_k(e - b)`
//! * an emission term `E_k(b, e)` served by the observation model of `k`
//!
//! Forward
//! A[k][i]
//!  = P(emits x[0..=i] and a segment of k ends at i)
//!
//! Backward
//! B[k][i]
//!  = P(emits x[i+1..n] | a segment of k ends at i)
//!
//! Viterbi
//! G[k][i]
//!  = max P(emits x[0..=i] and a segment of k ends at i)
//!
//! Posterior
//! S[k][i]
//!  = P(x[i] is emitted by k | x)
//!  = sum of A B / P(x) over the segments of k covering i
//!
//! Geometric states always have segments of length 1 and express their runs
//! by self-transitions, so for them `S[k][i] = A[k][i] B[k][i] / P(x)`.
//!
pub mod backward;
pub mod common;
pub mod duration;
pub mod emission;
pub mod forward;
pub mod mocks;
pub mod posterior;
pub mod sample;
pub mod segment;
pub mod state;
pub mod viterbi;

pub use backward::BackwardResult;
pub use common::{link_states, GeneralizedHiddenMarkovModel};
pub use duration::Duration;
pub use forward::ForwardResult;
pub use posterior::PosteriorResult;
pub use sample::Labeling;
pub use segment::Segment;
pub use state::State;
pub use viterbi::ViterbiResult;
