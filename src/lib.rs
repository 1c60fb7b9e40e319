//!
//! Generalized hidden Markov models with variable-length Markov chain emissions
//!
pub mod common;
pub mod converter;
pub mod distribution;
pub mod error;
pub mod ghmm;
pub mod model;
pub mod params;
pub mod prelude;
pub mod prob;
pub mod random_seq;

#[macro_use]
extern crate approx;
