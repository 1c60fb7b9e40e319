//!
//! Sampling labeled sequences from the GHMM
//!
use super::common::GeneralizedHiddenMarkovModel;
use super::segment::Segment;
use crate::common::{Sequence, StateId, INVALID_SYMBOL};
use crate::error::{ModelError, Result};
use rand::RngCore;

///
/// Observations and the states that emitted them
///
#[derive(Debug, Clone, PartialEq)]
pub struct Labeling {
    pub observations: Sequence,
    pub labels: Vec<StateId>,
}

impl Labeling {
    pub fn len(&self) -> usize {
        self.observations.len()
    }
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
    pub fn segments(&self) -> Vec<Segment> {
        Segment::read_sequence(&self.labels)
    }
}

impl GeneralizedHiddenMarkovModel {
    ///
    /// Sample `length` observations with their labels.
    ///
    /// States are drawn from the initial distribution and then from the
    /// transition of the current state, segment lengths from the duration
    /// law. Symbols are drawn by the observation model given all symbols
    /// emitted so far. The last segment is cut at `length`.
    ///
    pub fn choose(&self, rng: &mut dyn RngCore, length: usize) -> Result<Labeling> {
        let mut observations = Vec::with_capacity(length);
        let mut labels = Vec::with_capacity(length);
        if length == 0 {
            return Ok(Labeling {
                observations,
                labels,
            });
        }
        let mut k = self.initial().choose(rng);
        loop {
            if k == INVALID_SYMBOL || k >= self.n_states() {
                return Err(ModelError::Sampling(
                    "cannot draw the next state".to_string(),
                ));
            }
            let state = self.state(k);
            let d = state.duration().choose(rng).ok_or_else(|| {
                ModelError::Sampling(format!("cannot draw a duration of state {}", state.name()))
            })?;
            for _ in 0..d {
                let i = observations.len();
                let symbol = state.observation().choose_position(rng, &observations, i);
                if symbol == INVALID_SYMBOL {
                    return Err(ModelError::Sampling(format!(
                        "cannot draw a symbol from state {}",
                        state.name()
                    )));
                }
                observations.push(symbol);
                labels.push(k);
                if observations.len() == length {
                    return Ok(Labeling {
                        observations,
                        labels,
                    });
                }
            }
            k = state.transition().choose(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghmm::mocks::{mock_casino, mock_mixed};
    use crate::params::GhmmParams;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn choose_casino() {
        let ghmm = mock_casino(GhmmParams::default()).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let s = ghmm.choose(&mut rng, 200).unwrap();
        assert_eq!(s.len(), 200);
        assert_eq!(s.labels.len(), 200);
        assert!(s.observations.iter().all(|&x| x < 6));
        let p = ghmm.evaluate(&s.observations, &s.labels).unwrap();
        assert!(!p.is_zero());
    }
    #[test]
    fn choose_mixed_respects_durations() {
        let ghmm = mock_mixed(GhmmParams::default()).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let s = ghmm.choose(&mut rng, 300).unwrap();
        let segments = s.segments();
        // the last segment may be cut
        for segment in segments[..segments.len() - 1].iter() {
            match segment.state {
                0 => assert!((1..=5).contains(&segment.len())),
                2 => assert_eq!(segment.len(), 2),
                _ => {}
            }
        }
    }
    #[test]
    fn choose_is_reproducible() {
        let ghmm = mock_mixed(GhmmParams::default()).unwrap();
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(0);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(0);
        assert_eq!(
            ghmm.choose(&mut rng1, 50).unwrap(),
            ghmm.choose(&mut rng2, 50).unwrap()
        );
        assert!(ghmm.choose(&mut rng1, 0).unwrap().is_empty());
    }
}
