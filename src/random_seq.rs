use crate::common::{Sequence, Symbol};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// generate uniformly random symbols in `0..alphabet_size` of given length from seed
///
pub fn generate(length: usize, alphabet_size: usize, seed: u64) -> Sequence {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    generate_with(&mut rng, length, alphabet_size)
}

///
/// generate with the given rng
///
pub fn generate_with<R: Rng>(rng: &mut R, length: usize, alphabet_size: usize) -> Sequence {
    assert!(alphabet_size > 0);
    (0..length)
        .map(|_| rng.gen_range(0..alphabet_size) as Symbol)
        .collect()
}
