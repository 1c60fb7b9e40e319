//!
//! Primitive types shared by every model
//!

/// Index of a symbol in a finite alphabet `0..alphabet_size`
pub type Symbol = usize;

/// Sentinel meaning "no symbol", returned when a symbol cannot be produced.
pub const INVALID_SYMBOL: Symbol = usize::MAX;

/// Ordered sequence of symbols, 0-indexed.
pub type Sequence = Vec<Symbol>;

/// Type of multiple sequences, e.g. training set.
pub type Sequences = Vec<Sequence>;

/// Identifier of a GHMM state, equal to its index in the model's state vector.
pub type StateId = usize;

///
/// Array of valid DNA bases
///
pub const VALID_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Convert Sequence into a printable string like `"0 1 1 0"`
/// useful in displaying
pub fn sequence_to_string(seq: &[Symbol]) -> String {
    seq.iter()
        .map(|s| {
            if *s == INVALID_SYMBOL {
                "-".to_string()
            } else {
                s.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Position of the first symbol that is not in `0..alphabet_size`, if any.
pub fn find_invalid_symbol(seq: &[Symbol], alphabet_size: usize) -> Option<(usize, Symbol)> {
    seq.iter()
        .enumerate()
        .find(|(_, &s)| s >= alphabet_size)
        .map(|(i, &s)| (i, s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_display() {
        assert_eq!(sequence_to_string(&[0, 1, 3]), "0 1 3");
        assert_eq!(sequence_to_string(&[0, INVALID_SYMBOL]), "0 -");
        assert_eq!(sequence_to_string(&[]), "");
    }
    #[test]
    fn invalid_symbol_search() {
        assert_eq!(find_invalid_symbol(&[0, 1, 2], 3), None);
        assert_eq!(find_invalid_symbol(&[0, 4, 7], 3), Some((1, 4)));
        assert_eq!(find_invalid_symbol(&[INVALID_SYMBOL], 3), Some((0, INVALID_SYMBOL)));
    }
}
