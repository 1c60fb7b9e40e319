//!
//! Mapping between domain symbols (e.g. `"A"`, `"C"`, `"G"`, `"T"`) and the
//! dense integer symbols the models work on.
//!
use crate::common::{Sequence, Symbol, VALID_BASES};
use crate::error::{ModelError, Result};
use fnv::FnvHashMap;

///
/// Symbol conversion contract
///
/// * `convert(&self, outer) -> Symbol`
///     domain symbol into alphabet index
///
/// * `revert(&self, symbol) -> &str`
///     alphabet index back into the domain symbol
///
pub trait Converter {
    fn convert(&self, outer: &str) -> Result<Symbol>;
    fn revert(&self, symbol: Symbol) -> Result<&str>;
    fn alphabet_size(&self) -> usize;
    ///
    /// Convert every item, failing on the first unknown one.
    fn convert_all<'a, I>(&self, outers: I) -> Result<Sequence>
    where
        I: IntoIterator<Item = &'a str>,
    {
        outers.into_iter().map(|o| self.convert(o)).collect()
    }
    fn revert_all(&self, symbols: &[Symbol]) -> Result<Vec<String>> {
        symbols
            .iter()
            .map(|&s| self.revert(s).map(|o| o.to_string()))
            .collect()
    }
}

/// Converter backed by an ordered list of domain symbols.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<String>,
    index: FnvHashMap<String, Symbol>,
}

impl Alphabet {
    ///
    /// Symbol `i` is `symbols[i]`. Duplicated entries keep their first index.
    ///
    pub fn new<S: AsRef<str>>(symbols: &[S]) -> Self {
        let symbols: Vec<String> = symbols.iter().map(|s| s.as_ref().to_string()).collect();
        let mut index = FnvHashMap::default();
        for (i, s) in symbols.iter().enumerate() {
            index.entry(s.clone()).or_insert(i);
        }
        Alphabet { symbols, index }
    }
    ///
    /// `A=0, C=1, G=2, T=3`
    ///
    pub fn dna() -> Self {
        let bases: Vec<String> = VALID_BASES.iter().map(|&b| (b as char).to_string()).collect();
        Alphabet::new(&bases)
    }
    ///
    /// Convert a byte string such as `b"ACGT"` one character at a time.
    ///
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<Sequence> {
        bytes
            .iter()
            .map(|&b| self.convert(&(b as char).to_string()))
            .collect()
    }
}

impl Converter for Alphabet {
    fn convert(&self, outer: &str) -> Result<Symbol> {
        self.index
            .get(outer)
            .copied()
            .ok_or_else(|| ModelError::UnknownSymbol(outer.to_string()))
    }
    fn revert(&self, symbol: Symbol) -> Result<&str> {
        self.symbols
            .get(symbol)
            .map(|s| s.as_str())
            .ok_or(ModelError::SymbolOutOfRange {
                symbol,
                position: 0,
                alphabet_size: self.symbols.len(),
            })
    }
    fn alphabet_size(&self) -> usize {
        self.symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_alphabet() {
        let a = Alphabet::dna();
        assert_eq!(a.alphabet_size(), 4);
        assert_eq!(a.convert("G").unwrap(), 2);
        assert_eq!(a.revert(3).unwrap(), "T");
        assert_eq!(a.convert_bytes(b"ACGTTA").unwrap(), vec![0, 1, 2, 3, 3, 0]);
        assert!(matches!(a.convert("N"), Err(ModelError::UnknownSymbol(_))));
        assert!(matches!(
            a.revert(4),
            Err(ModelError::SymbolOutOfRange { symbol: 4, .. })
        ));
    }
    #[test]
    fn convert_and_revert_all() {
        let a = Alphabet::new(&["exon", "intron", "intergenic"]);
        let xs = a.convert_all(vec!["intron", "exon", "intergenic"]).unwrap();
        assert_eq!(xs, vec![1, 0, 2]);
        assert_eq!(a.revert_all(&xs).unwrap(), vec!["intron", "exon", "intergenic"]);
    }
}
