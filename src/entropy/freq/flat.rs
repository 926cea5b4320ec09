use super::FrequencyTable;
use crate::error::{Error, Result};

/// An immutable frequency table where every symbol has frequency 1.
///
/// Useful as the universal fallback model: PPM's order `-1` context and
/// the adaptive front-end's initial distribution are both a `FlatFrequencyTable`.
pub struct FlatFrequencyTable {
    num_symbols: usize,
}

impl FlatFrequencyTable {
    /// Builds a flat table over `num_symbols` symbols, each with frequency 1.
    pub fn new(num_symbols: usize) -> Result<Self> {
        if num_symbols < 1 {
            return Err(Error::InvalidArgument("number of symbols must be positive".into()));
        }
        Ok(FlatFrequencyTable { num_symbols })
    }

    fn check_symbol(&self, symbol: usize) {
        assert!(symbol < self.num_symbols, "symbol {symbol} out of range [0, {})", self.num_symbols);
    }
}

impl FrequencyTable for FlatFrequencyTable {
    fn symbol_limit(&self) -> usize {
        self.num_symbols
    }

    fn get(&self, symbol: usize) -> u64 {
        self.check_symbol(symbol);
        1
    }

    fn total(&self) -> u64 {
        self.num_symbols as u64
    }

    fn low(&self, symbol: usize) -> u64 {
        self.check_symbol(symbol);
        symbol as u64
    }

    fn high(&self, symbol: usize) -> u64 {
        self.check_symbol(symbol);
        symbol as u64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_table_matches_its_contract() {
        let t = FlatFrequencyTable::new(5).unwrap();
        assert_eq!(t.total(), 5);
        for s in 0..5 {
            assert_eq!(t.get(s), 1);
            assert_eq!(t.low(s), s as u64);
            assert_eq!(t.high(s), s as u64 + 1);
        }
    }

    #[test]
    fn rejects_zero_symbols() {
        assert!(FlatFrequencyTable::new(0).is_err());
    }

    #[test]
    #[should_panic]
    fn panics_on_out_of_range_symbol() {
        let t = FlatFrequencyTable::new(3).unwrap();
        t.get(3);
    }
}
