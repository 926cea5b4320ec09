use std::cell::RefCell;

use super::{FrequencyTable, MutableFrequencyTable};
use crate::error::{Error, Result};

/// A mutable table of symbol frequencies backed by a plain array.
///
/// The number of symbols is fixed at construction. `increment`/`set` run in
/// O(1) and mark the cumulative-prefix cache stale; `low`/`high` rebuild
/// that cache in O(`symbol_limit`) on the next call after a mutation, and
/// are O(1) otherwise. A Fenwick tree would make both O(log n), but is not
/// needed at the sizes this crate deals with (at most 257 symbols).
pub struct SimpleFrequencyTable {
    frequencies: Vec<u64>,
    total: u64,
    cumulative: RefCell<Option<Vec<u64>>>,
}

impl SimpleFrequencyTable {
    /// Builds a table from an explicit per-symbol frequency list. At least
    /// one symbol is required.
    pub fn new(frequencies: Vec<u64>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(Error::InvalidArgument("at least one symbol is required".into()));
        }
        let total = frequencies.iter().sum();
        Ok(SimpleFrequencyTable { frequencies, total, cumulative: RefCell::new(None) })
    }

    /// Builds a table by copying an existing one.
    pub fn from_table<T: FrequencyTable + ?Sized>(table: &T) -> Result<Self> {
        let frequencies = (0..table.symbol_limit()).map(|s| table.get(s)).collect();
        Self::new(frequencies)
    }

    fn check_symbol(&self, symbol: usize) -> Result<()> {
        if symbol >= self.frequencies.len() {
            return Err(Error::InvalidArgument(format!(
                "symbol {symbol} out of range [0, {})",
                self.frequencies.len()
            )));
        }
        Ok(())
    }

    fn rebuild_cumulative(&self) -> Vec<u64> {
        let mut cumul = Vec::with_capacity(self.frequencies.len() + 1);
        let mut sum = 0u64;
        cumul.push(0);
        for &freq in &self.frequencies {
            sum += freq;
            cumul.push(sum);
        }
        debug_assert_eq!(sum, self.total);
        cumul
    }

    fn cumulative_at(&self, index: usize) -> u64 {
        let mut cache = self.cumulative.borrow_mut();
        if cache.is_none() {
            *cache = Some(self.rebuild_cumulative());
        }
        cache.as_ref().expect("just populated")[index]
    }
}

impl FrequencyTable for SimpleFrequencyTable {
    fn symbol_limit(&self) -> usize {
        self.frequencies.len()
    }

    fn get(&self, symbol: usize) -> u64 {
        self.frequencies[symbol]
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn low(&self, symbol: usize) -> u64 {
        self.cumulative_at(symbol)
    }

    fn high(&self, symbol: usize) -> u64 {
        self.cumulative_at(symbol + 1)
    }
}

impl MutableFrequencyTable for SimpleFrequencyTable {
    fn set(&mut self, symbol: usize, freq: u64) -> Result<()> {
        self.check_symbol(symbol)?;
        let old = self.frequencies[symbol];
        self.total = self.total - old + freq;
        self.frequencies[symbol] = freq;
        *self.cumulative.get_mut() = None;
        Ok(())
    }

    fn increment(&mut self, symbol: usize) -> Result<()> {
        self.check_symbol(symbol)?;
        self.frequencies[symbol] += 1;
        self.total += 1;
        *self.cumulative.get_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_worked_example_from_the_spec() {
        let mut t = SimpleFrequencyTable::new(vec![3, 1, 4, 1, 5]).unwrap();
        assert_eq!(t.total(), 14);
        assert_eq!(t.low(2), 4);
        assert_eq!(t.high(2), 8);

        t.increment(2).unwrap();
        assert_eq!(t.total(), 15);
        assert_eq!(t.low(2), 4);
        assert_eq!(t.high(2), 9);
        assert_eq!(t.low(3), 9);
    }

    #[test]
    fn set_updates_total_and_invalidates_cache() {
        let mut t = SimpleFrequencyTable::new(vec![1, 1, 1]).unwrap();
        assert_eq!(t.high(2), 3);
        t.set(0, 10).unwrap();
        assert_eq!(t.total(), 12);
        assert_eq!(t.low(1), 10);
    }

    #[test]
    fn rejects_out_of_range_mutation() {
        let mut t = SimpleFrequencyTable::new(vec![1, 1]).unwrap();
        assert!(t.increment(2).is_err());
        assert!(t.set(5, 0).is_err());
    }

    #[test]
    fn from_table_copies_a_flat_table() {
        let flat = super::super::FlatFrequencyTable::new(4).unwrap();
        let copy = SimpleFrequencyTable::from_table(&flat).unwrap();
        assert_eq!(copy.total(), 4);
        assert_eq!(copy.high(3), 4);
    }
}
