use super::FrequencyTable;

/// Wraps a `FrequencyTable` and re-verifies every precondition and
/// postcondition around each delegated call, panicking on the first
/// violation.
///
/// Used by `ArithmeticEncoder::write`/`ArithmeticDecoder::read` in debug
/// builds. A violation here means the supplied `FrequencyTable`
/// implementation is broken, not that the input stream is malformed, so
/// panicking (rather than returning a `Result`) matches how this crate
/// treats out-of-range symbol access elsewhere (see `FlatFrequencyTable`).
pub struct CheckedFrequencyTable<'a, T: ?Sized> {
    inner: &'a T,
}

impl<'a, T: FrequencyTable + ?Sized> CheckedFrequencyTable<'a, T> {
    /// Wraps `inner` for validated access.
    pub fn new(inner: &'a T) -> Self {
        CheckedFrequencyTable { inner }
    }

    fn in_range(&self, symbol: usize) -> bool {
        symbol < self.inner.symbol_limit()
    }
}

impl<'a, T: FrequencyTable + ?Sized> FrequencyTable for CheckedFrequencyTable<'a, T> {
    fn symbol_limit(&self) -> usize {
        let n = self.inner.symbol_limit();
        assert!(n > 0, "contract violation: non-positive symbol limit");
        n
    }

    fn get(&self, symbol: usize) -> u64 {
        assert!(self.in_range(symbol), "contract violation: symbol {symbol} out of range");
        self.inner.get(symbol)
    }

    fn total(&self) -> u64 {
        self.inner.total()
    }

    fn low(&self, symbol: usize) -> u64 {
        assert!(self.in_range(symbol), "contract violation: symbol {symbol} out of range");
        let low = self.inner.low(symbol);
        let high = self.inner.high(symbol);
        assert!(
            low <= high && high <= self.inner.total(),
            "contract violation: low/high/total out of order for symbol {symbol}"
        );
        low
    }

    fn high(&self, symbol: usize) -> u64 {
        assert!(self.in_range(symbol), "contract violation: symbol {symbol} out of range");
        let low = self.inner.low(symbol);
        let high = self.inner.high(symbol);
        assert!(
            low <= high && high <= self.inner.total(),
            "contract violation: low/high/total out of order for symbol {symbol}"
        );
        high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::freq::SimpleFrequencyTable;

    #[test]
    fn delegates_to_a_well_behaved_table() {
        let t = SimpleFrequencyTable::new(vec![3, 1, 4, 1, 5]).unwrap();
        let c = CheckedFrequencyTable::new(&t);
        assert_eq!(c.total(), 14);
        assert_eq!(c.low(2), 4);
        assert_eq!(c.high(2), 8);
    }

    #[test]
    #[should_panic]
    fn panics_on_out_of_range_symbol() {
        let t = SimpleFrequencyTable::new(vec![1, 1]).unwrap();
        let c = CheckedFrequencyTable::new(&t);
        c.get(2);
    }
}
