/*!

The Witten-Neal-Cleary integer arithmetic coder core, shared by the
encoder and the decoder.

`CoderState` holds the `low`/`high` range bounds and the derived constants
of the range-coding invariants; `ArithmeticCoderCore::update` implements the shared
E1/E2/E3 renormalization, deferring the parts that differ between encoding
and decoding (`shift`/`underflow`) to the implementor.

*/

use log::trace;
use num_integer::Integer;

use crate::entropy::freq::FrequencyTable;
use crate::error::{Error, Result};

/// Range-narrowing state shared by `ArithmeticEncoder` and
/// `ArithmeticDecoder`. The decoder additionally keeps a `code` window
/// outside this struct, since only the decoder needs one.
#[derive(Debug)]
pub struct CoderState {
    pub(crate) low: u64,
    pub(crate) high: u64,
    num_state_bits: u32,
    pub(crate) full_range: u64,
    pub(crate) half_range: u64,
    pub(crate) quarter_range: u64,
    pub(crate) minimum_range: u64,
    pub(crate) maximum_total: u64,
    pub(crate) state_mask: u64,
}

impl CoderState {
    /// `num_state_bits` used unless a caller asks for a different width.
    pub const DEFAULT_STATE_BITS: u32 = 32;

    /// Builds the initial coder state for a given `num_state_bits`.
    ///
    /// `num_state_bits` must be in `1..=32`: the coder narrows ranges with
    /// products of two `num_state_bits`-wide values, and this crate does
    /// the arithmetic in `u64` rather than reaching for a big-integer type,
    /// so anything wider risks overflow (see the design notes on
    /// arbitrary-precision arithmetic).
    pub fn new(num_state_bits: u32) -> Result<Self> {
        if !(1..=32).contains(&num_state_bits) {
            return Err(Error::InvalidArgument(format!(
                "num_state_bits must be in 1..=32, got {num_state_bits}"
            )));
        }
        let full_range = 1u64 << num_state_bits;
        let half_range = full_range >> 1;
        let quarter_range = half_range >> 1;
        let minimum_range = quarter_range + 2;
        let maximum_total = minimum_range;
        let state_mask = full_range - 1;
        Ok(CoderState {
            low: 0,
            high: state_mask,
            num_state_bits,
            full_range,
            half_range,
            quarter_range,
            minimum_range,
            maximum_total,
            state_mask,
        })
    }

    /// Number of bits used to represent `low`/`high`.
    pub fn num_state_bits(&self) -> u32 {
        self.num_state_bits
    }

    /// `1 << num_state_bits`.
    pub fn full_range(&self) -> u64 {
        self.full_range
    }

    /// The largest total a `FrequencyTable` may report while coding.
    pub fn maximum_total(&self) -> u64 {
        self.maximum_total
    }

    /// Current lower bound of the coding range.
    pub fn low(&self) -> u64 {
        self.low
    }

    /// Current upper bound of the coding range.
    pub fn high(&self) -> u64 {
        self.high
    }
}

/// Shared state-machine behavior of an arithmetic coder.
///
/// `shift` and `underflow` are the only points where the encoder and
/// decoder diverge: the encoder emits bits on `shift` and counts
/// deferred underflow bits, while the decoder shifts fresh bits into its
/// `code` window at both points.
pub trait ArithmeticCoderCore {
    /// Mutable access to the shared range state.
    fn coder_state(&mut self) -> &mut CoderState;

    /// Called when the top bit of `low` and `high` have become equal.
    fn shift(&mut self) -> Result<()>;

    /// Called when `low` and `high` straddle the middle two quarters.
    fn underflow(&mut self) -> Result<()>;

    /// Narrows `[low, high]` to the sub-interval of `symbol` under `freqs`,
    /// renormalizing via `shift`/`underflow` until the range invariants
    /// hold again.
    fn update<T: FrequencyTable + ?Sized>(&mut self, freqs: &T, symbol: usize) -> Result<()> {
        let (low, range) = {
            let st = self.coder_state();
            if !(st.low < st.high && (st.low & st.state_mask) == st.low && (st.high & st.state_mask) == st.high) {
                return Err(Error::ContractViolation("low or high out of range".into()));
            }
            let range = st.high - st.low + 1;
            if !(st.minimum_range <= range && range <= st.full_range) {
                return Err(Error::ContractViolation("range out of range".into()));
            }
            (st.low, range)
        };

        let total = freqs.total();
        let sym_low = freqs.low(symbol);
        let sym_high = freqs.high(symbol);
        if sym_low == sym_high {
            return Err(Error::InvalidSymbol(format!("symbol {symbol} has zero frequency")));
        }
        let max_total = self.coder_state().maximum_total;
        if total > max_total {
            return Err(Error::TotalTooLarge { total, max: max_total });
        }
        if total == 0 {
            return Err(Error::ContractViolation("frequency table total is zero".into()));
        }

        let new_low = low + (sym_low * range).div_floor(&total);
        let new_high = low + (sym_high * range).div_floor(&total) - 1;
        trace!("update: symbol={symbol} narrowed range to [{new_low}, {new_high}]");
        {
            let st = self.coder_state();
            st.low = new_low;
            st.high = new_high;
        }

        // E1/E2: the top bit of low and high agree, so it is now fixed and
        // can be shifted out.
        loop {
            let (done, mask) = {
                let st = self.coder_state();
                (((st.low ^ st.high) & st.half_range) != 0, st.state_mask)
            };
            if done {
                break;
            }
            self.shift()?;
            let st = self.coder_state();
            st.low = (st.low << 1) & mask;
            st.high = ((st.high << 1) & mask) | 1;
        }

        // E3: low and high straddle the middle two quarters; defer a bit
        // until the next shift resolves which half it belongs to.
        loop {
            let straddling = {
                let st = self.coder_state();
                (st.low & !st.high & st.quarter_range) != 0
            };
            if !straddling {
                break;
            }
            self.underflow()?;
            let st = self.coder_state();
            st.low = (st.low << 1) ^ st.half_range;
            st.high = ((st.high ^ st.half_range) << 1) | st.half_range | 1;
        }

        Ok(())
    }
}
