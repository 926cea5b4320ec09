/*!

Reads an arithmetic-coded bit stream and decodes symbols against
caller-supplied frequency tables.

*/

use std::io::Read;

use num_integer::Integer;

use crate::entropy::bitstream::BitReader;
use crate::entropy::coder::{ArithmeticCoderCore, CoderState};
use crate::entropy::freq::{CheckedFrequencyTable, FrequencyTable};
use crate::error::{Error, Result};

/// Decodes symbols from an arithmetic-coded bit stream.
pub struct ArithmeticDecoder<R> {
    state: CoderState,
    input: BitReader<R>,
    /// The raw code bits currently buffered, always within `[low, high]`.
    code: u64,
}

impl<R: Read> ArithmeticDecoder<R> {
    /// Builds a decoder with the default `num_state_bits` (32), reading
    /// `num_state_bits` bits from `input` to fill the initial `code` window.
    pub fn new(input: BitReader<R>) -> Result<Self> {
        Self::with_state_bits(input, CoderState::DEFAULT_STATE_BITS)
    }

    /// Builds a decoder with a caller-chosen `num_state_bits`. Must match
    /// the encoder's choice.
    pub fn with_state_bits(mut input: BitReader<R>, num_state_bits: u32) -> Result<Self> {
        let state = CoderState::new(num_state_bits)?;
        let mut code = 0u64;
        for _ in 0..num_state_bits {
            code = (code << 1) | Self::read_code_bit(&mut input)?;
        }
        Ok(ArithmeticDecoder { state, input, code })
    }

    /// Reads the next bit from the input, treating end-of-stream as 0.
    fn read_code_bit(input: &mut BitReader<R>) -> Result<u64> {
        Ok(input.read_bit()?.unwrap_or(0) as u64)
    }

    /// Decodes the next symbol based on `freqs`. In debug builds, `freqs`
    /// is wrapped in a `CheckedFrequencyTable`, matching `ArithmeticEncoder::write`.
    pub fn read<T: FrequencyTable + ?Sized>(&mut self, freqs: &T) -> Result<usize> {
        if cfg!(debug_assertions) {
            let checked = CheckedFrequencyTable::new(freqs);
            self.read_uninstrumented(&checked)
        } else {
            self.read_uninstrumented(freqs)
        }
    }

    fn read_uninstrumented<T: FrequencyTable + ?Sized>(&mut self, freqs: &T) -> Result<usize> {
        let total = freqs.total();
        let max_total = self.state.maximum_total;
        if total > max_total {
            return Err(Error::TotalTooLarge { total, max: max_total });
        }

        let range = self.state.high - self.state.low + 1;
        let offset = self.code - self.state.low;
        let value = ((offset + 1) * total - 1).div_floor(&range);
        debug_assert!(value < total, "scaled value {value} must be below total {total}");

        // Binary search for the largest symbol with low(symbol) <= value.
        let mut start = 0usize;
        let mut end = freqs.symbol_limit();
        while end - start > 1 {
            let mid = (start + end) >> 1;
            if freqs.low(mid) > value {
                end = mid;
            } else {
                start = mid;
            }
        }
        let symbol = start;

        self.update(freqs, symbol)?;
        if !(self.state.low <= self.code && self.code <= self.state.high) {
            return Err(Error::ContractViolation("decoder code fell outside [low, high] after update".into()));
        }
        Ok(symbol)
    }
}

impl<R: Read> ArithmeticCoderCore for ArithmeticDecoder<R> {
    fn coder_state(&mut self) -> &mut CoderState {
        &mut self.state
    }

    fn shift(&mut self) -> Result<()> {
        let bit = Self::read_code_bit(&mut self.input)?;
        self.code = ((self.code << 1) & self.state.state_mask) | bit;
        Ok(())
    }

    fn underflow(&mut self) -> Result<()> {
        let bit = Self::read_code_bit(&mut self.input)?;
        self.code = (self.code & self.state.half_range) | ((self.code << 1) & (self.state.state_mask >> 1)) | bit;
        Ok(())
    }
}
