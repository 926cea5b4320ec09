/*!

Encodes symbols against caller-supplied frequency tables and writes the
resulting arithmetic-coded bit stream.

*/

use std::io::Write;

use crate::entropy::bitstream::BitWriter;
use crate::entropy::coder::{ArithmeticCoderCore, CoderState};
use crate::entropy::freq::{CheckedFrequencyTable, FrequencyTable};
use crate::error::Result;

/// Encodes symbols based on frequency tables and writes to an
/// arithmetic-coded bit stream.
pub struct ArithmeticEncoder<W> {
    state: CoderState,
    output: BitWriter<W>,
    /// Number of saved underflow bits. Grows without bound until the next
    /// `shift` resolves them.
    num_underflow: u64,
}

impl<W: Write> ArithmeticEncoder<W> {
    /// Builds an encoder with the default `num_state_bits` (32).
    pub fn new(output: BitWriter<W>) -> Result<Self> {
        Self::with_state_bits(output, CoderState::DEFAULT_STATE_BITS)
    }

    /// Builds an encoder with a caller-chosen `num_state_bits`.
    pub fn with_state_bits(output: BitWriter<W>, num_state_bits: u32) -> Result<Self> {
        Ok(ArithmeticEncoder { state: CoderState::new(num_state_bits)?, output, num_underflow: 0 })
    }

    /// Encodes `symbol` under `freqs`. In debug builds, `freqs` is
    /// additionally wrapped in a `CheckedFrequencyTable` so a broken
    /// `FrequencyTable` implementation is caught here rather than silently
    /// desynchronizing the decoder.
    pub fn write<T: FrequencyTable + ?Sized>(&mut self, freqs: &T, symbol: usize) -> Result<()> {
        if cfg!(debug_assertions) {
            let checked = CheckedFrequencyTable::new(freqs);
            self.update(&checked, symbol)
        } else {
            self.update(freqs, symbol)
        }
    }

    /// Flushes any buffered bits so the output can be decoded properly.
    /// Must be called exactly once, at the end of encoding. Does not close
    /// the underlying bit writer; call `BitWriter::close` (via
    /// `into_bit_writer`) afterwards.
    pub fn finish(&mut self) -> Result<()> {
        self.output.write_bit(1)
    }

    /// Unwraps the underlying `BitWriter`. Call `finish` first.
    pub fn into_bit_writer(self) -> BitWriter<W> {
        self.output
    }
}

impl<W: Write> ArithmeticCoderCore for ArithmeticEncoder<W> {
    fn coder_state(&mut self) -> &mut CoderState {
        &mut self.state
    }

    fn shift(&mut self) -> Result<()> {
        let bit = (self.state.low >> (self.state.num_state_bits() - 1)) as u8 & 1;
        self.output.write_bit(bit)?;
        for _ in 0..self.num_underflow {
            self.output.write_bit(bit ^ 1)?;
        }
        self.num_underflow = 0;
        Ok(())
    }

    fn underflow(&mut self) -> Result<()> {
        self.num_underflow += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::bitstream::BitReader;
    use crate::entropy::decoder::ArithmeticDecoder;
    use crate::entropy::freq::SimpleFrequencyTable;

    #[test]
    fn total_too_large_is_rejected() {
        let mut enc = ArithmeticEncoder::new(BitWriter::new(Vec::new())).unwrap();
        let max_total = enc.coder_state().maximum_total();
        let freqs = SimpleFrequencyTable::new(vec![max_total + 1, 0]).unwrap();
        assert!(matches!(enc.write(&freqs, 0), Err(crate::error::Error::TotalTooLarge { .. })));
    }

    #[test]
    fn zero_frequency_symbol_is_rejected() {
        let mut enc = ArithmeticEncoder::new(BitWriter::new(Vec::new())).unwrap();
        let freqs = SimpleFrequencyTable::new(vec![1, 0, 1]).unwrap();
        assert!(matches!(enc.write(&freqs, 1), Err(crate::error::Error::InvalidSymbol(_))));
    }

    #[test]
    fn encoder_and_decoder_stay_synchronized_across_many_symbols() {
        let freqs_enc = SimpleFrequencyTable::new(vec![3, 1, 4, 1, 5, 9, 2, 6]).unwrap();
        let mut enc = ArithmeticEncoder::new(BitWriter::new(Vec::new())).unwrap();
        let symbols = [0usize, 2, 2, 5, 7, 0, 1, 3, 4, 6, 5, 5, 2];
        for &s in &symbols {
            enc.write(&freqs_enc, s).unwrap();
        }
        enc.finish().unwrap();
        let buf = enc.into_bit_writer().close().unwrap();

        let freqs_dec = SimpleFrequencyTable::new(vec![3, 1, 4, 1, 5, 9, 2, 6]).unwrap();
        let mut dec = ArithmeticDecoder::new(BitReader::new(std::io::Cursor::new(buf))).unwrap();
        for &s in &symbols {
            assert_eq!(dec.read(&freqs_dec).unwrap(), s);
        }
    }
}
