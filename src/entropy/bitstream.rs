/*!

Big-endian bit-oriented I/O over byte streams.

Bytes are decomposed MSB-first into bits for both reading and writing, so
byte N's bits appear on the wire as `bit7, bit6, ..., bit0`. The end of a
bit stream always falls on a byte boundary: `BitWriter::close` pads the
final byte with zero bits, and `BitReader` treats end-of-stream as an
infinite tail of zero bits once the underlying byte source is exhausted.

*/

use std::io::{Read, Write};

use crate::error::{Error, Result};

/// Reads single bits, MSB-first, from an underlying byte source.
///
/// Once the byte source is exhausted, `read_bit` returns `Ok(None)` forever;
/// callers that need a hard failure on end-of-stream should use
/// `read_bit_no_eof` instead.
pub struct BitReader<R> {
    input: R,
    current_byte: Option<u8>,
    bits_remaining: u32,
}

impl<R: Read> BitReader<R> {
    /// Wraps a byte source for bit-at-a-time reading.
    pub fn new(input: R) -> Self {
        BitReader { input, current_byte: Some(0), bits_remaining: 0 }
    }

    /// Reads the next bit. Returns `None` at end-of-stream; end-of-stream
    /// always falls on a byte boundary.
    pub fn read_bit(&mut self) -> Result<Option<u8>> {
        if self.current_byte.is_none() {
            return Ok(None);
        }
        if self.bits_remaining == 0 {
            let mut buf = [0u8; 1];
            let n = self.input.read(&mut buf)?;
            if n == 0 {
                self.current_byte = None;
                return Ok(None);
            }
            self.current_byte = Some(buf[0]);
            self.bits_remaining = 8;
        }
        self.bits_remaining -= 1;
        let byte = self.current_byte.expect("checked above");
        Ok(Some((byte >> self.bits_remaining) & 1))
    }

    /// Reads the next bit, failing with `Error::UnexpectedEof` instead of
    /// returning `None` at end-of-stream.
    pub fn read_bit_no_eof(&mut self) -> Result<u8> {
        self.read_bit()?.ok_or(Error::UnexpectedEof)
    }

    /// Unwraps the underlying byte source.
    pub fn into_inner(self) -> R {
        self.input
    }
}

/// Writes single bits, MSB-first, to an underlying byte sink.
pub struct BitWriter<W> {
    output: W,
    current_byte: u8,
    num_bits_filled: u32,
}

impl<W: Write> BitWriter<W> {
    /// Wraps a byte sink for bit-at-a-time writing.
    pub fn new(output: W) -> Self {
        BitWriter { output, current_byte: 0, num_bits_filled: 0 }
    }

    /// Writes one bit. `bit` must be 0 or 1.
    pub fn write_bit(&mut self, bit: u8) -> Result<()> {
        debug_assert!(bit == 0 || bit == 1, "bit must be 0 or 1, got {bit}");
        self.current_byte = (self.current_byte << 1) | (bit & 1);
        self.num_bits_filled += 1;
        if self.num_bits_filled == 8 {
            self.output.write_all(&[self.current_byte])?;
            self.current_byte = 0;
            self.num_bits_filled = 0;
        }
        Ok(())
    }

    /// Pads the current byte with zero bits to a byte boundary, flushes,
    /// and returns the underlying byte sink. Must be called exactly once,
    /// at the end of every encoding session.
    pub fn close(mut self) -> Result<W> {
        while self.num_bits_filled != 0 {
            self.write_bit(0)?;
        }
        self.output.flush()?;
        Ok(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trip_preserves_bit_sequence() {
        let bits = [1u8, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0];
        let mut w = BitWriter::new(Vec::new());
        for &b in &bits {
            w.write_bit(b).unwrap();
        }
        let buf = w.close().unwrap();
        assert_eq!(buf.len(), 2); // 11 bits -> 2 bytes, padded

        let mut r = BitReader::new(Cursor::new(buf));
        for &b in &bits {
            assert_eq!(r.read_bit().unwrap(), Some(b));
        }
        // padding bits must be zero
        assert_eq!(r.read_bit().unwrap(), Some(0));
        assert_eq!(r.read_bit().unwrap(), Some(0));
        // and then infinite end-of-stream
        assert_eq!(r.read_bit().unwrap(), None);
        assert_eq!(r.read_bit().unwrap(), None);
    }

    #[test]
    fn read_bit_no_eof_fails_past_end() {
        let mut r = BitReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(r.read_bit_no_eof(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn empty_write_closes_to_empty_buffer() {
        let w: BitWriter<Vec<u8>> = BitWriter::new(Vec::new());
        let buf = w.close().unwrap();
        assert!(buf.is_empty());
    }
}
