/*!

The three modeling front-ends named by the specification: static,
adaptive order-0, and PPM. Each pairs a `FrequencyTable`/`PpmModel` choice
per symbol with the arithmetic coder core in `entropy::{encoder,decoder}`.

This is where the library stops being model-agnostic: `src/bin/*.rs` are
thin wrappers that open files and hand them to the functions here, the
way `rusty-shell-rust-compress`'s own `main.rs` hands `Reader`/`Writer`
trait objects to passes implemented in its library crate.

*/

use std::io::{Read, Write};

use crate::entropy::bitstream::{BitReader, BitWriter};
use crate::entropy::decoder::ArithmeticDecoder;
use crate::entropy::encoder::ArithmeticEncoder;
use crate::entropy::freq::{FlatFrequencyTable, FrequencyTable, MutableFrequencyTable, SimpleFrequencyTable};
use crate::entropy::ppm::PpmModel;
use crate::error::Result;

/// Number of symbols the byte-oriented front ends code over: the 256
/// possible byte values plus the EOF marker.
pub const SYMBOL_LIMIT: usize = 257;

/// The reserved symbol that terminates a stream.
pub const EOF_SYMBOL: usize = 256;

/// The PPM order `ppm-compress`/`ppm-decompress` are built with by default.
pub const DEFAULT_PPM_ORDER: i32 = 3;

/// Compresses `input` with an adaptive order-0 model: frequencies start
/// uniform and are updated after every symbol, so no header is needed.
pub fn adaptive_compress<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let mut freqs = SimpleFrequencyTable::from_table(&FlatFrequencyTable::new(SYMBOL_LIMIT)?)?;
    let mut enc = ArithmeticEncoder::new(BitWriter::new(output))?;

    let mut buf = [0u8; 1];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let symbol = buf[0] as usize;
        enc.write(&freqs, symbol)?;
        freqs.increment(symbol)?;
    }
    enc.write(&freqs, EOF_SYMBOL)?;
    enc.finish()?;
    enc.into_bit_writer().close()?;
    Ok(())
}

/// Decompresses a stream produced by `adaptive_compress`.
pub fn adaptive_decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<()> {
    let mut freqs = SimpleFrequencyTable::from_table(&FlatFrequencyTable::new(SYMBOL_LIMIT)?)?;
    let mut dec = ArithmeticDecoder::new(BitReader::new(input))?;

    loop {
        let symbol = dec.read(&freqs)?;
        if symbol == EOF_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
        freqs.increment(symbol)?;
    }
    output.flush()?;
    Ok(())
}

fn write_uint32<W: Write>(writer: &mut BitWriter<W>, value: u32) -> Result<()> {
    for i in (0..32).rev() {
        writer.write_bit(((value >> i) & 1) as u8)?;
    }
    Ok(())
}

fn read_uint32<R: Read>(reader: &mut BitReader<R>) -> Result<u32> {
    let mut value = 0u32;
    for _ in 0..32 {
        value = (value << 1) | reader.read_bit_no_eof()? as u32;
    }
    Ok(value)
}

/// Compresses `input` with a static model: frequencies are measured in a
/// first pass over the whole input and written as a header of 256
/// big-endian 32-bit integers, bit-packed through the same `BitWriter`
/// with no alignment padding between them. The EOF symbol's frequency
/// (always 1) is never written, per the external interface in the
/// specification.
pub fn static_compress<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;

    let mut counts = vec![0u64; SYMBOL_LIMIT];
    for &b in &bytes {
        counts[b as usize] += 1;
    }
    counts[EOF_SYMBOL] = 1;
    let freqs = SimpleFrequencyTable::new(counts)?;

    let mut writer = BitWriter::new(output);
    for symbol in 0..256 {
        write_uint32(&mut writer, freqs.get(symbol) as u32)?;
    }

    let mut enc = ArithmeticEncoder::new(writer)?;
    for &b in &bytes {
        enc.write(&freqs, b as usize)?;
    }
    enc.write(&freqs, EOF_SYMBOL)?;
    enc.finish()?;
    enc.into_bit_writer().close()?;
    Ok(())
}

/// Decompresses a stream produced by `static_compress`.
pub fn static_decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<()> {
    let mut reader = BitReader::new(input);

    let mut counts = vec![0u64; SYMBOL_LIMIT];
    for count in counts.iter_mut().take(256) {
        *count = read_uint32(&mut reader)? as u64;
    }
    counts[EOF_SYMBOL] = 1;
    let freqs = SimpleFrequencyTable::new(counts)?;

    let mut dec = ArithmeticDecoder::new(reader)?;
    loop {
        let symbol = dec.read(&freqs)?;
        if symbol == EOF_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
    }
    output.flush()?;
    Ok(())
}

/// Compresses `input` with a PPM context model of the given `order`. The
/// same `order` must be used to decompress.
pub fn ppm_compress<R: Read, W: Write>(order: i32, mut input: R, output: W) -> Result<()> {
    let mut model = PpmModel::new(order, SYMBOL_LIMIT, EOF_SYMBOL)?;
    let mut enc = ArithmeticEncoder::new(BitWriter::new(output))?;
    let mut history = Vec::new();

    let mut buf = [0u8; 1];
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let symbol = buf[0] as usize;
        model.encode_symbol(&history, symbol, &mut enc)?;
        model.increment_contexts(&history, symbol)?;
        model.push_history(&mut history, symbol);
    }
    model.encode_symbol(&history, EOF_SYMBOL, &mut enc)?;
    enc.finish()?;
    enc.into_bit_writer().close()?;
    Ok(())
}

/// Decompresses a stream produced by `ppm_compress` with the same `order`.
pub fn ppm_decompress<R: Read, W: Write>(order: i32, input: R, mut output: W) -> Result<()> {
    let mut model = PpmModel::new(order, SYMBOL_LIMIT, EOF_SYMBOL)?;
    let mut dec = ArithmeticDecoder::new(BitReader::new(input))?;
    let mut history = Vec::new();

    loop {
        let symbol = model.decode_symbol(&history, &mut dec)?;
        if symbol == EOF_SYMBOL {
            break;
        }
        output.write_all(&[symbol as u8])?;
        model.increment_contexts(&history, symbol)?;
        model.push_history(&mut history, symbol);
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{RngCore, SeedableRng};
    use std::io::Cursor;

    fn adaptive_round_trip(bytes: &[u8]) -> Vec<u8> {
        let mut compressed = Vec::new();
        adaptive_compress(Cursor::new(bytes), &mut compressed).unwrap();
        let mut decompressed = Vec::new();
        adaptive_decompress(Cursor::new(compressed), &mut decompressed).unwrap();
        decompressed
    }

    fn static_round_trip(bytes: &[u8]) -> Vec<u8> {
        let mut compressed = Vec::new();
        static_compress(Cursor::new(bytes), &mut compressed).unwrap();
        let mut decompressed = Vec::new();
        static_decompress(Cursor::new(compressed), &mut decompressed).unwrap();
        decompressed
    }

    fn ppm_round_trip(order: i32, bytes: &[u8]) -> Vec<u8> {
        let mut compressed = Vec::new();
        ppm_compress(order, Cursor::new(bytes), &mut compressed).unwrap();
        let mut decompressed = Vec::new();
        ppm_decompress(order, Cursor::new(compressed), &mut decompressed).unwrap();
        decompressed
    }

    #[test]
    fn static_round_trip_handles_empty_input() {
        assert_eq!(static_round_trip(b""), b"");
    }

    #[test]
    fn static_header_is_all_zero_frequencies_for_empty_input() {
        let mut compressed = Vec::new();
        static_compress(Cursor::new(b"" as &[u8]), &mut compressed).unwrap();
        // 256 uint32s, bit-packed: 1024 bytes of header, all zero since no
        // byte ever occurs, plus whatever the coder emits for the lone EOF.
        assert_eq!(&compressed[..1024], vec![0u8; 1024].as_slice());
    }

    #[test]
    fn adaptive_round_trip_handles_a_single_byte() {
        assert_eq!(adaptive_round_trip(b"A"), b"A");
    }

    #[test]
    fn ppm_round_trip_handles_a_short_repetitive_string() {
        assert_eq!(ppm_round_trip(3, b"ABABABABAB"), b"ABABABABAB");
    }

    #[test]
    fn ppm_round_trips_at_every_named_order() {
        for &order in &[-1, 0, 1, 2, 3] {
            assert_eq!(ppm_round_trip(order, b"the quick brown fox jumps over the lazy dog"), b"the quick brown fox jumps over the lazy dog".to_vec());
        }
    }

    #[test]
    fn adaptive_round_trips_4096_random_bytes() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xC0FFEE);
        let mut bytes = vec![0u8; 4096];
        rng.fill_bytes(&mut bytes);
        assert_eq!(adaptive_round_trip(&bytes), bytes);
    }

    #[test]
    fn ppm_compresses_large_uniform_input_well_under_its_size() {
        let bytes = vec![0u8; 65536];
        let mut compressed = Vec::new();
        ppm_compress(3, Cursor::new(&bytes), &mut compressed).unwrap();
        assert!(compressed.len() < 1024, "compressed {} bytes down to {}, expected < 1024", bytes.len(), compressed.len());

        let mut decompressed = Vec::new();
        ppm_decompress(3, Cursor::new(compressed), &mut decompressed).unwrap();
        assert_eq!(decompressed, bytes);
    }

    #[test]
    fn adaptive_compresses_uniform_kib_input_below_its_size() {
        let bytes = vec![0x41u8; 1024];
        let mut compressed = Vec::new();
        adaptive_compress(Cursor::new(&bytes), &mut compressed).unwrap();
        assert!(compressed.len() < bytes.len());
    }

    #[test]
    fn static_round_trips_mixed_byte_values() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(2000).collect();
        assert_eq!(static_round_trip(&bytes), bytes);
    }
}
