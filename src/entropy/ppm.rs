/*!

Prediction-by-partial-matching (PPM): a context trie with escape-based
fallback, generalizing adaptive arithmetic coding to condition on the
trailing `order` symbols of history.

*/

use std::io::{Read, Write};

use crate::entropy::decoder::ArithmeticDecoder;
use crate::entropy::encoder::ArithmeticEncoder;
use crate::entropy::freq::{FlatFrequencyTable, FrequencyTable, MutableFrequencyTable, SimpleFrequencyTable};
use crate::error::{Error, Result};

/// A single node of the PPM context trie.
///
/// Each context owns its children exclusively; the trie grows
/// monotonically and nodes are never freed during a session. A leaf
/// context (depth equal to the model order) has no children array.
struct Context {
    frequencies: SimpleFrequencyTable,
    subcontexts: Option<Vec<Option<Box<Context>>>>,
}

impl Context {
    fn new(symbol_limit: usize, has_subcontexts: bool) -> Self {
        Context {
            frequencies: SimpleFrequencyTable::new(vec![0u64; symbol_limit]).expect("symbol_limit >= 1"),
            subcontexts: if has_subcontexts { Some((0..symbol_limit).map(|_| None).collect()) } else { None },
        }
    }

    fn child(&self, symbol: usize) -> Option<&Context> {
        self.subcontexts.as_ref()?[symbol].as_deref()
    }
}

/// A PPM context model of configurable order.
///
/// `order` is `-1` (the uniform fallback, no trie at all), `0` (context-free,
/// a single root context), or a positive integer conditioning on that many
/// trailing symbols. `escape_symbol` is the symbol whose occurrence in a
/// context's frequency table means "fall back to the next-lower-order
/// context"; it is distinct from the stream's true EOF marker convention,
/// though the adaptive/PPM front ends in this crate use the same value
/// (256) for both.
pub struct PpmModel {
    order: i32,
    symbol_limit: usize,
    escape_symbol: usize,
    root_context: Option<Context>,
    order_minus1_freqs: FlatFrequencyTable,
}

impl PpmModel {
    /// Builds a model. `order` must be at least -1; `escape_symbol` must be
    /// a valid symbol under `symbol_limit`.
    pub fn new(order: i32, symbol_limit: usize, escape_symbol: usize) -> Result<Self> {
        if order < -1 || symbol_limit == 0 || escape_symbol >= symbol_limit {
            return Err(Error::InvalidArgument(format!(
                "order must be >= -1 and escape_symbol must be < symbol_limit; \
                 got order={order}, symbol_limit={symbol_limit}, escape_symbol={escape_symbol}"
            )));
        }
        let root_context = if order >= 0 {
            let mut ctx = Context::new(symbol_limit, order >= 1);
            ctx.frequencies.increment(escape_symbol)?;
            Some(ctx)
        } else {
            None
        };
        Ok(PpmModel {
            order,
            symbol_limit,
            escape_symbol,
            root_context,
            order_minus1_freqs: FlatFrequencyTable::new(symbol_limit)?,
        })
    }

    /// The configured model order.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Encodes `symbol` given the trailing-`history` context, walking from
    /// the highest usable order down to the order `-1` fallback.
    pub fn encode_symbol<W: Write>(
        &self,
        history: &[usize],
        symbol: usize,
        enc: &mut ArithmeticEncoder<W>,
    ) -> Result<()> {
        if let Some(root) = &self.root_context {
            for order in (0..=history.len()).rev() {
                let start = history.len() - order;
                let mut ctx = Some(root);
                for &sym in &history[start..] {
                    ctx = ctx.and_then(|c| c.child(sym));
                    if ctx.is_none() {
                        break;
                    }
                }
                if let Some(c) = ctx {
                    if symbol != self.escape_symbol && c.frequencies.get(symbol) > 0 {
                        enc.write(&c.frequencies, symbol)?;
                        return Ok(());
                    }
                    enc.write(&c.frequencies, self.escape_symbol)?;
                }
            }
        }
        enc.write(&self.order_minus1_freqs, symbol)
    }

    /// Decodes the next symbol given the trailing-`history` context,
    /// mirroring `encode_symbol`.
    pub fn decode_symbol<R: Read>(&self, history: &[usize], dec: &mut ArithmeticDecoder<R>) -> Result<usize> {
        if let Some(root) = &self.root_context {
            for order in (0..=history.len()).rev() {
                let start = history.len() - order;
                let mut ctx = Some(root);
                for &sym in &history[start..] {
                    ctx = ctx.and_then(|c| c.child(sym));
                    if ctx.is_none() {
                        break;
                    }
                }
                if let Some(c) = ctx {
                    let symbol = dec.read(&c.frequencies)?;
                    if symbol != self.escape_symbol {
                        return Ok(symbol);
                    }
                }
            }
        }
        dec.read(&self.order_minus1_freqs)
    }

    /// Updates every order-`0..=len(history)` context along `history` with
    /// an occurrence of `symbol`, creating missing contexts (each seeded
    /// with escape frequency 1) along the way. No-op when `order == -1`.
    pub fn increment_contexts(&mut self, history: &[usize], symbol: usize) -> Result<()> {
        if self.order == -1 {
            return Ok(());
        }
        if history.len() as i32 > self.order || symbol >= self.symbol_limit {
            return Err(Error::InvalidArgument(format!(
                "history of length {} exceeds model order {} or symbol {symbol} is out of range",
                history.len(),
                self.order
            )));
        }

        let escape_symbol = self.escape_symbol;
        let symbol_limit = self.symbol_limit;
        let model_order = self.order as usize;
        let root = self.root_context.as_mut().expect("order >= 0 implies a root context");

        for order in 0..=history.len() {
            let start = history.len() - order;
            let mut ctx: &mut Context = root;
            for (i, &sym) in history[start..].iter().enumerate() {
                let subctxs = ctx.subcontexts.as_mut().expect("non-leaf context must have subcontexts");
                if subctxs[sym].is_none() {
                    let has_subcontexts = i + 1 < model_order;
                    let mut child = Context::new(symbol_limit, has_subcontexts);
                    child.frequencies.increment(escape_symbol)?;
                    subctxs[sym] = Some(Box::new(child));
                }
                ctx = subctxs[sym].as_mut().expect("just inserted or already present");
            }
            ctx.frequencies.increment(symbol)?;
        }
        Ok(())
    }

    /// Appends `symbol` to the sliding history window, evicting the oldest
    /// symbol once the window reaches `order` entries. No-op when
    /// `order <= 0`, since orders 0 and -1 never consult history.
    pub fn push_history(&self, history: &mut Vec<usize>, symbol: usize) {
        if self.order < 1 {
            return;
        }
        if history.len() == self.order as usize {
            history.remove(0);
        }
        history.push(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::bitstream::{BitReader, BitWriter};

    fn round_trip(order: i32, bytes: &[u8]) {
        const SYMBOL_LIMIT: usize = 257;
        const EOF: usize = 256;

        let mut model = PpmModel::new(order, SYMBOL_LIMIT, EOF).unwrap();
        let mut enc = ArithmeticEncoder::new(BitWriter::new(Vec::new())).unwrap();
        let mut history = Vec::new();
        for &b in bytes {
            let symbol = b as usize;
            model.encode_symbol(&history, symbol, &mut enc).unwrap();
            model.increment_contexts(&history, symbol).unwrap();
            model.push_history(&mut history, symbol);
        }
        model.encode_symbol(&history, EOF, &mut enc).unwrap();
        enc.finish().unwrap();
        let buf = enc.into_bit_writer().close().unwrap();

        let mut model = PpmModel::new(order, SYMBOL_LIMIT, EOF).unwrap();
        let mut dec = ArithmeticDecoder::new(BitReader::new(std::io::Cursor::new(buf))).unwrap();
        let mut history = Vec::new();
        let mut decoded = Vec::new();
        loop {
            let symbol = model.decode_symbol(&history, &mut dec).unwrap();
            if symbol == EOF {
                break;
            }
            decoded.push(symbol as u8);
            model.increment_contexts(&history, symbol).unwrap();
            model.push_history(&mut history, symbol);
        }
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn round_trips_at_every_named_order() {
        for &order in &[-1, 0, 1, 2, 3] {
            round_trip(order, b"ABABABABAB");
            round_trip(order, b"");
            round_trip(order, b"x");
        }
    }

    #[test]
    fn eof_has_frequency_one_only_at_order_minus1() {
        let model = PpmModel::new(2, 257, 256).unwrap();
        let root = model.root_context.as_ref().unwrap();
        assert_eq!(root.frequencies.get(256), 1);
        assert_eq!(model.order_minus1_freqs.get(256), 1);
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(PpmModel::new(-2, 257, 256).is_err());
        assert!(PpmModel::new(3, 0, 0).is_err());
        assert!(PpmModel::new(3, 257, 257).is_err());
    }
}
