//! Reference arithmetic coding: static, adaptive, and PPM entropy codecs.
//!
//! # Links
//!
//! http://en.wikipedia.org/wiki/Arithmetic_coding

pub mod entropy;
pub mod error;
pub mod frontend;

pub use crate::entropy::bitstream::{BitReader, BitWriter};
pub use crate::entropy::coder::{ArithmeticCoderCore, CoderState};
pub use crate::entropy::decoder::ArithmeticDecoder;
pub use crate::entropy::encoder::ArithmeticEncoder;
pub use crate::entropy::freq::{
    CheckedFrequencyTable, FlatFrequencyTable, FrequencyTable, MutableFrequencyTable, SimpleFrequencyTable,
};
pub use crate::entropy::ppm::PpmModel;
pub use crate::error::{Error, Result};
pub use crate::frontend::{
    adaptive_compress, adaptive_decompress, ppm_compress, ppm_decompress, static_compress, static_decompress,
    DEFAULT_PPM_ORDER, EOF_SYMBOL, SYMBOL_LIMIT,
};
