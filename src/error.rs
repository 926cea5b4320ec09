/*!

Crate-wide error type.

A small `thiserror` enum, one variant per error kind produced by the bit
streams, frequency tables, the arithmetic coder, and the PPM model.

*/

use thiserror::Error;

/// Errors produced by the bit streams, frequency tables, the arithmetic
/// coder, and the PPM model.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad configuration: a non-positive `num_state_bits`, a PPM order below
    /// -1, a symbol or frequency outside its valid range, and so on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Attempted to encode a symbol with zero frequency, or the decoder
    /// found no symbol whose interval contains the scaled code value.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// `freqs.total()` exceeded the coder's `maximum_total`.
    #[error("frequency total {total} exceeds the maximum of {max}")]
    TotalTooLarge {
        /// The offending total.
        total: u64,
        /// The coder's `maximum_total` for its configured `num_state_bits`.
        max: u64,
    },

    /// The underlying byte stream failed.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// `BitReader::read_bit_no_eof` observed end-of-stream.
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// An internal invariant (coding range, decoder code window) was
    /// observed false. Always fatal; never caused by a well-formed caller.
    #[error("contract violation: {0}")]
    ContractViolation(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
