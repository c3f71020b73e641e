//! Error types for Huffman encoding and decoding.

use thiserror::Error;

/// Error variants for huffpack operations.
#[derive(Debug, Error)]
pub enum Error {
    /// There are no symbols to encode, so no tree can be built.
    #[error("empty input: nothing to encode")]
    EmptyInput,

    /// A bit stream that has to be regrouped into bytes is not byte aligned.
    #[error("misaligned input: {bits} bits is not a multiple of 8")]
    MisalignedInput {
        /// Length of the offending bit stream.
        bits: usize,
    },

    /// The bit buffer never matched a known code.
    #[error("unknown code {pending:?} starting at bit {offset}")]
    UnknownCode {
        /// Bit offset (into the coded body) where the unmatched code starts.
        offset: usize,
        /// The unmatched bits, as a `0`/`1` string.
        pending: String,
    },

    /// Decoding was attempted without a code table.
    #[error("missing code table")]
    MissingCodeTable,

    /// The symbol at `position` has no entry in the code table.
    #[error("symbol at position {position} has no code")]
    UnknownSymbol {
        /// Index of the symbol in the input sequence.
        position: usize,
    },

    /// The padding header is outside `1..=8` or longer than the body.
    #[error("invalid padding count {pad} for a body of {body_bits} bits")]
    InvalidPadding {
        /// Value of the header byte.
        pad: u8,
        /// Number of bits following the header.
        body_bits: usize,
    },

    /// A textual bit string contains something other than `0` or `1`.
    #[error("invalid bit {found:?} at position {position}")]
    InvalidBit {
        /// Character index in the bit string.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// The input ends before its header does.
    #[error("truncated input: need {needed} bytes, got {available}")]
    Truncated {
        /// Bytes required to continue parsing.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The container does not start with the expected magic bytes.
    #[error("bad magic: not a huffpack container")]
    BadMagic,

    /// The container was written by an unknown format version.
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    /// The container holds a different symbol alphabet than requested.
    #[error("symbol kind mismatch: expected {expected}, found {found}")]
    SymbolKindMismatch {
        /// Alphabet the caller asked for.
        expected: &'static str,
        /// Alphabet recorded in the container.
        found: &'static str,
    },

    /// A persisted code table does not describe a valid prefix code.
    #[error("invalid code table: {0}")]
    InvalidCodeTable(String),

    /// A persisted symbol could not be read back.
    #[error("invalid symbol encoding at byte {offset}")]
    InvalidSymbol {
        /// Byte offset of the symbol in the container.
        offset: usize,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for huffpack operations.
pub type Result<T> = std::result::Result<T, Error>;
