//! # huffpack
//!
//! *Static Huffman coding with an explicit padding header.*
//!
//! ## Intuition First
//!
//! In plain text every character costs the same number of bits, whether it
//! shows up on every line or once per book. Huffman coding hands out short bit
//! strings to frequent symbols and long ones to rare symbols, so the total
//! shrinks. The codes are chosen so that none is a prefix of another, which
//! lets a decoder split the bit stream back into symbols without separators.
//!
//! ## The Algorithm
//!
//! 1. Count how often each symbol occurs.
//! 2. Put one leaf per symbol into a priority queue keyed by count.
//! 3. Repeatedly take the two lightest nodes and join them under a new node
//!    whose weight is their sum. The last node standing is the root.
//! 4. Walk the tree: a left edge appends `0`, a right edge appends `1`. The
//!    path to a leaf is that symbol's code.
//!
//! ```text
//! "abracadabra"          (11)
//!                       /    \
//!  a:5 b:2 r:2       a:5      (6)
//!  c:1 d:1                   /    \
//!                         (2)      (4)
//!                        /  \     /  \
//!                      c:1 d:1  b:2  r:2
//!
//!  a = 0   c = 100   d = 101   b = 110   r = 111   → 23 bits
//! ```
//!
//! ## Byte Layout
//!
//! The coded bits are packed MSB-first behind a one-byte padding header:
//!
//! ```text
//! byte 0     : pad = 8 - (bits % 8), always in 1..=8
//! bytes 1..N : coded bits followed by `pad` zero bits
//! ```
//!
//! A bare payload still needs the code table to be decoded. [`compress`]
//! therefore wraps it in a small container that stores the table as
//! `(symbol, code length)` pairs in leaf order; [`decompress`] needs nothing
//! else.
//!
//! ## Determinism
//!
//! Nodes of equal weight leave the queue in the order they entered it, leaves
//! in first-seen order and merged nodes after every existing node of the same
//! weight. Identical input always gives identical bytes.
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(n + k \log k)$ for `n` symbols over an alphabet of size `k`.
//! - **Space**: $O(k)$ for the tree and tables, plus the output buffer.
//!
//! ## Failure Modes
//!
//! 1. **Empty input**: no tree can be built; [`Error::EmptyInput`].
//! 2. **Dangling codes**: bits left over that match no code give
//!    [`Error::UnknownCode`] with the offset where the run starts.
//! 3. **Malformed headers**: a bad pad byte or container header is rejected
//!    before any bit is decoded.
//!
//! ## Example
//!
//! ```
//! let packed = huffpack::compress_str("abracadabra")?;
//! assert_eq!(huffpack::decompress_str(&packed)?, "abracadabra");
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! ## References
//!
//! - Huffman, D. A. (1952). "A Method for the Construction of
//!   Minimum-Redundancy Codes."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod codec;
pub mod container;
pub mod error;
pub mod frequency;
pub mod pack;
pub mod symbol;
pub mod tree;

pub use code::{Code, CodeTable, ReverseMapping};
pub use codec::{
    compress, compress_str, decode, decompress, decompress_str, encode, Encoded, HuffmanDecoder,
    HuffmanEncoder,
};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use pack::EncodedPayload;
pub use symbol::{Symbol, SymbolKind};
pub use tree::HuffmanTree;
