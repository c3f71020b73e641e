//! The encode/decode pipeline.
//!
//! Every call builds its own frequency table, tree and code table and drops
//! them afterwards; nothing is cached between calls. [`HuffmanEncoder`] and
//! [`HuffmanDecoder`] hold only immutable tables, so one instance can be
//! shared between threads freely.

use tracing::debug;

use crate::code::{generate_codes, CodeTable, ReverseMapping};
use crate::container;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::pack::{pack, unpack, EncodedPayload};
use crate::symbol::Symbol;
use crate::tree::HuffmanTree;

/// Huffman encoder.
#[derive(Clone, Debug)]
pub struct HuffmanEncoder<S: Symbol> {
    table: CodeTable<S>,
}

impl<S: Symbol> HuffmanEncoder<S> {
    /// Derive a code from the symbol counts of `sample`.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `sample` is empty.
    pub fn from_sample(sample: &[S]) -> Result<Self> {
        let freqs = FrequencyTable::analyze(sample)?;
        Self::from_frequencies(&freqs)
    }

    /// Derive a code from precomputed counts.
    pub fn from_frequencies(freqs: &FrequencyTable<S>) -> Result<Self> {
        let tree = HuffmanTree::build(freqs)?;
        let table = CodeTable::from_tree(&tree)?;
        Ok(Self { table })
    }

    /// Use an existing table.
    pub fn with_table(table: CodeTable<S>) -> Self {
        Self { table }
    }

    /// The code table in use.
    pub fn table(&self) -> &CodeTable<S> {
        &self.table
    }

    /// Encode a symbol sequence into a padded payload.
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` for a symbol outside the table.
    pub fn encode(&self, symbols: &[S]) -> Result<EncodedPayload> {
        pack(symbols, &self.table)
    }

    /// Encode and prepend the code table, producing a self-contained buffer.
    pub fn encode_framed(&self, symbols: &[S]) -> Result<Vec<u8>> {
        let payload = self.encode(symbols)?;
        container::write(&self.table, &payload)
    }

    /// Decoder for payloads produced by this encoder.
    pub fn decoder(&self) -> HuffmanDecoder<S> {
        HuffmanDecoder::new(self.table.reverse())
    }
}

/// Huffman decoder.
#[derive(Clone, Debug)]
pub struct HuffmanDecoder<S> {
    reverse: ReverseMapping<S>,
}

impl<S: Symbol> HuffmanDecoder<S> {
    /// Create a decoder from a reverse mapping.
    pub fn new(reverse: ReverseMapping<S>) -> Self {
        Self { reverse }
    }

    /// Create a decoder from a code table.
    pub fn from_table(table: &CodeTable<S>) -> Self {
        Self::new(table.reverse())
    }

    /// Decode a padded payload.
    ///
    /// # Errors
    /// See [`unpack`].
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<S>> {
        unpack(payload, &self.reverse)
    }
}

/// Result of [`encode`]: the payload and the table needed to decode it.
#[derive(Clone, Debug)]
pub struct Encoded<S: Symbol> {
    /// Padding header and coded body.
    pub payload: EncodedPayload,
    /// The code used for `payload`.
    pub table: CodeTable<S>,
}

/// Encode `symbols` with a code derived from their own frequencies.
///
/// # Errors
/// Returns `Error::EmptyInput` if `symbols` is empty.
pub fn encode<S: Symbol>(symbols: &[S]) -> Result<Encoded<S>> {
    let freqs = FrequencyTable::analyze(symbols)?;
    let tree = HuffmanTree::build(&freqs)?;
    let (table, _) = generate_codes(&tree)?;
    let payload = pack(symbols, &table)?;
    debug!(
        symbols = symbols.len(),
        distinct = freqs.len(),
        max_code_len = table.max_len(),
        payload_bytes = payload.len(),
        "encoded"
    );
    Ok(Encoded { payload, table })
}

/// Decode a payload produced by [`encode`] with its reverse mapping.
pub fn decode<S: Symbol>(payload: &[u8], reverse: &ReverseMapping<S>) -> Result<Vec<S>> {
    unpack(payload, reverse)
}

/// Encode into a self-contained buffer carrying its own code table.
pub fn compress<S: Symbol>(symbols: &[S]) -> Result<Vec<u8>> {
    let Encoded { payload, table } = encode(symbols)?;
    let out = container::write(&table, &payload)?;
    debug!(input = symbols.len(), output = out.len(), "compressed");
    Ok(out)
}

/// Decode a buffer produced by [`compress`].
pub fn decompress<S: Symbol>(input: &[u8]) -> Result<Vec<S>> {
    let parsed = container::read::<S>(input)?;
    let out = unpack(parsed.payload, &parsed.table.reverse())?;
    debug!(input = input.len(), output = out.len(), "decompressed");
    Ok(out)
}

/// [`compress`] over the characters of `text`.
pub fn compress_str(text: &str) -> Result<Vec<u8>> {
    let symbols: Vec<char> = text.chars().collect();
    compress(&symbols)
}

/// [`decompress`] into a `String`.
pub fn decompress_str(input: &[u8]) -> Result<String> {
    Ok(decompress::<char>(input)?.into_iter().collect())
}
