//! Bit packing with a padding header.
//!
//! A packed payload is one header byte holding the padding count, followed by
//! the concatenated codes, MSB-first, zero-filled to a byte boundary:
//!
//! ```text
//! byte 0     : pad, 1..=8
//! bytes 1..N : coded bits + pad zero bits
//! ```
//!
//! `pad` is `8 - (bits % 8)`, so a body that is already byte aligned still
//! gets a full zero byte and `pad == 8`. Decoders written against this layout
//! depend on it.

use std::fmt;

use tracing::debug;

use crate::code::{Code, CodeTable, ReverseMapping};
use crate::error::{Error, Result};
use crate::symbol::Symbol;

/// MSB-first bit sink.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - offset);
            }
        }
        self.bit_len += 1;
    }

    pub(crate) fn push_code(&mut self, code: Code) {
        for bit in code.iter() {
            self.push_bit(bit);
        }
    }

    pub(crate) fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// The packed bytes; fails unless a whole number of bytes was written.
    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        if self.bit_len % 8 != 0 {
            return Err(Error::MisalignedInput { bits: self.bit_len });
        }
        Ok(self.bytes)
    }
}

/// Padding count for a body of `bits` coded bits.
pub fn padding_for(bits: usize) -> u8 {
    (8 - bits % 8) as u8
}

/// A packed payload: padding header followed by the coded body.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
}

impl EncodedPayload {
    /// Parse a textual `0`/`1` dump of a payload, header included.
    ///
    /// # Errors
    /// `Error::InvalidBit` on any other character, `Error::MisalignedInput`
    /// if the number of bits is not a multiple of 8.
    pub fn from_bit_str(s: &str) -> Result<Self> {
        let mut writer = BitWriter::new();
        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => writer.push_bit(false),
                '1' => writer.push_bit(true),
                found => return Err(Error::InvalidBit { position, found }),
            }
        }
        Ok(Self {
            bytes: writer.finish()?,
        })
    }

    /// Raw bytes, header first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total length in bytes, header included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether there are no bytes at all (not even a header).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The padding count from the header, if present.
    pub fn padding(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Number of coded bits, i.e. the body without its padding.
    pub fn coded_bits(&self) -> Option<usize> {
        let pad = usize::from(self.padding()?);
        (self.bytes.len() * 8).checked_sub(8 + pad)
    }
}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedPayload")
            .field("len", &self.bytes.len())
            .field("padding", &self.padding())
            .finish()
    }
}

impl fmt::Display for EncodedPayload {
    /// The payload as a `0`/`1` string, header included.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{byte:08b}")?;
        }
        Ok(())
    }
}

/// Encode `symbols` with `table` and pack the result.
///
/// The body is padded to a byte boundary before it is finished, so
/// `Error::MisalignedInput` never comes from here.
///
/// # Errors
/// Returns `Error::UnknownSymbol` for a symbol the table has no code for.
pub fn pack<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<EncodedPayload> {
    let mut body = BitWriter::new();
    for (position, symbol) in symbols.iter().enumerate() {
        let code = table
            .get(symbol)
            .ok_or(Error::UnknownSymbol { position })?;
        body.push_code(code);
    }

    let coded_bits = body.bit_len();
    let pad = padding_for(coded_bits);
    for _ in 0..pad {
        body.push_bit(false);
    }

    let body = body.finish()?;
    let mut bytes = Vec::with_capacity(body.len() + 1);
    bytes.push(pad);
    bytes.extend_from_slice(&body);

    debug!(symbols = symbols.len(), coded_bits, pad, bytes = bytes.len(), "packed");
    Ok(EncodedPayload { bytes })
}

/// Strip the padding header and decode the body by greedy code matching.
///
/// # Errors
/// - `Error::MissingCodeTable` if `reverse` is empty.
/// - `Error::Truncated` if there is no header byte.
/// - `Error::InvalidPadding` if the header is outside `1..=8` or exceeds the body.
/// - `Error::UnknownCode` if a run of bits matches no code.
pub fn unpack<S: Symbol>(payload: &[u8], reverse: &ReverseMapping<S>) -> Result<Vec<S>> {
    if reverse.is_empty() {
        return Err(Error::MissingCodeTable);
    }
    let Some((&pad, body)) = payload.split_first() else {
        return Err(Error::Truncated {
            needed: 1,
            available: 0,
        });
    };

    let body_bits = body.len() * 8;
    if !(1..=8).contains(&pad) || usize::from(pad) > body_bits {
        return Err(Error::InvalidPadding { pad, body_bits });
    }
    let coded_bits = body_bits - usize::from(pad);

    let max_len = reverse.max_len();
    let mut out = Vec::new();
    let mut pending = Code::empty();
    let mut start = 0;

    for i in 0..coded_bits {
        let bit = (body[i / 8] >> (7 - i % 8)) & 1 == 1;
        pending = match pending.child(bit) {
            Some(c) if c.len() <= max_len => c,
            _ => {
                return Err(Error::UnknownCode {
                    offset: start,
                    pending: format!("{pending}{}", u8::from(bit)),
                })
            }
        };
        if let Some(symbol) = reverse.get(&pending) {
            out.push(symbol);
            pending = Code::empty();
            start = i + 1;
        }
    }

    if !pending.is_empty() {
        return Err(Error::UnknownCode {
            offset: start,
            pending: pending.to_string(),
        });
    }

    debug!(coded_bits, pad, symbols = out.len(), "unpacked");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::generate_codes;
    use crate::frequency::FrequencyTable;
    use crate::tree::HuffmanTree;

    fn codes_for(symbols: &[u8]) -> (CodeTable<u8>, ReverseMapping<u8>) {
        let tree = HuffmanTree::build(&FrequencyTable::analyze(symbols).unwrap()).unwrap();
        generate_codes(&tree).unwrap()
    }

    #[test]
    fn test_abracadabra_layout() {
        let input = b"abracadabra";
        let (table, reverse) = codes_for(input);
        let payload = pack(input, &table).unwrap();

        // 23 coded bits: a=0 b=110 r=111 c=100 d=101
        assert_eq!(payload.padding(), Some(1));
        assert_eq!(payload.coded_bits(), Some(23));
        assert_eq!(
            payload.to_string(),
            concat!("00000001", "01101110", "10001010", "11011100")
        );
        assert_eq!(unpack(payload.as_bytes(), &reverse).unwrap(), input.to_vec());
    }

    #[test]
    fn test_aligned_body_gets_full_pad_byte() {
        // Two symbols, one bit each: 8 symbols -> exactly 8 coded bits.
        let input = b"abababab";
        let (table, reverse) = codes_for(input);
        let payload = pack(input, &table).unwrap();

        assert_eq!(payload.padding(), Some(8));
        assert_eq!(payload.len(), 3);
        assert_eq!(payload.as_bytes()[2], 0);
        assert_eq!(unpack(payload.as_bytes(), &reverse).unwrap(), input.to_vec());
    }

    #[test]
    fn test_unknown_symbol() {
        let (table, _) = codes_for(b"ab");
        assert!(matches!(
            pack(b"abc", &table),
            Err(Error::UnknownSymbol { position: 2 })
        ));
    }

    #[test]
    fn test_trailing_partial_code() {
        // c=00 b=01 a=1; the coded bits "010" leave a lone 0 behind.
        let (_, reverse) = codes_for(b"aaaabbc");
        let payload = EncodedPayload::from_bit_str(concat!("00000101", "01000000")).unwrap();
        match unpack(payload.as_bytes(), &reverse) {
            Err(Error::UnknownCode { offset, pending }) => {
                assert_eq!(offset, 2);
                assert_eq!(pending, "0");
            }
            other => panic!("expected UnknownCode, got {other:?}"),
        }
    }

    #[test]
    fn test_code_longer_than_any_known() {
        // Only "0" is known, so "11" is rejected at its second bit.
        let reverse = CodeTable::from_leaf_lengths(&[(b'x', 1)]).unwrap().reverse();
        match unpack(&[6, 0b1100_0000], &reverse) {
            Err(Error::UnknownCode { offset, pending }) => {
                assert_eq!(offset, 0);
                assert_eq!(pending, "11");
            }
            other => panic!("expected UnknownCode, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_headers() {
        let (_, reverse) = codes_for(b"ab");
        assert!(matches!(
            unpack(&[], &reverse),
            Err(Error::Truncated { needed: 1, .. })
        ));
        assert!(matches!(
            unpack(&[0, 0xFF], &reverse),
            Err(Error::InvalidPadding { pad: 0, .. })
        ));
        assert!(matches!(
            unpack(&[9, 0xFF, 0xFF], &reverse),
            Err(Error::InvalidPadding { pad: 9, .. })
        ));
        assert!(matches!(
            unpack(&[8], &reverse),
            Err(Error::InvalidPadding { pad: 8, body_bits: 0 })
        ));
        assert!(matches!(
            unpack(&[8, 0], &ReverseMapping::<u8>::default()),
            Err(Error::MissingCodeTable)
        ));
    }

    #[test]
    fn test_bit_str_parsing() {
        assert!(matches!(
            EncodedPayload::from_bit_str("000000011"),
            Err(Error::MisalignedInput { bits: 9 })
        ));
        assert!(matches!(
            EncodedPayload::from_bit_str("0000x001"),
            Err(Error::InvalidBit {
                position: 4,
                found: 'x'
            })
        ));
        let payload = EncodedPayload::from_bit_str("0000100010000000").unwrap();
        assert_eq!(payload.as_bytes(), &[8, 0x80]);
        assert_eq!(payload.coded_bits(), Some(0));
    }

    #[test]
    fn test_writer_rejects_partial_byte() {
        let mut w = BitWriter::new();
        w.push_bit(true);
        assert!(matches!(w.finish(), Err(Error::MisalignedInput { bits: 1 })));
    }
}
