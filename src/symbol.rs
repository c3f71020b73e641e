//! Symbol alphabets.
//!
//! The coder works over any [`Symbol`]: raw bytes (`u8`) for binary data, or
//! Unicode scalar values (`char`) for text, where a multi-byte character is a
//! single symbol with a single code.

use std::fmt::Debug;
use std::hash::Hash;

/// Alphabet tag recorded in the container header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// One symbol per byte.
    Byte,
    /// One symbol per Unicode scalar value.
    Char,
}

impl SymbolKind {
    /// Wire tag of this kind.
    pub fn tag(self) -> u8 {
        match self {
            SymbolKind::Byte => 0,
            SymbolKind::Char => 1,
        }
    }

    /// Parse a wire tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SymbolKind::Byte),
            1 => Some(SymbolKind::Char),
            _ => None,
        }
    }

    /// Human-readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            SymbolKind::Byte => "byte",
            SymbolKind::Char => "char",
        }
    }
}

/// A unit of input that receives its own Huffman code.
pub trait Symbol: Copy + Eq + Hash + Debug {
    /// Alphabet this symbol type belongs to.
    const KIND: SymbolKind;

    /// Append the serialized form of this symbol.
    fn write_to(self, out: &mut Vec<u8>);

    /// Read one symbol from the front of `input`.
    ///
    /// Returns the symbol and the number of bytes consumed, or `None` if
    /// `input` does not start with a valid encoding.
    fn read_from(input: &[u8]) -> Option<(Self, usize)>;
}

impl Symbol for u8 {
    const KIND: SymbolKind = SymbolKind::Byte;

    fn write_to(self, out: &mut Vec<u8>) {
        out.push(self);
    }

    fn read_from(input: &[u8]) -> Option<(Self, usize)> {
        input.first().map(|&b| (b, 1))
    }
}

impl Symbol for char {
    const KIND: SymbolKind = SymbolKind::Char;

    fn write_to(self, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(self.encode_utf8(&mut buf).as_bytes());
    }

    fn read_from(input: &[u8]) -> Option<(Self, usize)> {
        let width = utf8_width(*input.first()?)?;
        let bytes = input.get(..width)?;
        let c = std::str::from_utf8(bytes).ok()?.chars().next()?;
        Some((c, width))
    }
}

// Length of a UTF-8 sequence from its lead byte.
fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_serialization() {
        for c in ['a', 'é', '€', '🦀'] {
            let mut out = Vec::new();
            c.write_to(&mut out);
            assert_eq!(out.len(), c.len_utf8());
            assert_eq!(char::read_from(&out), Some((c, c.len_utf8())));
        }
    }

    #[test]
    fn test_char_rejects_bad_utf8() {
        assert_eq!(char::read_from(&[0xFF]), None);
        assert_eq!(char::read_from(&[0xE2, 0x82]), None);
        assert_eq!(char::read_from(&[]), None);
    }

    #[test]
    fn test_kind_tags() {
        for kind in [SymbolKind::Byte, SymbolKind::Char] {
            assert_eq!(SymbolKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(SymbolKind::from_tag(7), None);
        assert_eq!(<u8 as Symbol>::KIND, SymbolKind::Byte);
    }
}
