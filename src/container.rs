//! Self-contained file format.
//!
//! A bare [`EncodedPayload`] cannot be decoded without the code table that
//! produced it. The container stores that table in front of the payload:
//!
//! ```text
//! bytes 0..4  : magic "HFPK"
//! byte 4      : format version (1)
//! byte 5      : symbol kind (0 = byte, 1 = char)
//! bytes 6..10 : leaf count, u32 little-endian
//! per leaf    : symbol bytes, then its code length (1 byte)
//! rest        : padding header + coded body
//! ```
//!
//! Leaves are listed in left-to-right tree order. Together with their lengths
//! this pins down every code exactly (see [`CodeTable::from_leaf_lengths`]),
//! so the decoder reproduces the encoder's codes without renumbering them.

use crate::code::CodeTable;
use crate::error::{Error, Result};
use crate::pack::EncodedPayload;
use crate::symbol::{Symbol, SymbolKind};

/// Leading bytes of every container.
pub const MAGIC: [u8; 4] = *b"HFPK";

/// Current format version.
pub const VERSION: u8 = 1;

const FIXED_HEADER_LEN: usize = 10;

/// Serialize `table` and `payload` into one buffer.
pub fn write<S: Symbol>(table: &CodeTable<S>, payload: &EncodedPayload) -> Result<Vec<u8>> {
    let leaf_count = u32::try_from(table.len())
        .map_err(|_| Error::InvalidCodeTable("too many symbols".to_string()))?;

    let mut out = Vec::with_capacity(FIXED_HEADER_LEN + table.len() * 2 + payload.len());
    out.extend_from_slice(&MAGIC);
    out.push(VERSION);
    out.push(S::KIND.tag());
    out.extend_from_slice(&leaf_count.to_le_bytes());
    for (symbol, code) in table.iter() {
        symbol.write_to(&mut out);
        out.push(code.len());
    }
    out.extend_from_slice(payload.as_bytes());
    Ok(out)
}

/// A parsed container: the rebuilt code table and the raw payload bytes.
#[derive(Debug)]
pub struct Container<'a, S: Symbol> {
    /// Code table rebuilt from the persisted leaf lengths.
    pub table: CodeTable<S>,
    /// Padding header and coded body.
    pub payload: &'a [u8],
}

/// Parse a container written by [`write`].
///
/// # Errors
/// `BadMagic`, `UnsupportedVersion`, `SymbolKindMismatch`, `Truncated`,
/// `InvalidSymbol`, `MissingCodeTable` (zero leaves) or `InvalidCodeTable`.
pub fn read<S: Symbol>(input: &[u8]) -> Result<Container<'_, S>> {
    let header = input.get(..FIXED_HEADER_LEN).ok_or(Error::Truncated {
        needed: FIXED_HEADER_LEN,
        available: input.len(),
    })?;
    if header[..4] != MAGIC {
        return Err(Error::BadMagic);
    }
    if header[4] != VERSION {
        return Err(Error::UnsupportedVersion(header[4]));
    }
    let kind = SymbolKind::from_tag(header[5]).ok_or(Error::InvalidSymbol { offset: 5 })?;
    if kind != S::KIND {
        return Err(Error::SymbolKindMismatch {
            expected: S::KIND.name(),
            found: kind.name(),
        });
    }
    let leaf_count = u32::from_le_bytes([header[6], header[7], header[8], header[9]]) as usize;
    if leaf_count == 0 {
        return Err(Error::MissingCodeTable);
    }

    let mut pos = FIXED_HEADER_LEN;
    // Every leaf needs at least two bytes; don't trust the count for allocation.
    let mut leaves = Vec::with_capacity(leaf_count.min((input.len() - pos) / 2));
    for _ in 0..leaf_count {
        let rest = &input[pos..];
        if rest.is_empty() {
            return Err(Error::Truncated {
                needed: pos + 2,
                available: input.len(),
            });
        }
        let (symbol, width) = S::read_from(rest).ok_or(Error::InvalidSymbol { offset: pos })?;
        let len = *rest.get(width).ok_or(Error::Truncated {
            needed: pos + width + 1,
            available: input.len(),
        })?;
        leaves.push((symbol, len));
        pos += width + 1;
    }

    let table = CodeTable::from_leaf_lengths(&leaves)?;
    Ok(Container {
        table,
        payload: &input[pos..],
    })
}
