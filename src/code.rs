//! Code tables.
//!
//! A [`CodeTable`] maps each symbol to its [`Code`]; a [`ReverseMapping`] maps
//! codes back to symbols for decoding. Both are generated together by a
//! depth-first walk of a [`HuffmanTree`], or rebuilt from a persisted list of
//! code lengths in leaf order (see [`CodeTable::from_leaf_lengths`]).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::symbol::Symbol;
use crate::tree::{HuffmanTree, Node};

/// Longest code a [`Code`] can hold.
///
/// A Huffman tree over `n` symbols of total weight `w` is at most
/// `log_phi(w)` deep, so 64-bit counts stay well below this.
pub const MAX_CODE_LEN: u8 = 128;

/// A prefix code: up to [`MAX_CODE_LEN`] bits, first bit most significant.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    /// The empty code.
    pub const fn empty() -> Self {
        Self { bits: 0, len: 0 }
    }

    /// Build a code from the `len` low bits of `bits`.
    pub fn from_bits(bits: u128, len: u8) -> Option<Self> {
        if len > MAX_CODE_LEN || (len < MAX_CODE_LEN && bits >> len != 0) {
            return None;
        }
        Some(Self { bits, len })
    }

    /// The code bits as an integer (first bit most significant).
    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Number of bits.
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Whether the code has no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// This code extended by one bit, or `None` at [`MAX_CODE_LEN`].
    pub fn child(&self, bit: bool) -> Option<Self> {
        if self.len == MAX_CODE_LEN {
            return None;
        }
        Some(Self {
            bits: (self.bits << 1) | bit as u128,
            len: self.len + 1,
        })
    }

    /// Bit `i`, counting from the first (most significant) bit.
    pub fn bit(&self, i: u8) -> bool {
        debug_assert!(i < self.len);
        (self.bits >> (self.len - 1 - i)) & 1 == 1
    }

    /// Bits in transmission order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bit(i))
    }

    /// Whether `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len
            && other
                .bits
                .checked_shr(u32::from(other.len - self.len))
                .unwrap_or(0)
                == self.bits
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({self})")
    }
}

impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut code = Code::empty();
        for (position, c) in s.chars().enumerate() {
            let bit = match c {
                '0' => false,
                '1' => true,
                found => return Err(Error::InvalidBit { position, found }),
            };
            code = code.child(bit).ok_or_else(|| {
                Error::InvalidCodeTable(format!("code longer than {MAX_CODE_LEN} bits"))
            })?;
        }
        Ok(code)
    }
}

/// Symbol → code mapping, entries in left-to-right leaf order.
#[derive(Clone, Debug)]
pub struct CodeTable<S: Symbol> {
    entries: Vec<(S, Code)>,
    index: HashMap<S, usize>,
}

impl<S: Symbol> CodeTable<S> {
    /// Walk `tree` depth-first, `0` to the left and `1` to the right.
    ///
    /// A tree that is a single leaf gets the one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree<S>) -> Result<Self> {
        let mut entries = Vec::new();
        let mut stack = vec![(tree.root(), Code::empty())];

        while let Some((id, code)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf { symbol, .. } => {
                    let code = if code.is_empty() {
                        Code { bits: 0, len: 1 }
                    } else {
                        code
                    };
                    entries.push((*symbol, code));
                }
                Node::Internal { left, right, .. } => {
                    let (Some(l), Some(r)) = (code.child(false), code.child(true)) else {
                        return Err(Error::InvalidCodeTable(format!(
                            "tree deeper than {MAX_CODE_LEN} levels"
                        )));
                    };
                    // Right is pushed first so the left subtree is visited first.
                    stack.push((*right, r));
                    stack.push((*left, l));
                }
            }
        }

        Self::from_entries(entries)
    }

    /// Rebuild a table from symbols and code lengths in leaf order.
    ///
    /// Leaves of a full binary tree, read left to right, carry consecutive
    /// codes: each code is the previous one plus one, rescaled to its own
    /// length. The sequence must start at all zeros and end at all ones.
    ///
    /// # Errors
    /// Returns `Error::MissingCodeTable` for an empty list and
    /// `Error::InvalidCodeTable` if the lengths do not describe a complete
    /// prefix code, or if a symbol repeats.
    pub fn from_leaf_lengths(leaves: &[(S, u8)]) -> Result<Self> {
        let invalid = |msg: &str| Error::InvalidCodeTable(msg.to_string());

        match leaves {
            [] => return Err(Error::MissingCodeTable),
            [(symbol, len)] => {
                if *len != 1 {
                    return Err(invalid("a single symbol must have a 1-bit code"));
                }
                return Self::from_entries(vec![(*symbol, Code { bits: 0, len: 1 })]);
            }
            _ => {}
        }

        let mut entries = Vec::with_capacity(leaves.len());
        let mut prev: Option<Code> = None;

        for &(symbol, len) in leaves {
            if len == 0 || len > MAX_CODE_LEN {
                return Err(invalid("code length out of range"));
            }
            let bits = match prev {
                None => 0,
                Some(p) => {
                    let next = p
                        .bits
                        .checked_add(1)
                        .filter(|&n| p.len == MAX_CODE_LEN || n >> p.len == 0)
                        .ok_or_else(|| invalid("code space exhausted"))?;
                    if len >= p.len {
                        next << (len - p.len)
                    } else {
                        let drop = p.len - len;
                        if next & ((1u128 << drop) - 1) != 0 {
                            return Err(invalid("overlapping codes"));
                        }
                        next >> drop
                    }
                }
            };
            let code = Code { bits, len };
            entries.push((symbol, code));
            prev = Some(code);
        }

        match prev {
            Some(last) if last.bits == all_ones(last.len) => Self::from_entries(entries),
            _ => Err(invalid("incomplete code")),
        }
    }

    fn from_entries(entries: Vec<(S, Code)>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, (symbol, _)) in entries.iter().enumerate() {
            if index.insert(*symbol, i).is_some() {
                return Err(Error::InvalidCodeTable(format!(
                    "duplicate symbol {symbol:?}"
                )));
            }
        }
        Ok(Self { entries, index })
    }

    /// Code assigned to `symbol`.
    pub fn get(&self, symbol: &S) -> Option<Code> {
        self.index.get(symbol).map(|&i| self.entries[i].1)
    }

    /// Number of coded symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(symbol, code)` pairs in leaf order.
    pub fn iter(&self) -> impl Iterator<Item = (S, Code)> + '_ {
        self.entries.iter().copied()
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> u8 {
        self.entries.iter().map(|(_, c)| c.len).max().unwrap_or(0)
    }

    /// Sum of `2^-len` over all codes.
    pub fn kraft_sum(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, c)| 2f64.powi(-i32::from(c.len)))
            .sum()
    }

    /// Invert the table for decoding.
    pub fn reverse(&self) -> ReverseMapping<S> {
        ReverseMapping {
            map: self.entries.iter().map(|&(s, c)| (c, s)).collect(),
            max_len: self.max_len(),
        }
    }
}

fn all_ones(len: u8) -> u128 {
    if len >= MAX_CODE_LEN {
        u128::MAX
    } else {
        (1u128 << len) - 1
    }
}

/// Generate both directions of the code for `tree`.
pub fn generate_codes<S: Symbol>(
    tree: &HuffmanTree<S>,
) -> Result<(CodeTable<S>, ReverseMapping<S>)> {
    let table = CodeTable::from_tree(tree)?;
    let reverse = table.reverse();
    Ok((table, reverse))
}

/// Code → symbol mapping used by the decoder.
#[derive(Clone, Debug)]
pub struct ReverseMapping<S> {
    map: HashMap<Code, S>,
    max_len: u8,
}

impl<S: Symbol> ReverseMapping<S> {
    /// Symbol for an exact code match.
    pub fn get(&self, code: &Code) -> Option<S> {
        self.map.get(code).copied()
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the mapping has no codes.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Length of the longest code.
    pub fn max_len(&self) -> u8 {
        self.max_len
    }
}

impl<S> Default for ReverseMapping<S> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            max_len: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use proptest::prelude::*;

    fn table_for(text: &str) -> CodeTable<char> {
        let symbols: Vec<char> = text.chars().collect();
        let tree = HuffmanTree::build(&FrequencyTable::analyze(&symbols).unwrap()).unwrap();
        CodeTable::from_tree(&tree).unwrap()
    }

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    #[test]
    fn test_abracadabra_codes() {
        let table = table_for("abracadabra");
        assert_eq!(table.get(&'a'), Some(code("0")));
        assert_eq!(table.get(&'c'), Some(code("100")));
        assert_eq!(table.get(&'d'), Some(code("101")));
        assert_eq!(table.get(&'b'), Some(code("110")));
        assert_eq!(table.get(&'r'), Some(code("111")));

        let order: Vec<char> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec!['a', 'c', 'd', 'b', 'r']);
        assert_eq!(table.kraft_sum(), 1.0);
    }

    #[test]
    fn test_single_symbol_gets_zero() {
        let table = table_for("aaaa");
        assert_eq!(table.get(&'a'), Some(code("0")));
        let reverse = table.reverse();
        assert_eq!(reverse.get(&code("0")), Some('a'));
        assert_eq!(reverse.max_len(), 1);
    }

    #[test]
    fn test_code_display_and_prefix() {
        let c = code("0110");
        assert_eq!(c.to_string(), "0110");
        assert_eq!(format!("{c:?}"), "Code(0110)");
        assert!(code("01").is_prefix_of(&c));
        assert!(!code("1").is_prefix_of(&c));
        assert!(Code::empty().is_prefix_of(&c));
        assert!(matches!(
            "012".parse::<Code>(),
            Err(Error::InvalidBit {
                position: 2,
                found: '2'
            })
        ));
    }

    #[test]
    fn test_code_from_bits_bounds() {
        assert_eq!(Code::from_bits(0b101, 3), Some(code("101")));
        assert_eq!(Code::from_bits(0b1000, 3), None);
        assert!(Code::from_bits(u128::MAX, 128).is_some());
        assert_eq!(Code::from_bits(0, 129), None);
    }

    #[test]
    fn test_leaf_lengths_rebuild_tree_codes() {
        let table = table_for("abracadabra");
        let lengths: Vec<(char, u8)> = table.iter().map(|(s, c)| (s, c.len())).collect();
        let rebuilt = CodeTable::from_leaf_lengths(&lengths).unwrap();
        for (s, c) in table.iter() {
            assert_eq!(rebuilt.get(&s), Some(c));
        }
    }

    #[test]
    fn test_leaf_lengths_rejects_bad_tables() {
        // Over-subscribed: three 1-bit codes.
        assert!(matches!(
            CodeTable::from_leaf_lengths(&[(1u8, 1), (2, 1), (3, 1)]),
            Err(Error::InvalidCodeTable(_))
        ));
        // Incomplete: 0, 10 and nothing for 11.
        assert!(matches!(
            CodeTable::from_leaf_lengths(&[(1u8, 1), (2, 2)]),
            Err(Error::InvalidCodeTable(_))
        ));
        // Overlap: 00 then a 1-bit code would have to be 0 again.
        assert!(matches!(
            CodeTable::from_leaf_lengths(&[(1u8, 2), (2, 1), (3, 2)]),
            Err(Error::InvalidCodeTable(_))
        ));
        // Duplicate symbol.
        assert!(matches!(
            CodeTable::from_leaf_lengths(&[(1u8, 1), (1, 1)]),
            Err(Error::InvalidCodeTable(_))
        ));
        assert!(matches!(
            CodeTable::from_leaf_lengths(&[(1u8, 2)]),
            Err(Error::InvalidCodeTable(_))
        ));
        assert!(matches!(
            CodeTable::<u8>::from_leaf_lengths(&[]),
            Err(Error::MissingCodeTable)
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_codes_are_prefix_free(
            input in prop::collection::vec(any::<u8>(), 1..300),
        ) {
            let tree = HuffmanTree::build(&FrequencyTable::analyze(&input).unwrap()).unwrap();
            let (table, reverse) = generate_codes(&tree).unwrap();

            let codes: Vec<Code> = table.iter().map(|(_, c)| c).collect();
            for (i, a) in codes.iter().enumerate() {
                for (j, b) in codes.iter().enumerate() {
                    if i != j {
                        prop_assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                    }
                }
            }

            prop_assert!(table.kraft_sum() <= 1.0);
            prop_assert_eq!(reverse.len(), table.len());
            for (s, c) in table.iter() {
                prop_assert_eq!(reverse.get(&c), Some(s));
            }
        }
    }
}
