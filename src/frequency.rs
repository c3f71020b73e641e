//! Symbol frequency analysis.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::symbol::Symbol;

/// Occurrence counts per symbol, iterated in first-seen order.
///
/// A table is never empty: [`FrequencyTable::analyze`] rejects empty input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: IndexMap<S, u64>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Count every symbol of `symbols` in one pass.
    ///
    /// # Errors
    /// Returns `Error::EmptyInput` if `symbols` is empty.
    pub fn analyze(symbols: &[S]) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut counts = IndexMap::new();
        for &s in symbols {
            *counts.entry(s).or_insert(0u64) += 1;
        }
        Ok(Self { counts })
    }

    /// Count of `symbol`, if it occurs.
    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.counts.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no symbols were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// `(symbol, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abracadabra_counts() {
        let text: Vec<char> = "abracadabra".chars().collect();
        let freqs = FrequencyTable::analyze(&text).unwrap();

        let pairs: Vec<_> = freqs.iter().collect();
        assert_eq!(
            pairs,
            vec![('a', 5), ('b', 2), ('r', 2), ('c', 1), ('d', 1)]
        );
        assert_eq!(freqs.total(), 11);
        assert_eq!(freqs.get(&'z'), None);
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty: [u8; 0] = [];
        assert!(matches!(
            FrequencyTable::analyze(&empty),
            Err(Error::EmptyInput)
        ));
    }
}
