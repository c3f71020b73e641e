//! Huffman tree construction.
//!
//! The tree lives in an arena: every node is an entry of one `Vec`, and
//! internal nodes refer to their children by index. Leaves occupy the first
//! slots in first-seen order, merged nodes are appended as they are created,
//! so a node's index doubles as its insertion sequence number.
//!
//! # Tie-breaking
//!
//! The queue orders nodes by `(freq, index)`. Among nodes of equal frequency
//! the one inserted earlier wins, which is exactly the order a stable re-sort
//! of the whole queue after every merge would produce. Output is therefore
//! bit-identical to that simpler (and quadratic) scheme while each merge only
//! costs O(log n).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;

/// Index of a node inside a [`HuffmanTree`].
pub type NodeId = usize;

/// Huffman tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S> {
    /// A symbol and its count.
    Leaf {
        /// The coded symbol.
        symbol: S,
        /// Occurrences of `symbol`.
        freq: u64,
    },
    /// A merge of two subtrees.
    Internal {
        /// Subtree reached with a `0` bit.
        left: NodeId,
        /// Subtree reached with a `1` bit.
        right: NodeId,
        /// Sum of both children.
        freq: u64,
    },
}

impl<S> Node<S> {
    /// Weight of this node.
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A Huffman tree built from a [`FrequencyTable`].
#[derive(Debug, Clone)]
pub struct HuffmanTree<S> {
    nodes: Vec<Node<S>>,
    root: NodeId,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Greedily merge the two lightest nodes until one root remains.
    ///
    /// The first node removed becomes the left child, the second the right.
    /// With a single distinct symbol the root is that symbol's leaf.
    pub fn build(freqs: &FrequencyTable<S>) -> Result<Self> {
        let distinct = freqs.len();
        let mut nodes = Vec::with_capacity(2 * distinct);
        let mut pq = BinaryHeap::with_capacity(distinct);

        for (symbol, freq) in freqs.iter() {
            pq.push(Reverse((freq, nodes.len())));
            nodes.push(Node::Leaf { symbol, freq });
        }

        let root = loop {
            let Some(Reverse((left_freq, left))) = pq.pop() else {
                return Err(Error::EmptyInput);
            };
            let Some(Reverse((right_freq, right))) = pq.pop() else {
                break left;
            };

            let freq = left_freq + right_freq;
            trace!(left, right, freq, "merge");
            pq.push(Reverse((freq, nodes.len())));
            nodes.push(Node::Internal { left, right, freq });
        };

        debug!(distinct, nodes = nodes.len(), "built huffman tree");
        Ok(Self { nodes, root })
    }
}

impl<S> HuffmanTree<S> {
    /// Index of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node at `id`.
    ///
    /// # Panics
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id]
    }

    /// All nodes, leaves first.
    pub fn nodes(&self) -> &[Node<S>] {
        &self.nodes
    }

    /// Number of leaves (distinct symbols).
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Total weight, i.e. the length of the input the tree was built from.
    pub fn total_freq(&self) -> u64 {
        self.nodes[self.root].freq()
    }
}
