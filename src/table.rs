//! Indexed string table backed by the Huffman pipeline.

use crate::bitbuf::BitBuf;
use crate::decode::Chars;
use crate::error::{Error, Result};
use crate::huffman::{self, Entry, Node, NO_CHILD};

/// A compile-time-built table of Huffman-compressed strings with by-index
/// lookup.
///
/// The three const parameters are the entry count, the node count and the
/// bit-stream byte count. They are produced by the sizing pre-passes
/// ([`huffman::node_count`], [`huffman::stream_bytes`]) at the use site;
/// the [`huff_table!`](crate::huff_table) macro writes the whole
/// incantation. The value is plain data — no references, no heap — and
/// belongs in a `static`, where it occupies read-only memory.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTable<const N: usize, const NODES: usize, const BYTES: usize> {
    entries: [Entry; N],
    stream: BitBuf<BYTES>,
    nodes: [Node; NODES],
}

impl<const N: usize, const NODES: usize, const BYTES: usize> HuffmanTable<N, NODES, BYTES> {
    /// Encode `strings` into a table.
    ///
    /// # Panics
    ///
    /// Panics — failing the build when evaluated in const context — if
    /// the const parameters disagree with what the sizing pre-passes
    /// return for `strings`, or if the corpus contains no bytes at all.
    pub const fn new(strings: &[&str]) -> Self {
        assert!(strings.len() == N, "string count does not match table arity");

        let counts = huffman::count_freqs(strings);
        let (mut arena, used) = huffman::build_arena(&counts);
        assert!(used == NODES, "node count does not match table arity");
        huffman::assign_bfs_indices(&mut arena, used);
        let flat = huffman::flatten(&arena, used);
        let codes = huffman::build_codes(&arena, used);

        let mut nodes = [Node::Leaf(0); NODES];
        let mut i = 0;
        while i < NODES {
            nodes[i] = flat[i];
            i += 1;
        }

        let mut stream = BitBuf::new();
        let mut entries = [Entry {
            first_bit: 0,
            len: 0,
        }; N];
        huffman::emit_into(strings, &codes, &mut stream, &mut entries);

        Self {
            entries,
            stream,
            nodes,
        }
    }

    /// Number of strings stored.
    pub const fn count(&self) -> usize {
        N
    }

    /// Decode the string at `index`, lazily.
    ///
    /// An out-of-range index returns the empty iterator.
    pub const fn get(&self, index: usize) -> Chars<'_> {
        if index >= N {
            return Chars::empty();
        }
        Chars::new(&self.nodes, self.stream.as_bytes(), self.entries[index])
    }

    /// Structurally validate the artifact.
    ///
    /// Checks that every internal node links to in-range children at
    /// strictly larger indices (the shape breadth-first numbering always
    /// produces) and that every non-empty entry starts inside the bit
    /// stream. A table built by [`HuffmanTable::new`] always passes; a
    /// table image damaged in storage generally will not.
    pub fn verify(&self) -> Result<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Internal { zero, one } = *node {
                for child in [zero, one] {
                    if child == NO_CHILD || child as usize >= NODES {
                        return Err(Error::DanglingChild {
                            node: index as u16,
                            child,
                        });
                    }
                    if child as usize <= index {
                        return Err(Error::ChildOutOfOrder {
                            node: index as u16,
                            child,
                        });
                    }
                }
            }
        }
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.len > 0 && entry.first_bit >= self.stream.capacity() {
                return Err(Error::EntryOutOfBounds { index });
            }
        }
        Ok(())
    }
}
