//! Compile-time Huffman pipeline: frequency analysis, tree construction,
//! flattening, code derivation and bit-stream emission.
//!
//! Every stage is a `const fn`, so the whole encoder runs during constant
//! evaluation and the result is plain data. Array lengths stored in the
//! final artifact must be compile-time constants, which forces the
//! two-pass shape visible in the public surface: [`node_count`] and
//! [`stream_bytes`] simulate just enough of the build to return a length,
//! and the artifact constructors then redo the work into arrays of exactly
//! that length. Transient state (the frequency table, the node arena, the
//! BFS queue) lives in fixed maximum-capacity arrays instead — with a byte
//! alphabet the tree can never exceed 511 nodes.
//!
//! Code words are stored bit-reversed: walking a leaf's parent links
//! appends bits lowest-position-first, so bit `i` of the stored pattern is
//! bit `len - 1 - i` of the root-to-leaf code word. Emission reads the
//! pattern from its high end down, which restores root-to-leaf order
//! without a separate reversal pass.

use crate::heap::{MinHeap, Weighted};
use crate::queue::Fifo;

/// Sentinel child index meaning "no such node".
///
/// Never produced by a well-formed build; the decoder treats it as
/// artifact corruption.
pub const NO_CHILD: u16 = u16::MAX;

pub(crate) const MAX_SYMBOLS: usize = 256;
pub(crate) const MAX_NODES: usize = 2 * MAX_SYMBOLS - 1;

/// A flattened tree node.
///
/// Index 0 of a node array is always the root, and children always sit at
/// larger indices than their parent (both guaranteed by the breadth-first
/// numbering).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    /// A terminal node carrying a decoded byte.
    Leaf(u8),
    /// A branch; a clear bit selects `zero`, a set bit selects `one`.
    Internal {
        /// Index of the child reached on a clear bit.
        zero: u16,
        /// Index of the child reached on a set bit.
        one: u16,
    },
}

/// Location of one encoded string within the shared bit stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Absolute bit offset at which the string's code words begin.
    pub first_bit: usize,
    /// Length of the source string in bytes (not bits).
    pub len: usize,
}

/// Per-symbol code word, pattern stored bit-reversed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Code {
    pub len: u8,
    pub bits: u128,
}

/// Transient tree node used only while building; the artifact keeps the
/// flattened [`Node`] form.
#[derive(Clone, Copy)]
pub(crate) struct TreeNode {
    weight: usize,
    symbol: u8,
    leaf: bool,
    zero: u16,
    one: u16,
    parent: u16,
    index: u16,
}

const EMPTY_NODE: TreeNode = TreeNode {
    weight: 0,
    symbol: 0,
    leaf: true,
    zero: NO_CHILD,
    one: NO_CHILD,
    parent: NO_CHILD,
    index: 0,
};

/// Count how often each byte value occurs across the corpus.
pub const fn count_freqs(strings: &[&str]) -> [usize; 256] {
    let mut counts = [0usize; 256];
    let mut i = 0;
    while i < strings.len() {
        let bytes = strings[i].as_bytes();
        let mut j = 0;
        while j < bytes.len() {
            counts[bytes[j] as usize] += 1;
            j += 1;
        }
        i += 1;
    }
    counts
}

/// Count byte occurrences across the string halves of keyed pairs.
pub const fn count_freqs_keyed(pairs: &[(u32, &str)]) -> [usize; 256] {
    let mut counts = [0usize; 256];
    let mut i = 0;
    while i < pairs.len() {
        let bytes = pairs[i].1.as_bytes();
        let mut j = 0;
        while j < bytes.len() {
            counts[bytes[j] as usize] += 1;
            j += 1;
        }
        i += 1;
    }
    counts
}

/// Seed a heap with one `(count, slot)` element per symbol present, slots
/// assigned in ascending symbol order. A single-symbol corpus gets a
/// zero-weight dummy sibling so the real symbol still receives a 1-bit
/// code; a corpus with no bytes at all has nothing to build a tree from
/// and fails the build.
const fn seed_leaves(counts: &[usize; 256]) -> (MinHeap<MAX_SYMBOLS>, usize) {
    let mut heap: MinHeap<MAX_SYMBOLS> = MinHeap::new();
    let mut slots = 0;
    let mut sym = 0;
    while sym < 256 {
        if counts[sym] != 0 {
            heap.push(Weighted {
                weight: counts[sym],
                tag: slots as u16,
            });
            slots += 1;
        }
        sym += 1;
    }
    assert!(slots > 0, "corpus contains no symbols to encode");
    if slots == 1 {
        heap.push(Weighted { weight: 0, tag: 1 });
        slots = 2;
    }
    (heap, slots)
}

/// Exact number of tree nodes the corpus needs.
///
/// Runs the merge loop on weights alone, counting the allocations the
/// real build will make. Usable in const-generic position; panics (fails
/// the build) on a corpus with no bytes.
pub const fn node_count(strings: &[&str]) -> usize {
    node_count_from(&count_freqs(strings))
}

/// [`node_count`] over keyed pairs.
pub const fn node_count_keyed(pairs: &[(u32, &str)]) -> usize {
    node_count_from(&count_freqs_keyed(pairs))
}

const fn node_count_from(counts: &[usize; 256]) -> usize {
    let (mut heap, leaves) = seed_leaves(counts);
    let mut total = leaves;
    let mut tag = leaves as u16;
    while heap.len() > 1 {
        let a = heap.pop();
        let b = heap.pop();
        total += 1;
        heap.push(Weighted {
            weight: a.weight + b.weight,
            tag,
        });
        tag += 1;
    }
    total
}

/// Build the slot-linked tree in a fixed arena.
///
/// Leaves occupy the low slots in ascending symbol order; each merge
/// allocates the next free slot, so the root is always the last slot.
/// Returns the arena and the number of slots used.
pub(crate) const fn build_arena(counts: &[usize; 256]) -> ([TreeNode; MAX_NODES], usize) {
    let mut arena = [EMPTY_NODE; MAX_NODES];

    let mut next = 0;
    let mut sym = 0;
    while sym < 256 {
        if counts[sym] != 0 {
            arena[next] = TreeNode {
                weight: counts[sym],
                symbol: sym as u8,
                leaf: true,
                zero: NO_CHILD,
                one: NO_CHILD,
                parent: NO_CHILD,
                index: 0,
            };
            next += 1;
        }
        sym += 1;
    }
    let (mut heap, slots) = seed_leaves(counts);
    if slots == next + 1 {
        // dummy sibling for the single-symbol corpus; its byte value is
        // arbitrary because its code is never emitted
        arena[next] = TreeNode {
            weight: 0,
            symbol: arena[0].symbol.wrapping_add(1),
            leaf: true,
            zero: NO_CHILD,
            one: NO_CHILD,
            parent: NO_CHILD,
            index: 0,
        };
        next += 1;
    }

    while heap.len() > 1 {
        let a = heap.pop();
        let b = heap.pop();
        arena[next] = TreeNode {
            weight: a.weight + b.weight,
            symbol: 0,
            leaf: false,
            zero: a.tag,
            one: b.tag,
            parent: NO_CHILD,
            index: 0,
        };
        arena[a.tag as usize].parent = next as u16;
        arena[b.tag as usize].parent = next as u16;
        heap.push(Weighted {
            weight: a.weight + b.weight,
            tag: next as u16,
        });
        next += 1;
    }

    assert!(next <= u16::MAX as usize, "node indices exceed 16 bits");
    (arena, next)
}

/// Number the arena breadth-first from the root, so the root gets index 0
/// and every child a larger index than its parent.
pub(crate) const fn assign_bfs_indices(arena: &mut [TreeNode; MAX_NODES], used: usize) {
    let root = (used - 1) as u16;
    let mut queue: Fifo<MAX_NODES> = Fifo::new();
    queue.push_back(root);
    let mut next_index: u16 = 0;
    while !queue.is_empty() {
        let slot = queue.pop_front() as usize;
        arena[slot].index = next_index;
        next_index += 1;
        if !arena[slot].leaf {
            queue.push_back(arena[slot].zero);
            queue.push_back(arena[slot].one);
        }
    }
    assert!(
        next_index as usize == used,
        "breadth-first numbering must reach every node"
    );
}

/// Project the numbered arena into the flat array the artifact stores.
/// Only the first `used` elements of the result are meaningful.
pub(crate) const fn flatten(arena: &[TreeNode; MAX_NODES], used: usize) -> [Node; MAX_NODES] {
    let mut flat = [Node::Leaf(0); MAX_NODES];
    let mut slot = 0;
    while slot < used {
        let n = arena[slot];
        flat[n.index as usize] = if n.leaf {
            Node::Leaf(n.symbol)
        } else {
            Node::Internal {
                zero: arena[n.zero as usize].index,
                one: arena[n.one as usize].index,
            }
        };
        slot += 1;
    }
    flat
}

/// Derive per-symbol code words by walking each leaf up to the root.
///
/// The walk records, lowest position first, whether each node is its
/// parent's one-child; that is exactly the reversed pattern [`Code`]
/// stores. Symbols absent from the corpus keep a zero entry and are never
/// consulted by emission.
pub(crate) const fn build_codes(arena: &[TreeNode; MAX_NODES], used: usize) -> [Code; 256] {
    let mut codes = [Code { len: 0, bits: 0 }; 256];
    let mut slot = 0;
    while slot < used {
        if arena[slot].leaf {
            let mut len = 0;
            let mut bits: u128 = 0;
            let mut cur = slot as u16;
            while arena[cur as usize].parent != NO_CHILD {
                assert!(len < 128, "code word exceeds 128 bits");
                let parent = arena[cur as usize].parent;
                if arena[parent as usize].one == cur {
                    bits |= 1 << len;
                }
                len += 1;
                cur = parent;
            }
            codes[arena[slot].symbol as usize] = Code {
                len: len as u8,
                bits,
            };
        }
        slot += 1;
    }
    codes
}

/// Total encoded length of the corpus in bits.
///
/// Re-derives the code table to do so; the duplication is the price of
/// returning a value usable as an array length.
pub const fn stream_bits(strings: &[&str]) -> usize {
    let counts = count_freqs(strings);
    let (arena, used) = build_arena(&counts);
    let codes = build_codes(&arena, used);
    let mut total = 0;
    let mut i = 0;
    while i < strings.len() {
        let bytes = strings[i].as_bytes();
        let mut j = 0;
        while j < bytes.len() {
            total += codes[bytes[j] as usize].len as usize;
            j += 1;
        }
        i += 1;
    }
    total
}

/// [`stream_bits`] over keyed pairs.
pub const fn stream_bits_keyed(pairs: &[(u32, &str)]) -> usize {
    let counts = count_freqs_keyed(pairs);
    let (arena, used) = build_arena(&counts);
    let codes = build_codes(&arena, used);
    let mut total = 0;
    let mut i = 0;
    while i < pairs.len() {
        let bytes = pairs[i].1.as_bytes();
        let mut j = 0;
        while j < bytes.len() {
            total += codes[bytes[j] as usize].len as usize;
            j += 1;
        }
        i += 1;
    }
    total
}

/// Bytes of bit-stream storage the corpus needs.
pub const fn stream_bytes(strings: &[&str]) -> usize {
    stream_bits(strings).div_ceil(8)
}

/// [`stream_bytes`] over keyed pairs.
pub const fn stream_bytes_keyed(pairs: &[(u32, &str)]) -> usize {
    stream_bits_keyed(pairs).div_ceil(8)
}

/// Write every string's code words into `stream` and record one [`Entry`]
/// per string. The stream starts all-zero, so only set bits are written.
pub(crate) const fn emit_into<const BYTES: usize>(
    strings: &[&str],
    codes: &[Code; 256],
    stream: &mut crate::bitbuf::BitBuf<BYTES>,
    entries: &mut [Entry],
) {
    let mut pos = 0;
    let mut i = 0;
    while i < strings.len() {
        let bytes = strings[i].as_bytes();
        entries[i] = Entry {
            first_bit: pos,
            len: bytes.len(),
        };
        let mut j = 0;
        while j < bytes.len() {
            let code = codes[bytes[j] as usize];
            // high end of the reversed pattern first: root-to-leaf order
            let mut k = code.len as usize;
            while k > 0 {
                k -= 1;
                if (code.bits >> k) & 1 == 1 {
                    stream.set(pos);
                }
                pos += 1;
            }
            j += 1;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitbuf::BitBuf;
    use crate::decode::Chars;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::string::String;
    use std::vec::Vec;

    // Big enough for any corpus the tests below generate: Huffman never
    // beats 8 bits per byte the wrong way, so 8 KiB of stream covers
    // 8 KiB of input.
    type TestStream = BitBuf<8192>;

    struct Built {
        nodes: Vec<Node>,
        codes: [Code; 256],
        stream: TestStream,
        entries: Vec<Entry>,
    }

    fn build(strings: &[&str]) -> Built {
        let counts = count_freqs(strings);
        let (mut arena, used) = build_arena(&counts);
        assign_bfs_indices(&mut arena, used);
        let flat = flatten(&arena, used);
        let codes = build_codes(&arena, used);
        let mut stream = TestStream::new();
        let mut entries = vec![Entry { first_bit: 0, len: 0 }; strings.len()];
        emit_into(strings, &codes, &mut stream, &mut entries);
        Built {
            nodes: flat[..used].to_vec(),
            codes,
            stream,
            entries,
        }
    }

    fn decode_all(built: &Built) -> Vec<Vec<u8>> {
        built
            .entries
            .iter()
            .map(|&entry| Chars::new(&built.nodes, built.stream.as_bytes(), entry).collect())
            .collect()
    }

    /// Root-to-leaf code word for a symbol, as a bit vector.
    fn code_word(codes: &[Code; 256], symbol: u8) -> Vec<bool> {
        let code = codes[symbol as usize];
        (0..code.len as usize)
            .rev()
            .map(|i| (code.bits >> i) & 1 == 1)
            .collect()
    }

    #[test]
    fn counts_every_byte() {
        let counts = count_freqs(&["abracadabra"]);
        assert_eq!(counts[b'a' as usize], 5);
        assert_eq!(counts[b'b' as usize], 2);
        assert_eq!(counts[b'r' as usize], 2);
        assert_eq!(counts[b'c' as usize], 1);
        assert_eq!(counts[b'd' as usize], 1);
        assert_eq!(counts.iter().sum::<usize>(), 11);
    }

    #[test]
    fn node_count_is_two_leaves_minus_one() {
        // 5 distinct symbols -> 9 nodes
        assert_eq!(node_count(&["abracadabra"]), 9);
        // 2 distinct -> 3
        assert_eq!(node_count(&["abab"]), 3);
    }

    #[test]
    fn single_symbol_corpus_gets_dummy_sibling() {
        assert_eq!(node_count(&["aaaa"]), 3);
        let built = build(&["aaaa"]);
        assert_eq!(built.codes[b'a' as usize].len, 1);
        assert_eq!(stream_bits(&["aaaa"]), 4);
        assert_eq!(decode_all(&built), [b"aaaa".to_vec()]);
    }

    #[test]
    #[should_panic]
    fn corpus_without_bytes_fails() {
        let _ = node_count(&["", ""]);
    }

    #[test]
    fn root_is_index_zero() {
        let built = build(&["abracadabra"]);
        assert!(matches!(built.nodes[0], Node::Internal { .. }));
    }

    #[test]
    fn children_follow_their_parent() {
        let built = build(&["the quick brown fox jumps over the lazy dog"]);
        for (index, node) in built.nodes.iter().enumerate() {
            if let Node::Internal { zero, one } = *node {
                assert!((zero as usize) > index);
                assert!((one as usize) > index);
                assert!((zero as usize) < built.nodes.len());
                assert!((one as usize) < built.nodes.len());
            }
        }
    }

    #[test]
    fn codes_are_prefix_free() {
        let strings = ["mississippi river", "delta"];
        let built = build(&strings);
        let present: Vec<u8> = (0u16..256)
            .filter(|&s| built.codes[s as usize].len > 0)
            .map(|s| s as u8)
            .collect();
        for &a in &present {
            for &b in &present {
                if a == b {
                    continue;
                }
                let wa = code_word(&built.codes, a);
                let wb = code_word(&built.codes, b);
                assert!(
                    !wb.starts_with(&wa),
                    "code of {a} is a prefix of code of {b}"
                );
            }
        }
    }

    #[test]
    fn rarer_symbols_never_get_shorter_codes() {
        let strings = ["aaaaaaaabbbbccd"];
        let counts = count_freqs(&strings);
        let built = build(&strings);
        for a in 0..256 {
            for b in 0..256 {
                if counts[a] > 0 && counts[b] > 0 && counts[a] < counts[b] {
                    assert!(built.codes[a].len >= built.codes[b].len);
                }
            }
        }
    }

    #[test]
    fn rebuilds_are_identical() {
        let strings = ["some repeated text", "more repeated text"];
        let first = build(&strings);
        let second = build(&strings);
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.entries, second.entries);
        assert_eq!(first.stream, second.stream);
    }

    #[test]
    fn empty_strings_take_no_bits() {
        let strings = ["alpha", "", "omega"];
        let built = build(&strings);
        assert_eq!(built.entries[1].len, 0);
        assert_eq!(built.entries[1].first_bit, built.entries[2].first_bit);
        assert_eq!(
            decode_all(&built),
            [b"alpha".to_vec(), Vec::new(), b"omega".to_vec()]
        );
    }

    #[test]
    fn printable_ascii_alphabet_round_trips() {
        let ascii: String = (0x20u8..0x7f).map(|b| b as char).collect();
        let strings = [ascii.as_str()];
        assert_eq!(node_count(&strings), 2 * 95 - 1);
        let built = build(&strings);
        assert_eq!(decode_all(&built), [ascii.as_bytes().to_vec()]);
    }

    proptest! {
        #[test]
        fn round_trips_arbitrary_corpora(
            strings in prop::collection::vec(".{0,64}", 1..12)
        ) {
            let total: usize = strings.iter().map(|s| s.len()).sum();
            prop_assume!(total > 0);
            let refs: Vec<&str> = strings.iter().map(String::as_str).collect();
            let built = build(&refs);
            let decoded = decode_all(&built);
            for (source, decoded) in refs.iter().zip(decoded) {
                prop_assert_eq!(source.as_bytes(), decoded.as_slice());
            }
        }

        #[test]
        fn node_count_matches_distinct_symbols(
            strings in prop::collection::vec("[a-p]{0,32}", 1..8)
        ) {
            let distinct: HashSet<u8> = strings.iter().flat_map(|s| s.bytes()).collect();
            prop_assume!(!distinct.is_empty());
            let refs: Vec<&str> = strings.iter().map(String::as_str).collect();
            let leaves = distinct.len().max(2);
            prop_assert_eq!(node_count(&refs), 2 * leaves - 1);
        }

        #[test]
        fn never_worse_than_eight_bits_per_byte(
            strings in prop::collection::vec(".{0,64}", 1..8)
        ) {
            let total: usize = strings.iter().map(|s| s.len()).sum();
            prop_assume!(total > 0);
            let refs: Vec<&str> = strings.iter().map(String::as_str).collect();
            let bits = stream_bits(&refs);
            prop_assert!(bits <= 8 * total);
            prop_assert_eq!(stream_bytes(&refs), bits.div_ceil(8));
        }
    }
}
