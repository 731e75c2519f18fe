//! # Compile-time Huffman String Tables
//!
//! *Pay for your strings in entropy, not in bytes.*
//!
//! ## Intuition First
//!
//! Firmware images are full of fixed text: log messages, fault
//! descriptions, menu labels. Stored naively, every byte of that text
//! costs a full byte of flash, even though English text carries well
//! under five bits of information per character.
//!
//! This crate builds a Huffman code over your string corpus *while the
//! compiler runs*, packs every string into one shared bit stream, and
//! hands you back a plain `static` value: a read-only table that decodes
//! any string on demand, one byte at a time, without ever allocating or
//! materializing the text in RAM.
//!
//! ## The Problem
//!
//! Run-time compression libraries are the wrong shape for embedded
//! string tables:
//! - **Decompress-to-buffer** needs RAM for the largest string, which
//!   may dwarf the savings on a small target.
//! - **Run-time table construction** costs startup cycles and code size
//!   for an encoder that only ever sees one corpus.
//!
//! Building at compile time inverts both: the encoder runs in constant
//! evaluation and never ships, and the decoder is a ~40-line tree walk
//! that streams bytes straight out of read-only memory.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon    Entropy as the fundamental limit
//! 1952  Huffman    Optimal prefix codes from symbol frequencies
//! 1985  Knuth      Dynamic Huffman; decoding as tree traversal
//! 1996  RFC 1951   DEFLATE ships canonical Huffman everywhere
//! 2015  RFC 7541   HPACK: a static Huffman table for header strings
//! 2020  C++20/Rust Constant evaluation grows loops, arrays, mutation —
//!                  whole-corpus encoding at compile time becomes practical
//! ```
//!
//! ## Mathematical Formulation
//!
//! For symbol probabilities $p_s$, Huffman coding achieves an expected
//! code length $L$ with
//!
//! ```text
//! H(p) <= L < H(p) + 1,   H(p) = -Σ p_s log2 p_s
//! ```
//!
//! and never does worse than a fixed-width code over the same alphabet.
//! For typical English text ($H \approx 4.1$ bits/char) that is roughly a
//! 2x reduction in `.rodata`.
//!
//! ## Complexity Analysis
//!
//! - **Build (compile) time**: $O(n + L \log L)$ for $n$ corpus bytes and
//!   $L$ distinct symbols, run twice (once to size, once to fill).
//! - **Decode**: $O(\text{code length})$ per byte, a pointer-free walk
//!   over a flat array of 16-bit indices.
//! - **Space**: the packed bit stream, plus $2L - 1$ nodes, plus two
//!   words per string. Nothing at run time.
//!
//! ## Failure Modes
//!
//! 1. **Tiny corpora**: a handful of short strings can spend more on the
//!    tree than compression saves. Measure, and fall back to [`NilTable`]
//!    when the nil form is smaller.
//! 2. **Uniform byte soup**: already-compressed or random data has no
//!    skew to exploit; expect ratios near (or at) 1.0.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`HuffmanTable`]** / **[`HuffmanMap`]**: compressed string storage
//!   with by-index or by-key lookup, built entirely in const context.
//! - **[`NilTable`]** / **[`NilMap`]**: the same surface, uncompressed.
//! - **[`Chars`]**: the zero-allocation streaming decoder.
//!
//! Lookups cannot fail: an out-of-range index or absent key returns an
//! empty iterator, and a corrupted artifact decodes to a NUL byte and
//! stops. Nothing on the decode path panics or allocates.
//!
//! ## Example
//!
//! ```
//! use sqz::huff_table;
//!
//! const MOTD: &[&str] = &["calibration complete", "all systems nominal"];
//! huff_table!(static TABLE = MOTD);
//!
//! assert_eq!(TABLE.count(), 2);
//! let text: Vec<u8> = TABLE.get(1).collect();
//! assert_eq!(text, b"all systems nominal");
//! ```
//!
//! ## References
//!
//! - Huffman, D. (1952). "A Method for the Construction of
//!   Minimum-Redundancy Codes."
//! - Moffat, A. (2019). "Huffman Coding." ACM Computing Surveys.
//! - Peon, R., & Ruellan, H. (2015). RFC 7541, Appendix B: a deployed
//!   static Huffman string table.

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod bitbuf;
pub mod decode;
pub mod error;
pub mod heap;
pub mod huffman;
pub mod map;
pub mod nil;
pub mod queue;
pub mod table;

pub use bitbuf::BitBuf;
pub use decode::Chars;
pub use error::Error;
pub use map::HuffmanMap;
pub use nil::{NilMap, NilTable};
pub use table::HuffmanTable;

/// Declare a `static` Huffman-compressed string table.
///
/// Expands to a [`HuffmanTable`] item with its three const parameters
/// (entry count, node count, stream bytes) computed from the corpus by
/// the sizing pre-passes. The corpus expression is evaluated in const
/// context several times, so it should be a `const` item or a literal.
///
/// ```
/// use sqz::huff_table;
///
/// const GREETINGS: &[&str] = &["good morning", "good night"];
/// huff_table!(static TABLE = GREETINGS);
///
/// let bytes: Vec<u8> = TABLE.get(0).collect();
/// assert_eq!(bytes, b"good morning");
/// ```
#[macro_export]
macro_rules! huff_table {
    ($vis:vis static $name:ident = $strings:expr) => {
        $vis static $name: $crate::HuffmanTable<
            { $strings.len() },
            { $crate::huffman::node_count($strings) },
            { $crate::huffman::stream_bytes($strings) },
        > = $crate::HuffmanTable::new($strings);
    };
}

/// Declare a `static` Huffman-compressed string map keyed by `u32`.
///
/// ```
/// use sqz::huff_map;
///
/// const FAULTS: &[(u32, &str)] = &[
///     (7, "sensor out of range"),
///     (2, "battery low"),
/// ];
/// huff_map!(static MESSAGES = FAULTS);
///
/// assert!(MESSAGES.contains(2));
/// assert!(!MESSAGES.contains(3));
/// let text: Vec<u8> = MESSAGES.get(7).collect();
/// assert_eq!(text, b"sensor out of range");
/// ```
#[macro_export]
macro_rules! huff_map {
    ($vis:vis static $name:ident = $pairs:expr) => {
        $vis static $name: $crate::HuffmanMap<
            { $pairs.len() },
            { $crate::huffman::node_count_keyed($pairs) },
            { $crate::huffman::stream_bytes_keyed($pairs) },
        > = $crate::HuffmanMap::new($pairs);
    };
}

/// Declare a `static` uncompressed string table.
///
/// ```
/// use sqz::nil_table;
///
/// const BANNERS: &[&str] = &["boot ok", "update ready"];
/// nil_table!(static BANNER_TABLE = BANNERS);
///
/// assert_eq!(BANNER_TABLE.get(0), b"boot ok".as_slice());
/// ```
#[macro_export]
macro_rules! nil_table {
    ($vis:vis static $name:ident = $strings:expr) => {
        $vis static $name: $crate::NilTable<
            { $strings.len() },
            { $crate::nil::total_len($strings) },
        > = $crate::NilTable::new($strings);
    };
}

/// Declare a `static` uncompressed string map keyed by `u32`.
///
/// ```
/// use sqz::nil_map;
///
/// const UNITS: &[(u32, &str)] = &[(1, "volts"), (2, "amps")];
/// nil_map!(static UNIT_NAMES = UNITS);
///
/// assert_eq!(UNIT_NAMES.get(2), b"amps".as_slice());
/// assert_eq!(UNIT_NAMES.get(9), b"".as_slice());
/// ```
#[macro_export]
macro_rules! nil_map {
    ($vis:vis static $name:ident = $pairs:expr) => {
        $vis static $name: $crate::NilMap<
            { $pairs.len() },
            { $crate::nil::total_len_keyed($pairs) },
        > = $crate::NilMap::new($pairs);
    };
}
