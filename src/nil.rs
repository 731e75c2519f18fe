//! Uncompressed string tables.
//!
//! The nil forms store the corpus verbatim: one concatenated byte array
//! plus per-string start offsets, with a string's length derived from the
//! next entry's start. They share the lookup surface of the Huffman forms
//! and serve as the baseline to measure compression against — and as the
//! sensible choice for corpora too small or too uniform to be worth a
//! tree.

use crate::error::{Error, Result};
use crate::map::{find_key, sorted_keys, KeySlot};

/// Total storage the corpus needs, in bytes.
pub const fn total_len(strings: &[&str]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < strings.len() {
        total += strings[i].len();
        i += 1;
    }
    total
}

/// [`total_len`] over keyed pairs.
pub const fn total_len_keyed(pairs: &[(u32, &str)]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < pairs.len() {
        total += pairs[i].1.len();
        i += 1;
    }
    total
}

/// A compile-time-built table of uncompressed strings with by-index
/// lookup.
///
/// `BYTES` is the concatenated corpus length, from [`total_len`]; the
/// [`nil_table!`](crate::nil_table) macro fills it in.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NilTable<const N: usize, const BYTES: usize> {
    starts: [usize; N],
    storage: [u8; BYTES],
}

impl<const N: usize, const BYTES: usize> NilTable<N, BYTES> {
    /// Copy `strings` into a table.
    ///
    /// # Panics
    ///
    /// Panics — failing the build when evaluated in const context — if
    /// the const parameters disagree with the corpus shape.
    pub const fn new(strings: &[&str]) -> Self {
        assert!(strings.len() == N, "string count does not match table arity");

        let mut starts = [0usize; N];
        let mut storage = [0u8; BYTES];
        let mut at = 0;
        let mut i = 0;
        while i < N {
            starts[i] = at;
            let bytes = strings[i].as_bytes();
            let mut j = 0;
            while j < bytes.len() {
                storage[at] = bytes[j];
                at += 1;
                j += 1;
            }
            i += 1;
        }
        assert!(at == BYTES, "storage length does not match table arity");

        Self { starts, storage }
    }

    /// Number of strings stored.
    pub const fn count(&self) -> usize {
        N
    }

    /// The bytes of the string at `index`; empty when out of range.
    pub fn get(&self, index: usize) -> &[u8] {
        if index >= N {
            return &[];
        }
        let end = if index + 1 < N {
            self.starts[index + 1]
        } else {
            BYTES
        };
        &self.storage[self.starts[index]..end]
    }

    /// Validate that start offsets are monotone and in range. Kept for
    /// surface uniformity with the Huffman forms; there is no tree here
    /// to damage.
    pub fn verify(&self) -> Result<()> {
        let mut previous = 0;
        for (index, &start) in self.starts.iter().enumerate() {
            if start > BYTES || start < previous {
                return Err(Error::EntryOutOfBounds { index });
            }
            previous = start;
        }
        Ok(())
    }
}

/// A compile-time-built map from `u32` keys to uncompressed strings.
///
/// The key overlay works exactly as in the Huffman map; the
/// [`nil_map!`](crate::nil_map) macro fills in the const parameters.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NilMap<const N: usize, const BYTES: usize> {
    keys: [KeySlot; N],
    table: NilTable<N, BYTES>,
}

impl<const N: usize, const BYTES: usize> NilMap<N, BYTES> {
    /// Copy keyed `pairs` into a map.
    ///
    /// # Panics
    ///
    /// Panics — failing the build when evaluated in const context — on a
    /// duplicate key or mismatched const parameters.
    pub const fn new(pairs: &[(u32, &str)]) -> Self {
        assert!(pairs.len() == N, "pair count does not match map arity");
        assert!(N <= u16::MAX as usize, "too many entries for 16-bit indices");

        let mut strings: [&str; N] = [""; N];
        let mut i = 0;
        while i < N {
            strings[i] = pairs[i].1;
            i += 1;
        }

        Self {
            keys: sorted_keys(pairs),
            table: NilTable::new(&strings),
        }
    }

    /// Number of pairs stored.
    pub const fn count(&self) -> usize {
        N
    }

    /// The bytes stored under `key`; empty when absent.
    pub fn get(&self, key: u32) -> &[u8] {
        match find_key(&self.keys, key) {
            Some(index) => self.table.get(index),
            None => &[],
        }
    }

    /// Whether `key` is present.
    pub const fn contains(&self, key: u32) -> bool {
        find_key(&self.keys, key).is_some()
    }
}
