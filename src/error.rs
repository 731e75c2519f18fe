//! Error types for artifact integrity checks.
//!
//! The lookup and decode surfaces never return errors: bad indexes and
//! absent keys produce empty iterators, and corruption encountered
//! mid-decode degrades to a NUL byte. These variants exist for callers
//! that load an image from external storage and want to probe the table
//! structurally, via `verify`, before trusting it.

use thiserror::Error;

/// Structural defects `verify` can find in a stored artifact.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An internal node references a child index outside the node array.
    #[error("node {node} references child {child} outside the tree")]
    DanglingChild {
        /// Index of the offending internal node.
        node: u16,
        /// The out-of-range child index it holds.
        child: u16,
    },

    /// An internal node references a child at or before its own index,
    /// which the breadth-first numbering rules out.
    #[error("node {node} references child {child} at or before itself")]
    ChildOutOfOrder {
        /// Index of the offending internal node.
        node: u16,
        /// The misordered child index it holds.
        child: u16,
    },

    /// A non-empty entry starts beyond the end of the bit stream.
    #[error("entry {index} starts beyond the end of the bit stream")]
    EntryOutOfBounds {
        /// Position of the offending entry.
        index: usize,
    },
}

/// A specialized Result type for integrity checks.
pub type Result<T> = core::result::Result<T, Error>;
