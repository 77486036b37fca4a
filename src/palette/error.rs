//! Error type for palette construction.

use thiserror::Error;

use super::IndexedColor;

/// Error type for palette validation.
///
/// All variants are detected at construction time, before any state is
/// built; a failed construction leaves nothing behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// No entries provided.
    #[error("palette cannot be empty")]
    Empty,

    /// More entries than the index encoding can address.
    #[error("palette has {count} entries, maximum is 254")]
    TooManyEntries {
        /// Number of entries that were supplied
        count: usize,
    },

    /// Two entries claim the same device index.
    #[error("duplicate palette index {index}")]
    DuplicateIndex {
        /// The index that appeared more than once
        index: IndexedColor,
    },
}
