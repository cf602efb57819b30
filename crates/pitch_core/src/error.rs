//! Error types for the tactics core.
//!
//! The analysis pipeline itself is total and never fails; errors only arise
//! when loading a custom formation library.

use thiserror::Error;

/// Result type alias using [`TacticsError`].
pub type Result<T> = std::result::Result<T, TacticsError>;

/// Errors raised while building a formation library.
#[derive(Debug, Error)]
pub enum TacticsError {
    /// The library source could not be parsed.
    #[error("Failed to parse formation library '{source_name}': {message}")]
    LibraryParse {
        /// Where the library came from (file path or label).
        source_name: String,
        /// Parser message.
        message: String,
    },

    /// A template does not have the expected number of outfield slots.
    #[error("Formation '{formation}' has {found} outfield slots, expected {expected}")]
    SlotCount {
        /// Offending template.
        formation: String,
        /// Slots found.
        found: usize,
        /// Slots required.
        expected: usize,
    },

    /// A template zone is not a finite coordinate pair.
    #[error("Formation '{formation}' slot {id} has a non-finite zone")]
    InvalidZone {
        /// Offending template.
        formation: String,
        /// Slot id.
        id: i64,
    },

    /// Two templates share a name.
    #[error("Formation '{0}' is defined more than once")]
    DuplicateFormation(String),

    /// The library lacks the fallback template.
    #[error("Formation library has no '{0}' template to fall back on")]
    MissingDefault(String),
}
