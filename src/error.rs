//! Error types for the edgequake-wiki2pdf library.
//!
//! The three pipeline stages never fail: malformed markdown or HTML is passed
//! through as close to verbatim as possible, and a missing dictionary turns
//! hyphenation into a no-op. [`Wiki2PdfError`] therefore only surfaces where a
//! caller can act on it:
//!
//! * building a [`crate::config::PolishConfig`] with invalid values,
//! * loading a dictionary explicitly through
//!   [`crate::dictionary::DictionaryHandle::load`].
//!
//! The placeholder variants are raised inside the hyphenation engine and
//! absorbed there (logged, input returned unchanged).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-wiki2pdf library.
#[derive(Debug, Error)]
pub enum Wiki2PdfError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Dictionary errors ─────────────────────────────────────────────────
    /// The hyphenation dictionary could not be read or parsed.
    #[error(
        "Hyphenation dictionary '{path}' is unavailable: {source}\n\
Hyphenation is disabled. Place hyph_de_DE.dic under 'dictionaries/' next to the \
executable or set HYPH_DICT_PATH."
    )]
    DictionaryUnavailable {
        path: PathBuf,
        #[source]
        source: hyph_dict::DictionaryError,
    },

    /// The default dictionary location could not be resolved.
    #[error("Cannot resolve hyphenation dictionary location: {0}")]
    DictionaryPath(#[source] hyph_dict::DictionaryError),

    // ── Placeholder errors ────────────────────────────────────────────────
    /// The input already contains the reserved placeholder sentinel.
    #[error("Input contains the reserved placeholder sentinel U+{sentinel:04X}")]
    PlaceholderCollision { sentinel: u32 },

    /// Restoration did not account for every protected segment.
    #[error("Restored {restored} of {expected} protected segments")]
    PlaceholderMismatch { expected: usize, restored: usize },
}
