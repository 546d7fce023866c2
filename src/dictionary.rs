//! Hyphenation lookup capability and the lazily loaded dictionary handle.
//!
//! The hyphenation engine only needs one operation: "give me this word with
//! break points". [`Hyphenator`] captures exactly that, so hosts and tests
//! can inject their own implementation through
//! [`crate::config::PolishConfigBuilder::hyphenator`].
//!
//! [`DictionaryHandle`] owns a [`hyph_dict::Dictionary`] that is loaded on
//! first use, at most once, and is read-only afterwards. A failed load is
//! logged once at error level and remembered, so every later call runs in
//! pass-through mode without touching the filesystem again.

use crate::error::Wiki2PdfError;
use hyph_dict::Dictionary;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{error, info};

pub use hyph_dict::BREAK_MARKER;

/// Looks up break points for a single word.
///
/// Implementations return the word with [`BREAK_MARKER`] (`=`) at every
/// permitted break point, or `None` if the word has no entry.
pub trait Hyphenator: Send + Sync {
    fn hyphenate(&self, word: &str) -> Option<String>;
}

impl Hyphenator for Dictionary {
    fn hyphenate(&self, word: &str) -> Option<String> {
        Dictionary::hyphenate(self, word)
    }
}

#[derive(Debug, Clone)]
enum DictionarySource {
    /// `HYPH_DICT_PATH` or `dictionaries/hyph_de_DE.dic` next to the executable.
    Default,
    Path(PathBuf),
}

/// A dictionary loaded on first use.
#[derive(Debug)]
pub struct DictionaryHandle {
    source: DictionarySource,
    cell: OnceLock<Option<Dictionary>>,
}

static SHARED: OnceLock<DictionaryHandle> = OnceLock::new();

impl DictionaryHandle {
    /// Handle for the default location.
    pub fn default_location() -> Self {
        Self {
            source: DictionarySource::Default,
            cell: OnceLock::new(),
        }
    }

    /// Handle for an explicit dictionary file.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: DictionarySource::Path(path.into()),
            cell: OnceLock::new(),
        }
    }

    /// The process-wide handle for the default location.
    pub fn shared() -> &'static DictionaryHandle {
        SHARED.get_or_init(Self::default_location)
    }

    /// The dictionary, loading it on the first call.
    ///
    /// Returns `None` if loading failed; the failure is logged once.
    pub fn get(&self) -> Option<&Dictionary> {
        self.cell
            .get_or_init(|| match self.load() {
                Ok(dict) => Some(dict),
                Err(e) => {
                    error!("{e}");
                    None
                }
            })
            .as_ref()
    }

    /// True once a load has been attempted, successful or not.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Load the dictionary now, bypassing the cache.
    pub fn load(&self) -> Result<Dictionary, Wiki2PdfError> {
        let path = self.path()?;
        let dict = Dictionary::from_path(&path)
            .map_err(|source| Wiki2PdfError::DictionaryUnavailable {
                path: path.clone(),
                source,
            })?;
        info!(
            "Loaded hyphenation dictionary {} ({} patterns)",
            path.display(),
            dict.pattern_count()
        );
        Ok(dict)
    }

    /// The file this handle loads from.
    pub fn path(&self) -> Result<PathBuf, Wiki2PdfError> {
        match &self.source {
            DictionarySource::Path(p) => Ok(p.clone()),
            DictionarySource::Default => {
                hyph_dict::default_dictionary_path().map_err(Wiki2PdfError::DictionaryPath)
            }
        }
    }
}
