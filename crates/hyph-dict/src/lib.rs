//! # hyph-dict
//!
//! Load hyphenation dictionaries in the format used by the `hyphen` library
//! (LibreOffice / Hunspell `hyph_*.dic` files) and apply Liang's
//! pattern algorithm to single words.
//!
//! ## How it works
//!
//! 1. The first line of a `.dic` file names its character set (`UTF-8` or
//!    `ISO8859-1`). The rest of the file is decoded accordingly.
//! 2. Header keywords (`LEFTHYPHENMIN`, `RIGHTHYPHENMIN`, …) configure the
//!    minimum number of letters kept on either side of a break.
//! 3. Every other line holds patterns such as `hy3ph` or `.ab4`. Odd digits
//!    allow a break, even digits forbid one; the highest digit wins.
//! 4. [`Dictionary::hyphenate`] returns the word with [`BREAK_MARKER`]
//!    inserted at every allowed break point.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hyph_dict::{default_dictionary_path, Dictionary};
//!
//! let path = default_dictionary_path().expect("no executable directory");
//! let dict = Dictionary::from_path(&path).expect("dictionary unreadable");
//! assert_eq!(
//!     dict.hyphenate("Silbentrennung").as_deref(),
//!     Some("Sil=ben=tren=nung")
//! );
//! ```
//!
//! ## Environment variable overrides
//!
//! - `HYPH_DICT_PATH`: path to a dictionary file; replaces the default
//!   `dictionaries/hyph_de_DE.dic` next to the executable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Dictionary location relative to the directory of the running executable.
pub const DEFAULT_DICTIONARY: &str = "dictionaries/hyph_de_DE.dic";

/// Environment variable that overrides the default dictionary location.
pub const DICTIONARY_PATH_ENV: &str = "HYPH_DICT_PATH";

/// Character inserted by [`Dictionary::hyphenate`] at each break point.
pub const BREAK_MARKER: char = '=';

/// `hyphen` library defaults when a file carries no explicit header.
const DEFAULT_LEFT_MIN: usize = 2;
const DEFAULT_RIGHT_MIN: usize = 2;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while locating or parsing a dictionary.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary file could not be read.
    #[error("Failed to read dictionary '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The charset named on the first line is not supported.
    #[error("Unsupported dictionary encoding '{0}' (expected UTF-8 or ISO8859-1)")]
    UnsupportedEncoding(String),

    /// The file claims UTF-8 but contains invalid byte sequences.
    #[error("Dictionary is not valid {encoding}: {detail}")]
    InvalidEncoding { encoding: String, detail: String },

    /// The file parsed, but contains no patterns at all.
    #[error("Dictionary contains no hyphenation patterns")]
    Empty,

    /// The directory of the running executable could not be determined.
    #[error("Cannot determine executable directory: {0}")]
    ExecutableDir(#[source] std::io::Error),
}

// ── Encoding ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Utf8,
    Latin1,
}

impl Encoding {
    fn from_label(label: &str) -> Result<Self, DictionaryError> {
        match label.trim().to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Ok(Encoding::Utf8),
            // ISO-8859-15 differs from Latin-1 in eight code points, none of
            // which occur in German patterns.
            "ISO8859-1" | "ISO-8859-1" | "ISO8859-15" | "ISO-8859-15" => Ok(Encoding::Latin1),
            other => Err(DictionaryError::UnsupportedEncoding(other.to_string())),
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<String, DictionaryError> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| {
                DictionaryError::InvalidEncoding {
                    encoding: "UTF-8".into(),
                    detail: e.to_string(),
                }
            }),
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

// ── Dictionary ───────────────────────────────────────────────────────────────

/// A parsed set of Liang hyphenation patterns.
///
/// Read-only after construction, so a single instance can be shared across
/// threads without locking.
#[derive(Debug, Clone)]
pub struct Dictionary {
    /// Pattern letters → priority values (one more value than letters).
    patterns: HashMap<String, Vec<u8>>,
    /// Longest pattern in characters; bounds the inner lookup loop.
    max_pattern_chars: usize,
    left_min: usize,
    right_min: usize,
}

impl Dictionary {
    /// Read and parse a dictionary file.
    pub fn from_path(path: &Path) -> Result<Self, DictionaryError> {
        let bytes = std::fs::read(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a dictionary from raw file contents.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DictionaryError> {
        let header_end = bytes
            .iter()
            .position(|&b| b == b'\n')
            .unwrap_or(bytes.len());
        let label = String::from_utf8_lossy(&bytes[..header_end]);
        let encoding = Encoding::from_label(&label)?;
        let body = encoding.decode(bytes.get(header_end + 1..).unwrap_or_default())?;

        let mut dict = Dictionary {
            patterns: HashMap::new(),
            max_pattern_chars: 0,
            left_min: DEFAULT_LEFT_MIN,
            right_min: DEFAULT_RIGHT_MIN,
        };

        for line in body.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            if line.starts_with(|c: char| c.is_ascii_uppercase()) {
                dict.apply_header(line);
                continue;
            }
            for pattern in line.split_whitespace() {
                dict.insert_pattern(pattern);
            }
        }

        if dict.patterns.is_empty() {
            return Err(DictionaryError::Empty);
        }
        Ok(dict)
    }

    /// Number of distinct patterns loaded.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Minimum letters kept before the first break point.
    pub fn left_min(&self) -> usize {
        self.left_min
    }

    /// Minimum letters kept after the last break point.
    pub fn right_min(&self) -> usize {
        self.right_min
    }

    /// Hyphenate a single word.
    ///
    /// Returns the word with [`BREAK_MARKER`] inserted at every permitted
    /// break point, or `None` when no break point survives the left/right
    /// minimums. Letter case is preserved; matching is case-insensitive.
    pub fn hyphenate(&self, word: &str) -> Option<String> {
        let chars: Vec<char> = word.chars().collect();
        let n = chars.len();
        if n < self.left_min + self.right_min {
            return None;
        }

        // `.word.` in lower case; '.' anchors patterns at word edges.
        let mut dotted = Vec::with_capacity(n + 2);
        dotted.push('.');
        dotted.extend(
            chars
                .iter()
                .map(|c| c.to_lowercase().next().unwrap_or(*c)),
        );
        dotted.push('.');

        // points[i] is the priority of the gap before dotted[i].
        let mut points = vec![0u8; dotted.len() + 1];
        let mut key = String::with_capacity(self.max_pattern_chars * 2);
        for start in 0..dotted.len() {
            key.clear();
            let end = dotted.len().min(start + self.max_pattern_chars);
            for &c in &dotted[start..end] {
                key.push(c);
                if let Some(values) = self.patterns.get(&key) {
                    for (offset, &value) in values.iter().enumerate() {
                        let slot = &mut points[start + offset];
                        if value > *slot {
                            *slot = value;
                        }
                    }
                }
            }
        }

        let mut out = String::with_capacity(word.len() + n / 2);
        let mut broke = false;
        for (j, &c) in chars.iter().enumerate() {
            // The gap before word char j sits before dotted[j + 1].
            if j >= self.left_min && n - j >= self.right_min && points[j + 1] % 2 == 1 {
                out.push(BREAK_MARKER);
                broke = true;
            }
            out.push(c);
        }

        broke.then_some(out)
    }

    fn apply_header(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        let value = parts.next().and_then(|v| v.parse::<usize>().ok());
        match (keyword, value) {
            ("LEFTHYPHENMIN", Some(v)) => self.left_min = v.max(1),
            ("RIGHTHYPHENMIN", Some(v)) => self.right_min = v.max(1),
            // NEXTLEVEL, COMPOUND*HYPHENMIN, NOHYPHEN: levels are merged into
            // one pattern table, the rest does not affect plain words.
            _ => {}
        }
    }

    fn insert_pattern(&mut self, raw: &str) {
        // Non-standard patterns (`c1k/k=k,1,1`) keep their standard part.
        let pattern = raw.split('/').next().unwrap_or_default();

        let mut letters = String::with_capacity(pattern.len());
        let mut values = vec![0u8];
        for c in pattern.chars() {
            match c.to_digit(10) {
                Some(d) => {
                    if let Some(last) = values.last_mut() {
                        *last = d as u8;
                    }
                }
                None => {
                    letters.extend(c.to_lowercase());
                    values.push(0);
                }
            }
        }

        let len = values.len() - 1;
        if len == 0 || letters.chars().count() != len {
            return;
        }
        self.max_pattern_chars = self.max_pattern_chars.max(len);

        self.patterns
            .entry(letters)
            .and_modify(|existing| {
                for (slot, &value) in existing.iter_mut().zip(&values) {
                    *slot = (*slot).max(value);
                }
            })
            .or_insert(values);
    }
}

// ── Path resolution ──────────────────────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Returns the dictionary path for this process.
///
/// `HYPH_DICT_PATH` wins when set; otherwise the path is
/// [`DEFAULT_DICTIONARY`] under the running executable's directory. The
/// result is resolved once and cached for the lifetime of the process.
pub fn default_dictionary_path() -> Result<PathBuf, DictionaryError> {
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let exe = std::env::current_exe().map_err(DictionaryError::ExecutableDir)?;
    let path = resolve_dictionary_path(
        std::env::var_os(DICTIONARY_PATH_ENV).map(PathBuf::from),
        &exe,
    );

    // Best-effort cache in the OnceLock (ignore race; both resolve the same).
    let _ = RESOLVED_PATH.set(path.clone());

    Ok(path)
}

/// Pure resolution rule behind [`default_dictionary_path`].
pub fn resolve_dictionary_path(env_override: Option<PathBuf>, executable: &Path) -> PathBuf {
    match env_override {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => executable
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_DICTIONARY),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
