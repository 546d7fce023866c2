//! Configuration types for wiki-to-PDF preparation.
//!
//! All pipeline behaviour is controlled through [`PolishConfig`], built via
//! its [`PolishConfigBuilder`]. The defaults reproduce what the Azure DevOps
//! wiki export needs out of the box: `<br>` line breaks, page breaks before
//! consecutive top-level pages, table captions, and German hyphenation with
//! a three-letter word threshold.

use crate::dictionary::Hyphenator;
use crate::error::Wiki2PdfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Markers that stand for an auto-generated navigation block in the wiki.
pub const DEFAULT_TOC_MARKERS: [&str; 2] = ["[[_TOC_]]", "[[_TOSP_]]"];

/// Default minimum word length for hyphenation lookups.
pub const DEFAULT_MIN_WORD_LENGTH: usize = 3;

/// Configuration for the normalizer, caption post-processor and
/// hyphenation engine.
///
/// Built via [`PolishConfig::builder()`] or using
/// [`PolishConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_wiki2pdf::PolishConfig;
///
/// let config = PolishConfig::builder()
///     .page_breaks(false)
///     .min_word_length(8)
///     .blacklist_term("Azure DevOps")
///     .build()
///     .unwrap();
/// assert_eq!(config.min_word_length, 8);
/// ```
#[derive(Clone)]
pub struct PolishConfig {
    /// Append a forced line break to ordinary markdown lines. Default: true.
    ///
    /// The wiki renders single newlines as hard breaks, standard markdown
    /// renderers join them into one paragraph.
    pub line_breaks: bool,

    /// What a forced line break looks like. Default: [`LineBreakStyle::Html`].
    pub line_break_style: LineBreakStyle,

    /// Insert page breaks between consecutive top-level pages. Default: true.
    pub page_breaks: bool,

    /// Wrap the line directly above a table as its caption. Default: true.
    ///
    /// Applies to both the markdown normalizer and the HTML caption pass.
    pub table_captions: bool,

    /// Literal tokens marking a table-of-contents block. Lines containing one
    /// are never decorated. Default: `[[_TOC_]]`, `[[_TOSP_]]`.
    pub toc_markers: Vec<String>,

    /// In the HTML caption pass, treat a line ending in an empty paragraph
    /// (`<p></p>`, `<p><br></p>`, `<p>&nbsp;</p>`) as an intentional gap that
    /// unbinds it from the following table. Default: true.
    pub respect_blank_line_markers: bool,

    /// Insert soft hyphens into long words. Default: true.
    pub hyphenate: bool,

    /// Minimum run of letters looked up in the dictionary. Default: 3.
    ///
    /// Short words never break in practice (the dictionary's own left/right
    /// minimums forbid it), so a low threshold only costs lookups. Raise it
    /// to 8 to restrict hyphenation to long compounds.
    pub min_word_length: usize,

    /// Literal terms (case-insensitive) that must never be hyphenated,
    /// e.g. product names.
    pub hyphenation_blacklist: Vec<String>,

    /// Keep `<table>` elements and table captions free of soft hyphens.
    /// Default: true.
    pub protect_tables: bool,

    /// Keep `<pre>` and `<code>` elements free of soft hyphens. Default: true.
    pub protect_code: bool,

    /// Explicit dictionary file. If None, uses the process-wide dictionary at
    /// `dictionaries/hyph_de_DE.dic` next to the executable.
    pub dictionary_path: Option<PathBuf>,

    /// Pre-constructed hyphenator. Takes precedence over `dictionary_path`.
    pub hyphenator: Option<Arc<dyn Hyphenator>>,
}

impl Default for PolishConfig {
    fn default() -> Self {
        Self {
            line_breaks: true,
            line_break_style: LineBreakStyle::default(),
            page_breaks: true,
            table_captions: true,
            toc_markers: DEFAULT_TOC_MARKERS.iter().map(|m| m.to_string()).collect(),
            respect_blank_line_markers: true,
            hyphenate: true,
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
            hyphenation_blacklist: Vec::new(),
            protect_tables: true,
            protect_code: true,
            dictionary_path: None,
            hyphenator: None,
        }
    }
}

impl fmt::Debug for PolishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolishConfig")
            .field("line_breaks", &self.line_breaks)
            .field("line_break_style", &self.line_break_style)
            .field("page_breaks", &self.page_breaks)
            .field("table_captions", &self.table_captions)
            .field("toc_markers", &self.toc_markers)
            .field("respect_blank_line_markers", &self.respect_blank_line_markers)
            .field("hyphenate", &self.hyphenate)
            .field("min_word_length", &self.min_word_length)
            .field("hyphenation_blacklist", &self.hyphenation_blacklist)
            .field("protect_tables", &self.protect_tables)
            .field("protect_code", &self.protect_code)
            .field("dictionary_path", &self.dictionary_path)
            .field("hyphenator", &self.hyphenator.as_ref().map(|_| "<dyn Hyphenator>"))
            .finish()
    }
}

impl PolishConfig {
    /// Create a new builder for `PolishConfig`.
    pub fn builder() -> PolishConfigBuilder {
        PolishConfigBuilder {
            config: Self::default(),
        }
    }

    /// True if `line` contains any configured table-of-contents marker.
    pub fn is_toc_line(&self, line: &str) -> bool {
        self.toc_markers.iter().any(|m| line.contains(m.as_str()))
    }
}

/// Builder for [`PolishConfig`].
#[derive(Debug)]
pub struct PolishConfigBuilder {
    config: PolishConfig,
}

impl PolishConfigBuilder {
    pub fn line_breaks(mut self, v: bool) -> Self {
        self.config.line_breaks = v;
        self
    }

    pub fn line_break_style(mut self, style: LineBreakStyle) -> Self {
        self.config.line_break_style = style;
        self
    }

    pub fn page_breaks(mut self, v: bool) -> Self {
        self.config.page_breaks = v;
        self
    }

    pub fn table_captions(mut self, v: bool) -> Self {
        self.config.table_captions = v;
        self
    }

    /// Replace the table-of-contents markers.
    pub fn toc_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.toc_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn respect_blank_line_markers(mut self, v: bool) -> Self {
        self.config.respect_blank_line_markers = v;
        self
    }

    pub fn hyphenate(mut self, v: bool) -> Self {
        self.config.hyphenate = v;
        self
    }

    pub fn min_word_length(mut self, n: usize) -> Self {
        self.config.min_word_length = n;
        self
    }

    /// Add one term to the hyphenation blacklist.
    pub fn blacklist_term(mut self, term: impl Into<String>) -> Self {
        self.config.hyphenation_blacklist.push(term.into());
        self
    }

    /// Replace the hyphenation blacklist.
    pub fn hyphenation_blacklist<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hyphenation_blacklist = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn protect_tables(mut self, v: bool) -> Self {
        self.config.protect_tables = v;
        self
    }

    pub fn protect_code(mut self, v: bool) -> Self {
        self.config.protect_code = v;
        self
    }

    pub fn dictionary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dictionary_path = Some(path.into());
        self
    }

    pub fn hyphenator(mut self, hyphenator: Arc<dyn Hyphenator>) -> Self {
        self.config.hyphenator = Some(hyphenator);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PolishConfig, Wiki2PdfError> {
        let c = &self.config;
        if c.min_word_length < 2 {
            return Err(Wiki2PdfError::InvalidConfig(format!(
                "min_word_length must be ≥ 2, got {}",
                c.min_word_length
            )));
        }
        if c.toc_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(Wiki2PdfError::InvalidConfig(
                "TOC markers must not be empty".into(),
            ));
        }
        if c.hyphenation_blacklist.iter().any(|t| t.trim().is_empty()) {
            return Err(Wiki2PdfError::InvalidConfig(
                "Hyphenation blacklist terms must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the normalizer forces a line break at the end of a markdown line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineBreakStyle {
    /// Inline `<br>` tag. (default)
    #[default]
    Html,
    /// Two trailing spaces, the CommonMark hard line break.
    TrailingSpaces,
}

impl LineBreakStyle {
    /// The suffix appended to a line.
    pub fn suffix(self) -> &'static str {
        match self {
            LineBreakStyle::Html => "<br>",
            LineBreakStyle::TrailingSpaces => "  ",
        }
    }
}
