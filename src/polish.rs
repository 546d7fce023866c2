//! Entry points for the export pipeline.
//!
//! [`Polisher`] bundles a [`PolishConfig`] with its compiled hyphenation
//! engine and dictionary source. Build one per configuration and reuse it
//! for every page of an export; it is `Send + Sync`.
//!
//! The free functions [`normalize`], [`insert_table_captions`] and
//! [`insert_soft_hyphens`] run a single stage with the default
//! configuration and the process-wide dictionary.

use crate::config::PolishConfig;
use crate::dictionary::{DictionaryHandle, Hyphenator};
use crate::pipeline::{captions, hyphenate::HyphenationEngine, normalize};
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Where the hyphenation engine gets its break points from.
enum HyphenatorSource {
    Injected(Arc<dyn Hyphenator>),
    Owned(DictionaryHandle),
    Shared,
}

impl fmt::Debug for HyphenatorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HyphenatorSource::Injected(_) => f.write_str("Injected(<dyn Hyphenator>)"),
            HyphenatorSource::Owned(handle) => f.debug_tuple("Owned").field(handle).finish(),
            HyphenatorSource::Shared => f.write_str("Shared"),
        }
    }
}

/// The three pipeline stages, configured once.
///
/// # Example
/// ```rust
/// use edgequake_wiki2pdf::{PolishConfig, Polisher};
///
/// let polisher = Polisher::new(PolishConfig::builder().hyphenate(false).build().unwrap());
/// let md = polisher.normalize_markdown("#Title\nSome text\n|a|b|\n|-|-|");
/// assert!(md.starts_with("# Title<br>\n<span class=\"table-caption\">Some text</span>\n\n|a|b|"));
/// ```
#[derive(Debug)]
pub struct Polisher {
    config: PolishConfig,
    engine: HyphenationEngine,
    source: HyphenatorSource,
}

impl Polisher {
    pub fn new(config: PolishConfig) -> Self {
        let source = match (&config.hyphenator, &config.dictionary_path) {
            (Some(h), _) => HyphenatorSource::Injected(Arc::clone(h)),
            (None, Some(path)) => HyphenatorSource::Owned(DictionaryHandle::at_path(path)),
            (None, None) => HyphenatorSource::Shared,
        };
        Self {
            engine: HyphenationEngine::new(&config),
            config,
            source,
        }
    }

    pub fn config(&self) -> &PolishConfig {
        &self.config
    }

    /// Stage 1: normalize wiki markdown before rendering.
    pub fn normalize_markdown(&self, markdown: &str) -> String {
        normalize::normalize_markdown(markdown, &self.config)
    }

    /// Stage 2: bind the line above each rendered `<table>` as its caption.
    pub fn insert_table_captions(&self, html: &str) -> String {
        captions::insert_table_captions(html, &self.config)
    }

    /// Stage 3: insert `&shy;` into long words of rendered HTML.
    ///
    /// The dictionary is loaded on the first call. Without a dictionary the
    /// HTML is returned unchanged.
    pub fn insert_soft_hyphens(&self, html: &str) -> String {
        if !self.config.hyphenate {
            return html.to_string();
        }
        self.engine.apply(html, self.hyphenator())
    }

    /// Stages 2 and 3, in pipeline order.
    pub fn polish_html(&self, html: &str) -> String {
        let captioned = self.insert_table_captions(html);
        let out = self.insert_soft_hyphens(&captioned);
        debug!("Polished HTML: {} → {} bytes", html.len(), out.len());
        out
    }

    /// The hyphenator in use, loading the dictionary if needed.
    pub fn hyphenator(&self) -> Option<&dyn Hyphenator> {
        match &self.source {
            HyphenatorSource::Injected(h) => Some(h.as_ref()),
            HyphenatorSource::Owned(handle) => handle.get().map(|d| d as &dyn Hyphenator),
            HyphenatorSource::Shared => DictionaryHandle::shared()
                .get()
                .map(|d| d as &dyn Hyphenator),
        }
    }
}

impl Default for Polisher {
    fn default() -> Self {
        Self::new(PolishConfig::default())
    }
}

static DEFAULT_POLISHER: Lazy<Polisher> = Lazy::new(Polisher::default);

/// Normalize wiki markdown with the default configuration.
pub fn normalize(markdown: &str) -> String {
    DEFAULT_POLISHER.normalize_markdown(markdown)
}

/// Wrap HTML table captions with the default configuration.
pub fn insert_table_captions(html: &str) -> String {
    DEFAULT_POLISHER.insert_table_captions(html)
}

/// Hyphenate HTML with the default configuration and shared dictionary.
pub fn insert_soft_hyphens(html: &str) -> String {
    DEFAULT_POLISHER.insert_soft_hyphens(html)
}
