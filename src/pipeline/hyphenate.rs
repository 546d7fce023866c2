//! Hyphenation engine: soft hyphens for long words in rendered HTML.
//!
//! German compounds such as *Donaudampfschifffahrtsgesellschaft* overflow
//! narrow table cells and leave ragged gaps in justified text unless the PDF
//! engine is allowed to break them. The engine inserts `&shy;` at every
//! dictionary break point; browsers render it invisibly unless they break
//! the line there.
//!
//! ## Algorithm
//!
//! 1. Swap protected regions for placeholder tokens, in order: style,
//!    script, title and textarea elements, pre and code elements,
//!    blacklisted terms, tables and table captions (see
//!    [`ProtectedSegments`]).
//! 2. Cut the rest into [`Segment`]s; only text segments are scanned.
//! 3. Replace each word of at least `min_word_length` letters with its
//!    dictionary form, break markers turned into `&shy;`.
//! 4. Restore the protected regions.
//!
//! Any inconsistency in step 1 or 4 returns the input unchanged.

use crate::config::PolishConfig;
use crate::dictionary::{Hyphenator, BREAK_MARKER};
use crate::error::Wiki2PdfError;
use crate::markers::{CAPTION_CLASS, SOFT_HYPHEN};
use crate::pipeline::segment::{segments, ProtectedSegments, Segment};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use tracing::{debug, warn};

static RE_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static RE_SCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
// Title text ends up in the PDF metadata.
static RE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title\b[^>]*>.*?</title\s*>").unwrap());
static RE_TEXTAREA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<textarea\b[^>]*>.*?</textarea\s*>").unwrap());
static RE_PRE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre\b[^>]*>.*?</pre\s*>").unwrap());
static RE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<code\b[^>]*>.*?</code\s*>").unwrap());
static RE_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<table\b.*?</table\s*>").unwrap());
/// A caption wrapper up to the end of its line. Both caption passes emit the
/// wrapper on one line; it may contain inline spans of its own.
static RE_CAPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?i)<span\s+class=["']{}["'][^>]*>[^\n]*"#,
        regex::escape(CAPTION_CLASS)
    ))
    .unwrap()
});

/// Letters a hyphenatable word may consist of.
const WORD_LETTERS: &str = "A-Za-zÄÖÜäöüß";

/// Inserts soft hyphens using a [`Hyphenator`].
///
/// Compiles its patterns once; reuse one engine for many documents.
#[derive(Debug, Clone)]
pub struct HyphenationEngine {
    enabled: bool,
    protectors: Vec<Regex>,
    word: Regex,
}

impl HyphenationEngine {
    pub fn new(config: &PolishConfig) -> Self {
        let mut protectors = vec![
            (*RE_STYLE).clone(),
            (*RE_SCRIPT).clone(),
            (*RE_TITLE).clone(),
            (*RE_TEXTAREA).clone(),
        ];
        if config.protect_code {
            protectors.push((*RE_PRE).clone());
            protectors.push((*RE_CODE).clone());
        }
        for term in &config.hyphenation_blacklist {
            match Regex::new(&format!("(?i){}", regex::escape(term))) {
                Ok(re) => protectors.push(re),
                Err(e) => warn!("Ignoring hyphenation blacklist term {term:?}: {e}"),
            }
        }
        if config.protect_tables {
            protectors.push((*RE_TABLE).clone());
            protectors.push((*RE_CAPTION).clone());
        }

        let min = config.min_word_length.max(2);
        let word = Regex::new(&format!(r"\b[{WORD_LETTERS}]{{{min},}}\b"))
            .unwrap_or_else(|_| Regex::new(r"\b[A-Za-z]{3,}\b").unwrap());

        Self {
            enabled: config.hyphenate,
            protectors,
            word,
        }
    }

    /// Insert soft hyphens into `html`.
    ///
    /// Returns the input unchanged when hyphenation is disabled, when no
    /// hyphenator is available, or when protection cannot be undone
    /// exactly.
    pub fn apply(&self, html: &str, hyphenator: Option<&dyn Hyphenator>) -> String {
        if !self.enabled {
            return html.to_string();
        }
        let Some(hyphenator) = hyphenator else {
            debug!("No hyphenation dictionary; passing HTML through");
            return html.to_string();
        };

        match self.try_apply(html, hyphenator) {
            Ok((out, words)) => {
                debug!("Inserted soft hyphens into {} words", words);
                out
            }
            Err(e) => {
                warn!("Hyphenation skipped: {e}");
                html.to_string()
            }
        }
    }

    fn try_apply(
        &self,
        html: &str,
        hyphenator: &dyn Hyphenator,
    ) -> Result<(String, usize), Wiki2PdfError> {
        ProtectedSegments::check_input(html)?;

        let mut vault = ProtectedSegments::new();
        let mut text = html.to_string();
        for pattern in &self.protectors {
            text = vault.protect(&text, pattern);
        }

        let mut words = 0usize;
        let mut out = String::with_capacity(text.len() + text.len() / 8);
        for segment in segments(&text) {
            match segment {
                Segment::Text(t) => out.push_str(&self.hyphenate_text(t, hyphenator, &mut words)),
                other => out.push_str(other.as_str()),
            }
        }

        Ok((vault.restore(&out)?, words))
    }

    fn hyphenate_text<'t>(
        &self,
        text: &'t str,
        hyphenator: &dyn Hyphenator,
        words: &mut usize,
    ) -> Cow<'t, str> {
        self.word.replace_all(text, |caps: &Captures<'_>| {
            let word = &caps[0];
            match hyphenator.hyphenate(word) {
                Some(marked) if is_marked_form_of(&marked, word) => {
                    *words += 1;
                    marked.replace(BREAK_MARKER, SOFT_HYPHEN)
                }
                _ => word.to_string(),
            }
        })
    }
}

/// `marked` is `word` plus at least one break marker, nothing else.
fn is_marked_form_of(marked: &str, word: &str) -> bool {
    marked.contains(BREAK_MARKER) && marked.chars().filter(|&c| c != BREAK_MARKER).eq(word.chars())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockHyphenator(HashMap<&'static str, &'static str>);

    impl MockHyphenator {
        fn german() -> Self {
            Self(HashMap::from([
                (
                    "Donaudampfschifffahrtsgesellschaft",
                    "Do=nau=dampf=schiff=fahrts=ge=sell=schaft",
                ),
                ("Silbentrennung", "Sil=ben=tren=nung"),
                ("Tabelle", "Ta=bel=le"),
                ("Kapitän", "Ka=pi=tän"),
                ("Kaputt", "Ka=pxtt"),
                ("Azure", "Azu=re"),
            ]))
        }
    }

    impl Hyphenator for MockHyphenator {
        fn hyphenate(&self, word: &str) -> Option<String> {
            self.0.get(word).map(|s| s.to_string())
        }
    }

    fn run(html: &str) -> String {
        run_with(html, &PolishConfig::default())
    }

    fn run_with(html: &str, config: &PolishConfig) -> String {
        HyphenationEngine::new(config).apply(html, Some(&MockHyphenator::german()))
    }

    #[test]
    fn test_word_in_paragraph_gets_soft_hyphens() {
        assert_eq!(
            run("<p>Die Donaudampfschifffahrtsgesellschaft</p>"),
            "<p>Die Do&shy;nau&shy;dampf&shy;schiff&shy;fahrts&shy;ge&shy;sell&shy;schaft</p>"
        );
    }

    #[test]
    fn test_umlaut_word() {
        assert_eq!(run("Kapitän"), "Ka&shy;pi&shy;tän");
    }

    #[test]
    fn test_script_and_style_untouched() {
        let html = "<script>var s = 'Donaudampfschifffahrtsgesellschaft';</script>\
                    <style>.Silbentrennung { color: red }</style>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_attributes_untouched() {
        let html = "<img alt=\"Silbentrennung\" title='Tabelle'>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_tables_and_captions_protected_by_default() {
        let html = "<span class=\"table-caption\">Tabelle</span>\n<table><tr><td>Silbentrennung</td></tr></table>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_caption_with_inline_span_fully_protected() {
        let html = "<p><span class=\"table-caption\"><span>x</span> Tabelle</span></p>\n<p>Tabelle</p>";
        assert_eq!(
            run(html),
            "<p><span class=\"table-caption\"><span>x</span> Tabelle</span></p>\n<p>Ta&shy;bel&shy;le</p>"
        );
    }

    #[test]
    fn test_title_and_textarea_untouched() {
        let html = "<title>Tabelle</title><textarea name=\"n\">Silbentrennung</textarea>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_tables_hyphenated_when_unprotected() {
        let config = PolishConfig::builder().protect_tables(false).build().unwrap();
        let out = run_with("<table><tr><td>Tabelle</td></tr></table>", &config);
        assert_eq!(out, "<table><tr><td>Ta&shy;bel&shy;le</td></tr></table>");
    }

    #[test]
    fn test_code_protected() {
        let html = "<pre><code>Silbentrennung</code></pre> <code>Tabelle</code>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_blacklist_is_case_insensitive() {
        let config = PolishConfig::builder().blacklist_term("azure").build().unwrap();
        assert_eq!(run_with("<p>Azure Tabelle</p>", &config), "<p>Azure Ta&shy;bel&shy;le</p>");
    }

    #[test]
    fn test_entities_untouched() {
        assert_eq!(run("Tabelle&nbsp;&amp;"), "Ta&shy;bel&shy;le&nbsp;&amp;");
    }

    #[test]
    fn test_threshold() {
        let config = PolishConfig::builder().min_word_length(8).build().unwrap();
        assert_eq!(run_with("Tabelle", &config), "Tabelle");
        assert_eq!(run_with("Silbentrennung", &config), "Sil&shy;ben&shy;tren&shy;nung");
    }

    #[test]
    fn test_word_glued_to_digits_skipped() {
        assert_eq!(run("Tabelle2"), "Tabelle2");
    }

    #[test]
    fn test_corrupting_dictionary_answer_ignored() {
        assert_eq!(run("Kaputt"), "Kaputt");
    }

    #[test]
    fn test_no_hyphenator_passes_through() {
        let engine = HyphenationEngine::new(&PolishConfig::default());
        assert_eq!(engine.apply("<p>Tabelle</p>", None), "<p>Tabelle</p>");
    }

    #[test]
    fn test_disabled_passes_through() {
        let config = PolishConfig::builder().hyphenate(false).build().unwrap();
        assert_eq!(run_with("Tabelle", &config), "Tabelle");
    }

    #[test]
    fn test_sentinel_in_input_passes_through() {
        let html = "Tabelle \u{E000}7\u{E001}";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_marked_form_check() {
        assert!(is_marked_form_of("Ta=bel=le", "Tabelle"));
        assert!(!is_marked_form_of("Tabelle", "Tabelle"));
        assert!(!is_marked_form_of("Ta=bxl=le", "Tabelle"));
    }
}
