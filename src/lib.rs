//! # edgequake-wiki2pdf
//!
//! Prepare Azure DevOps wiki markdown, and the HTML rendered from it, for
//! clean and correctly paginated PDF export.
//!
//! ## Why this crate?
//!
//! The wiki renderer forgives things standard markdown renderers do not
//! (`#Title` headlines, single-newline breaks, tables glued to the paragraph
//! above), and a browser PDF engine needs hints the wiki never writes: page
//! breaks between pages, captions that stay with their tables, and break
//! points inside long German compounds. This crate rewrites the text so the
//! off-the-shelf renderer and PDF engine get both right.
//!
//! ## Pipeline Overview
//!
//! ```text
//! wiki markdown
//!  │
//!  ├─ 1. Normalize   headline spacing, <br>, table captions, page breaks
//!  ├─    (external markdown → HTML renderer)
//!  ├─ 2. Captions    bind the line above each <table> as its caption
//!  ├─ 3. Hyphenate   &shy; into long words, markup left untouched
//!  └─    (external HTML → PDF engine)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_wiki2pdf::{PolishConfig, Polisher};
//!
//! let polisher = Polisher::new(PolishConfig::default());
//! let markdown = polisher.normalize_markdown("#Release notes\nAll tickets\n|id|\n|-|\n|#42|");
//! let html = render_somehow(&markdown);
//! let ready = polisher.polish_html(&html);
//! # fn render_somehow(md: &str) -> String { md.to_string() }
//! ```
//!
//! ## Hyphenation dictionary
//!
//! Hyphenation reads `dictionaries/hyph_de_DE.dic` next to the executable
//! (override with `HYPH_DICT_PATH` or
//! [`PolishConfigBuilder::dictionary_path`]). The file is loaded once per
//! process on first use. If it is missing, an error is logged through
//! `tracing` and hyphenation returns its input unchanged; the rest of the
//! pipeline is unaffected.
//!
//! ## Logging
//!
//! All diagnostics go through [`tracing`]. Install any subscriber in the
//! host application to see them; the library never installs one itself.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod dictionary;
pub mod error;
pub mod markers;
pub mod pipeline;
pub mod polish;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{LineBreakStyle, PolishConfig, PolishConfigBuilder};
pub use dictionary::{DictionaryHandle, Hyphenator};
pub use error::Wiki2PdfError;
pub use polish::{insert_soft_hyphens, insert_table_captions, normalize, Polisher};
