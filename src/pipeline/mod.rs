//! Pipeline stages for wiki-to-PDF preparation.
//!
//! Each submodule implements exactly one transformation step. Stages are
//! pure `&str → String` functions with no state shared between documents,
//! so they can be tested in isolation and run in any host thread.
//!
//! ## Data Flow
//!
//! ```text
//! markdown ──▶ normalize ──▶ (renderer) ──▶ captions ──▶ hyphenate ──▶ (PDF engine)
//! ```
//!
//! 1. [`normalize`]: headline spacing, forced line breaks, table captions
//!    and page breaks on the raw wiki markdown
//! 2. [`captions`]:  caption binding for tables that only exist as HTML
//! 3. [`hyphenate`]: soft hyphens in running text, with markup and
//!    protected regions left byte-identical
//!
//! [`segment`] holds the HTML tokenizer and placeholder store that
//! [`hyphenate`] builds on.

pub mod captions;
pub mod hyphenate;
pub mod normalize;
pub mod segment;
