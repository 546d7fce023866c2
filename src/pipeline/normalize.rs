//! Markdown normalizer: wiki markdown → renderer-friendly markdown.
//!
//! ## Why is normalization necessary?
//!
//! The Azure DevOps wiki renderer is lenient in ways standard markdown
//! renderers are not:
//!
//! - `#Title` is a headline in the wiki, plain text elsewhere
//! - a single newline is a hard break in the wiki, a soft wrap elsewhere
//! - a table directly below a paragraph line is still a table in the wiki,
//!   but a continuation of the paragraph for CommonMark-style renderers
//!
//! On top of that the PDF needs print-only decoration: a caption bound to
//! each table and page breaks between consecutive top-level pages.
//!
//! ## How it works
//!
//! One forward fold over the lines. [`ScanState`] is the fold accumulator;
//! [`ScanState::step`] is the pure transition function that turns one
//! classified line into [`LineActions`]. The driver applies those actions to
//! an append-only [`OutputBuilder`] whose last emitted line stays rewritable
//! so a table can claim it as its caption.

use crate::config::PolishConfig;
use crate::markers::{self, PAGE_BREAK};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::{debug, trace};

/// Normalize wiki markdown for rendering.
///
/// Never fails; lines no rule applies to are passed through unchanged.
/// Line endings are normalised to `\n`.
pub fn normalize_markdown(input: &str, config: &PolishConfig) -> String {
    let text = normalise_line_endings(input);
    let lines: Vec<&str> = text.split('\n').collect();

    let (state, out) = lines.iter().enumerate().fold(
        (ScanState::default(), OutputBuilder::with_capacity(lines.len())),
        |(state, mut out), (i, raw)| {
            let next = lines.get(i + 1).copied();
            let state = scan_line(state, raw, next, config, &mut out);
            (state, out)
        },
    );

    if state.in_code_block {
        debug!("Markdown ends inside an unterminated code fence; left as is");
    }
    debug!(
        "Normalized {} lines: {} tables, {} captions, {} page breaks, {} line breaks",
        lines.len(),
        out.stats.tables,
        out.stats.captions,
        out.stats.page_breaks,
        out.stats.line_breaks
    );
    out.finish()
}

// ── Rule 0: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

// ── Rule 1: Headline spacing ─────────────────────────────────────────────────

// A digit after the `#` run is a work-item reference (#1234), not a headline.
static RE_HEADLINE_NO_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#+)([^#\s\d])").unwrap());

/// Insert the missing space in `#Title`-style headlines.
pub fn fix_headline_spacing(line: &str) -> Cow<'_, str> {
    RE_HEADLINE_NO_SPACE.replace(line, "$1 $2")
}

// ── Rule 2: Line classification ──────────────────────────────────────────────

/// What a single markdown line is, judged by its own trimmed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// ```` ``` ```` opening or closing a code block.
    Fence,
    /// Empty or whitespace-only.
    Blank,
    /// Contains a table-of-contents marker.
    TocMarker,
    /// Starts and ends with `|`.
    TableRow,
    /// `#` to `######` followed by whitespace or nothing.
    Headline(u8),
    /// Anything else, including work-item references.
    Text,
}

impl LineKind {
    pub fn classify(line: &str, config: &PolishConfig) -> Self {
        let trimmed = line.trim();
        if is_fence(trimmed) {
            LineKind::Fence
        } else if trimmed.is_empty() {
            LineKind::Blank
        } else if config.is_toc_line(trimmed) {
            LineKind::TocMarker
        } else if is_table_row(trimmed) {
            LineKind::TableRow
        } else if let Some(level) = headline_level(trimmed) {
            LineKind::Headline(level)
        } else {
            LineKind::Text
        }
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// True for a pipe-delimited table row.
pub fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.ends_with('|') && trimmed.len() > 2
}

/// Level of an ATX headline, or `None` for text and work-item references.
pub fn headline_level(line: &str) -> Option<u8> {
    let trimmed = line.trim_start();
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    match trimmed[hashes..].chars().next() {
        None => Some(hashes as u8),
        Some(c) if c.is_whitespace() => Some(hashes as u8),
        Some(_) => None,
    }
}

// ── Rule 2: State machine ────────────────────────────────────────────────────

/// State carried from one line to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    pub in_code_block: bool,
    pub in_table: bool,
    /// The current table claimed the line above it as caption.
    pub table_has_caption: bool,
    /// A level-1 headline was seen and no level ≥2 headline followed yet.
    pub top_level_headline_open: bool,
}

/// Facts about the neighbourhood of the current line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineContext {
    /// The next raw line is a table row.
    pub next_is_table_row: bool,
    /// The previously emitted line may become a table caption.
    pub previous_captionable: bool,
}

/// What the driver must do for the current line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineActions {
    /// Append the forced line-break suffix.
    pub line_break: bool,
    /// Emit a page break before the line.
    pub page_break: bool,
    /// The line is the first row of a table.
    pub open_table: bool,
    /// Wrap the previously emitted line as the table's caption.
    pub wrap_caption: bool,
    /// The line ends the current table.
    pub close_table: bool,
    /// A later table may claim this line as its caption.
    pub captionable: bool,
}

impl ScanState {
    /// Transition on one classified line.
    pub fn step(self, kind: LineKind, ctx: LineContext) -> (ScanState, LineActions) {
        let mut next = self;
        let mut actions = LineActions::default();

        if self.in_code_block {
            if kind == LineKind::Fence {
                next.in_code_block = false;
            }
            return (next, actions);
        }

        if self.in_table && !matches!(kind, LineKind::TableRow | LineKind::Blank) {
            next.in_table = false;
            next.table_has_caption = false;
            actions.close_table = true;
        }

        match kind {
            LineKind::Fence => next.in_code_block = true,
            LineKind::Blank | LineKind::TocMarker => {}
            LineKind::TableRow => {
                if !self.in_table {
                    next.in_table = true;
                    next.table_has_caption = ctx.previous_captionable;
                    actions.open_table = true;
                    actions.wrap_caption = ctx.previous_captionable;
                }
            }
            LineKind::Headline(level) => {
                actions.line_break = !ctx.next_is_table_row;
                if actions.line_break {
                    if level == 1 {
                        actions.page_break = self.top_level_headline_open;
                        next.top_level_headline_open = true;
                    } else {
                        next.top_level_headline_open = false;
                    }
                }
            }
            LineKind::Text => {
                actions.line_break = !ctx.next_is_table_row;
                actions.captionable = true;
            }
        }

        (next, actions)
    }
}

// ── Rule 2: Driver ───────────────────────────────────────────────────────────

fn scan_line(
    state: ScanState,
    raw: &str,
    next: Option<&str>,
    config: &PolishConfig,
    out: &mut OutputBuilder,
) -> ScanState {
    let line = if state.in_code_block || is_fence(raw) {
        Cow::Borrowed(raw)
    } else {
        fix_headline_spacing(raw)
    };

    let kind = LineKind::classify(&line, config);
    let ctx = LineContext {
        next_is_table_row: next.is_some_and(is_table_row),
        previous_captionable: config.table_captions && out.last_is_captionable(),
    };
    let (next_state, actions) = state.step(kind, ctx);

    if actions.close_table {
        trace!(captioned = state.table_has_caption, "table closed");
    }

    if actions.open_table {
        if actions.wrap_caption {
            out.wrap_last_as_caption();
        }
        // Renderers only detect the table reliably after a blank line.
        if !out.last_is_blank() {
            out.push(String::new(), false);
        }
        out.stats.tables += 1;
        out.push(line.into_owned(), false);
        return next_state;
    }

    if actions.page_break && config.page_breaks {
        out.push(PAGE_BREAK.to_string(), false);
        // Keeps the headline out of the HTML block opened by the marker.
        out.push(String::new(), false);
        out.stats.page_breaks += 1;
    }

    let mut text = line.into_owned();
    if actions.line_break && config.line_breaks {
        text.push_str(config.line_break_style.suffix());
        out.stats.line_breaks += 1;
    }
    let captionable = actions.captionable && !markers::is_caption_wrapped(&text);
    out.push(text, captionable);

    next_state
}

#[derive(Debug, Default)]
struct NormalizeStats {
    tables: usize,
    captions: usize,
    page_breaks: usize,
    line_breaks: usize,
}

#[derive(Debug)]
struct EmittedLine {
    text: String,
    captionable: bool,
}

/// Append-only output with a rewritable last line.
#[derive(Debug)]
struct OutputBuilder {
    done: Vec<String>,
    last: Option<EmittedLine>,
    stats: NormalizeStats,
}

impl OutputBuilder {
    fn with_capacity(lines: usize) -> Self {
        Self {
            done: Vec::with_capacity(lines + lines / 4),
            last: None,
            stats: NormalizeStats::default(),
        }
    }

    fn push(&mut self, text: String, captionable: bool) {
        if let Some(prev) = self.last.replace(EmittedLine { text, captionable }) {
            self.done.push(prev.text);
        }
    }

    fn last_is_captionable(&self) -> bool {
        self.last.as_ref().is_some_and(|l| l.captionable)
    }

    /// Start of document counts as blank.
    fn last_is_blank(&self) -> bool {
        self.last.as_ref().is_none_or(|l| l.text.trim().is_empty())
    }

    fn wrap_last_as_caption(&mut self) {
        if let Some(last) = self.last.as_mut().filter(|l| l.captionable) {
            let indent = last.text.len() - last.text.trim_start().len();
            let (lead, body) = last.text.split_at(indent);
            last.text = format!("{lead}{}", markers::wrap_caption(body.trim_end()));
            last.captionable = false;
            self.stats.captions += 1;
        }
    }

    fn finish(mut self) -> String {
        if let Some(last) = self.last.take() {
            self.done.push(last.text);
        }
        self.done.join("\n")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
