//! HTML caption post-processor.
//!
//! The markdown normalizer only sees pipe tables. Tables written as raw HTML
//! in the wiki, or produced by renderer extensions, surface only after
//! rendering, so this pass repeats the caption binding on the HTML: the
//! nearest non-blank line above each `<table>` becomes its caption unless
//! it is structural markup.

use crate::config::PolishConfig;
use crate::markers;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_TABLE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^<table[\s>]").unwrap());

static RE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^<h[1-6][\s>]|</h[1-6]>$").unwrap());

/// Opening or closing block containers a span must not be nested into.
static RE_BLOCK_CONTAINER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^</?(?:div|table|ul|ol|pre|blockquote)[\s>]|</(?:div|table|ul|ol|pre|blockquote)>$")
        .unwrap()
});

/// A line consisting of exactly one tag, e.g. `</p>` or `<tbody>`.
static RE_BARE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[^<>]+>$").unwrap());

/// Empty paragraphs the renderer emits for intentional blank lines.
static RE_EMPTY_PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<p>\s*(?:<br\s*/?>|&nbsp;)?\s*</p>$").unwrap()
});

/// Closing block tags and `<br>` at the end of a line; they stay outside the span.
static RE_TRAILING_CLOSERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:(?:</(?:p|li|dd|dt|td|th|figcaption)\s*>|<br\s*/?>)\s*)+$").unwrap()
});

/// Opening or closing tag of a block the caption text may sit in.
static RE_BLOCK_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:p|li|dd|dt|td|th|figcaption)(?:\s[^>]*)?>").unwrap()
});

/// Wrap the line above each HTML table as its caption.
///
/// Never fails and is idempotent: a line that already carries a caption
/// wrapper is left alone.
pub fn insert_table_captions(html: &str, config: &PolishConfig) -> String {
    if !config.table_captions {
        return html.to_string();
    }

    let mut lines: Vec<String> = html.split('\n').map(str::to_string).collect();
    let mut wrapped = 0usize;

    for i in 0..lines.len() {
        if !RE_TABLE_START.is_match(lines[i].trim_start()) {
            continue;
        }
        let Some(j) = (0..i).rev().find(|&j| !lines[j].trim().is_empty()) else {
            continue;
        };
        if is_caption_candidate(&lines[j], config) {
            lines[j] = wrap_line(&lines[j]);
            wrapped += 1;
        }
    }

    debug!("Wrapped {} HTML table captions", wrapped);
    lines.join("\n")
}

fn is_caption_candidate(line: &str, config: &PolishConfig) -> bool {
    let trimmed = line.trim();
    if markers::is_caption_wrapped(trimmed)
        || RE_HEADING.is_match(trimmed)
        || RE_BLOCK_CONTAINER.is_match(trimmed)
        || RE_BARE_TAG.is_match(trimmed)
    {
        return false;
    }
    !(config.respect_blank_line_markers && RE_EMPTY_PARAGRAPH.is_match(trimmed))
}

/// Wrap the text after the last block boundary on the line, so no block tag
/// ends up inside the span. Paragraphs may open on an earlier line.
fn wrap_line(line: &str) -> String {
    let indent = line.len() - line.trim_start().len();
    let (lead, rest) = line.split_at(indent);
    let body = rest.trim_end();

    let tail_start = RE_TRAILING_CLOSERS.find(body).map_or(body.len(), |m| m.start());
    let mut content = &body[..tail_start];
    let mut tail = body[tail_start..].to_string();

    loop {
        let boundary = RE_BLOCK_BOUNDARY.find_iter(content).last();
        let inner_start = boundary.map_or(0, |m| m.end());
        if !content[inner_start..].trim().is_empty() {
            let (prefix, inner) = content.split_at(inner_start);
            return format!("{lead}{prefix}{}{tail}", markers::wrap_caption(inner));
        }
        // Empty block at the end, e.g. `Text<p></p>`: look before it.
        match boundary {
            Some(m) => {
                tail = format!("{}{tail}", &content[m.start()..]);
                content = &content[..m.start()];
            }
            None => return line.to_string(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
