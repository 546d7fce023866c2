//! HTML segmentation and reversible placeholder protection.
//!
//! The hyphenation engine must never touch markup, so rendered HTML is cut
//! into [`Segment`]s: tags, character entities and placeholders pass
//! through verbatim; only [`Segment::Text`] is ever rewritten.
//!
//! Whole regions (style and script elements, tables, blacklisted terms) are
//! swapped out beforehand by [`ProtectedSegments`]. Each region becomes a
//! token `U+E000 <index> U+E001`. Private-use code points do not occur in
//! wiki content, and input that does contain them is refused up front, so a
//! token can never collide with real text.

use crate::error::Wiki2PdfError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Opens a placeholder token.
pub const SENTINEL_OPEN: char = '\u{E000}';
/// Closes a placeholder token.
pub const SENTINEL_CLOSE: char = '\u{E001}';

static RE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}([0-9]+)\x{E001}").unwrap());

static RE_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"<[^<>]*>|&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);|\x{E000}[0-9]+\x{E001}",
    )
    .unwrap()
});

/// One piece of an HTML string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// `<…>` markup, including comments and doctype.
    Tag(&'a str),
    /// `&name;`, `&#123;` or `&#x1F;`.
    Entity(&'a str),
    /// A protected-region token.
    Placeholder(&'a str),
    /// Running text between the above.
    Text(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Segment::Tag(s) | Segment::Entity(s) | Segment::Placeholder(s) | Segment::Text(s) => s,
        }
    }
}

/// Split `input` into segments. Concatenating them yields `input` again.
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in RE_SEGMENT.find_iter(input) {
        if m.start() > last {
            out.push(Segment::Text(&input[last..m.start()]));
        }
        let s = m.as_str();
        out.push(if s.starts_with('<') {
            Segment::Tag(s)
        } else if s.starts_with('&') {
            Segment::Entity(s)
        } else {
            Segment::Placeholder(s)
        });
        last = m.end();
    }
    if last < input.len() {
        out.push(Segment::Text(&input[last..]));
    }
    out
}

/// Originals of every region replaced by a placeholder token.
#[derive(Debug, Default)]
pub struct ProtectedSegments {
    originals: Vec<String>,
}

impl ProtectedSegments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse input that already contains a sentinel.
    pub fn check_input(input: &str) -> Result<(), Wiki2PdfError> {
        match input.chars().find(|&c| c == SENTINEL_OPEN || c == SENTINEL_CLOSE) {
            Some(c) => Err(Wiki2PdfError::PlaceholderCollision { sentinel: c as u32 }),
            None => Ok(()),
        }
    }

    /// Replace every match of `pattern` in `input` with a fresh token.
    pub fn protect(&mut self, input: &str, pattern: &Regex) -> String {
        pattern
            .replace_all(input, |caps: &Captures<'_>| self.stash(&caps[0]))
            .into_owned()
    }

    fn stash(&mut self, original: &str) -> String {
        let token = format!("{SENTINEL_OPEN}{}{SENTINEL_CLOSE}", self.originals.len());
        self.originals.push(original.to_string());
        token
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Put every original back.
    ///
    /// Regions protected later may contain tokens of earlier ones, so
    /// restoration repeats until no token is left. Every token must be
    /// restored exactly once.
    pub fn restore(&self, text: &str) -> Result<String, Wiki2PdfError> {
        let expected = self.originals.len();
        let mut used = vec![false; expected];
        let mut restored = 0usize;
        let mut current = text.to_string();

        for _ in 0..=expected {
            if !current.contains(SENTINEL_OPEN) {
                break;
            }
            let mut unknown = false;
            current = RE_PLACEHOLDER
                .replace_all(&current, |caps: &Captures<'_>| {
                    let index = caps[1].parse::<usize>().ok();
                    match index.filter(|&i| i < expected && !used[i]) {
                        Some(i) => {
                            used[i] = true;
                            restored += 1;
                            self.originals[i].clone()
                        }
                        None => {
                            unknown = true;
                            caps[0].to_string()
                        }
                    }
                })
                .into_owned();
            if unknown {
                break;
            }
        }

        if restored != expected || current.contains(SENTINEL_OPEN) {
            return Err(Wiki2PdfError::PlaceholderMismatch { expected, restored });
        }
        Ok(current)
    }
}
