//! Inline HTML markers emitted into the markdown and HTML output.
//!
//! Every marker is plain HTML that both the markdown renderer (as inline or
//! block HTML) and the browser PDF engine understand without extra CSS,
//! except `table-caption`, which the export stylesheet binds to the table
//! with `break-after: avoid`.

/// Forces the PDF engine to start a new page.
pub const PAGE_BREAK: &str = "<div style='page-break-before: always;'></div>";

/// CSS class carried by caption wrappers.
pub const CAPTION_CLASS: &str = "table-caption";

/// Opening tag of a caption wrapper.
pub const CAPTION_OPEN: &str = "<span class=\"table-caption\">";

/// Closing tag of a caption wrapper.
pub const CAPTION_CLOSE: &str = "</span>";

/// Soft hyphen character entity.
pub const SOFT_HYPHEN: &str = "&shy;";

/// Wrap `text` as a table caption.
pub fn wrap_caption(text: &str) -> String {
    format!("{CAPTION_OPEN}{text}{CAPTION_CLOSE}")
}

/// True if `line` already carries a caption wrapper, in either quote style.
pub fn is_caption_wrapped(line: &str) -> bool {
    line.contains(&format!("class=\"{CAPTION_CLASS}\""))
        || line.contains(&format!("class='{CAPTION_CLASS}'"))
}
