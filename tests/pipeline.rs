//! End-to-end tests for the three pipeline stages.
//!
//! No markdown renderer is involved: the HTML inputs are written the way the
//! wiki export renderer emits them (one block element per line).
//!
//! Run with:
//!   cargo test --test pipeline -- --nocapture
//!
//! Set `RUST_LOG=edgequake_wiki2pdf=debug` to see stage summaries.

use edgequake_wiki2pdf::markers::{PAGE_BREAK, SOFT_HYPHEN};
use edgequake_wiki2pdf::{normalize, insert_table_captions, PolishConfig, Polisher};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A small German pattern file that breaks the classic compound at its joints.
const GERMAN_PATTERNS: &str = "ISO8859-1\n\
    LEFTHYPHENMIN 2\n\
    RIGHTHYPHENMIN 2\n\
    % compound joints only\n\
    au1d\n\
    pf1s\n\
    ff1f\n\
    ts1g\n\
    l1s\n\
    NEXTLEVEL\n\
    1ta\n";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn dictionary_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(GERMAN_PATTERNS.as_bytes()).expect("write patterns");
    file
}

fn polisher_with_dictionary(path: &Path) -> Polisher {
    Polisher::new(
        PolishConfig::builder()
            .dictionary_path(path)
            .build()
            .expect("valid config"),
    )
}

// ── Scenario A: headline, caption, table ────────────────────────────────────

#[test]
fn scenario_a_headline_caption_and_table() {
    init_tracing();
    let out = normalize("#Title\nSome text\n|a|b|\n|-|-|\n|1|2|");
    assert_eq!(
        out,
        "# Title<br>\n<span class=\"table-caption\">Some text</span>\n\n|a|b|\n|-|-|\n|1|2|"
    );
    for row in out.lines().filter(|l| l.starts_with('|')) {
        assert!(!row.ends_with("<br>"), "table row decorated: {row}");
    }
}

// ── Scenario B: subsections never page-break ────────────────────────────────

#[test]
fn scenario_b_consecutive_subheadings_have_no_page_break() {
    let out = normalize("## Sub\ntext\n## Sub\nmore");
    assert!(!out.contains(PAGE_BREAK), "got: {out}");
    assert_eq!(out, "## Sub<br>\ntext<br>\n## Sub<br>\nmore<br>");
}

#[test]
fn consecutive_top_level_pages_are_separated() {
    let out = normalize("# Page one\nintro\n# Page two\n## Detail\n# Page three");
    assert_eq!(out.matches(PAGE_BREAK).count(), 1, "got: {out}");
    assert!(out.contains(&format!("{PAGE_BREAK}\n\n# Page two<br>")));
}

// ── Scenario C: hyphenation with a real dictionary ──────────────────────────

#[test]
fn scenario_c_compound_is_hyphenated_outside_script_only() {
    init_tracing();
    let dict = dictionary_file();
    let polisher = polisher_with_dictionary(dict.path());

    let out = polisher.insert_soft_hyphens("<p>Donaudampfschifffahrtsgesellschaft</p>");
    assert_eq!(
        out,
        format!(
            "<p>Donau{s}dampf{s}schiff{s}fahrts{s}gesell{s}schaft</p>",
            s = SOFT_HYPHEN
        )
    );

    let script = "<script>const k = \"Donaudampfschifffahrtsgesellschaft\";</script>";
    assert_eq!(polisher.insert_soft_hyphens(script), script);
}

#[test]
fn missing_dictionary_is_pass_through() {
    init_tracing();
    let polisher = polisher_with_dictionary(Path::new("/nonexistent/dictionaries/hyph_de_DE.dic"));
    let html = "<p>Donaudampfschifffahrtsgesellschaft</p>";
    assert_eq!(polisher.insert_soft_hyphens(html), html);
    assert_eq!(polisher.polish_html(html), html);
}

#[test]
fn protected_blocks_are_byte_identical() {
    let dict = dictionary_file();
    let polisher = Polisher::new(
        PolishConfig::builder()
            .dictionary_path(dict.path())
            .blacklist_term("DONAUDAMPF")
            .build()
            .unwrap(),
    );
    let blocks = [
        "<style>p.Donaudampfschifffahrtsgesellschaft{}</style>",
        "<script>Donaudampfschifffahrtsgesellschaft()</script>",
        "<table>\n<tr><td>Donaudampfschifffahrtsgesellschaft</td></tr>\n</table>",
        "<a href=\"/Donaudampfschifffahrtsgesellschaft\" title=\"Donaudampfschifffahrtsgesellschaft\">x</a>",
        "<p>Donaudampf</p>",
    ];
    for block in blocks {
        assert_eq!(polisher.insert_soft_hyphens(block), block, "altered: {block}");
    }
}

#[test]
fn only_soft_hyphens_are_inserted() {
    let dict = dictionary_file();
    let polisher = polisher_with_dictionary(dict.path());
    let html = "<h1 id=\"x\">Gesellschaft &amp; Donaudampfschifffahrtsgesellschaft</h1>\n<p>kurz</p>";
    let out = polisher.insert_soft_hyphens(html);
    assert_ne!(out, html);
    assert_eq!(out.replace(SOFT_HYPHEN, ""), html);
}

// ── Scenario D: caption binding depends on adjacency ────────────────────────

#[test]
fn scenario_d_adjacent_text_is_caption_blank_line_is_not() {
    let adjacent = normalize("Umsatz 2024\n| Q1 | Q2 |\n|----|----|");
    assert_eq!(
        adjacent,
        "<span class=\"table-caption\">Umsatz 2024</span>\n\n| Q1 | Q2 |\n|----|----|"
    );

    let separated = normalize("Umsatz 2024\n\n| Q1 | Q2 |\n|----|----|");
    assert!(!separated.contains("table-caption"), "got: {separated}");
    assert_eq!(separated, "Umsatz 2024<br>\n\n| Q1 | Q2 |\n|----|----|");
}

// ── Properties ──────────────────────────────────────────────────────────────

#[test]
fn fenced_lines_never_get_breaks() {
    let md = "intro\n```\n# not a headline\nplain\n|x|y|\n```\n```bash\necho hi\n```\noutro";
    let out = normalize(md);
    let mut inside = false;
    for line in out.lines() {
        if line.trim_start().starts_with("```") {
            assert!(!line.ends_with("<br>"), "fence decorated: {line}");
            inside = !inside;
            continue;
        }
        if inside {
            assert!(!line.ends_with("<br>"), "code line decorated: {line}");
        }
    }
    assert!(out.contains("# not a headline\n"));
}

#[test]
fn work_items_are_never_headlines() {
    let out = normalize("# Sprint\n#1234\n#5678 follow-up\n| id |\n|----|");
    assert!(out.contains("#1234<br>"));
    assert!(!out.contains("# 1234"));
    assert!(!out.contains(PAGE_BREAK));
    assert!(out.contains("<span class=\"table-caption\">#5678 follow-up</span>"));
}

#[test]
fn headline_spacing_is_idempotent() {
    let config = PolishConfig::builder().line_breaks(false).build().unwrap();
    let polisher = Polisher::new(config);
    let once = polisher.normalize_markdown("#A\n##B\n### C");
    assert_eq!(polisher.normalize_markdown(&once), once);
    assert_eq!(once, "# A\n## B\n### C");
}

#[test]
fn html_captions_are_idempotent() {
    let html = "<h2>Zahlen</h2>\n<p>Umsatz</p>\n\n<table>\n<tr><td>1</td></tr>\n</table>\n<ul><li>x</li></ul>\n<table>\n</table>";
    let once = insert_table_captions(html);
    assert_eq!(once.matches("table-caption").count(), 1, "got: {once}");
    assert_eq!(insert_table_captions(&once), once);
}

/// Panics unless every non-void element is closed in reverse opening order.
fn assert_well_nested(html: &str) {
    let tag = regex::Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)[^>]*>").unwrap();
    let mut open: Vec<String> = Vec::new();
    for caps in tag.captures_iter(html) {
        let name = caps[2].to_ascii_lowercase();
        if matches!(name.as_str(), "br" | "hr" | "img") {
            continue;
        }
        if caps[1].is_empty() {
            open.push(name);
        } else {
            assert_eq!(open.pop().as_deref(), Some(name.as_str()), "misnested in: {html}");
        }
    }
    assert!(open.is_empty(), "unclosed {open:?} in: {html}");
}

#[test]
fn caption_on_multiline_paragraph_is_well_nested() {
    let md = normalize("Intro\nQuarterly figures\n<table>\n<tr><td>1</td></tr>\n</table>");
    let (paragraph, _) = md.split_once("\n<table>").expect("table line kept");
    assert_eq!(paragraph, "Intro<br>\nQuarterly figures<br>");

    // The renderer keeps the lines and closes the paragraph on the last one.
    let html = format!("<p>{paragraph}</p>\n<table>\n<tr><td>1</td></tr>\n</table>");
    let out = insert_table_captions(&html);
    assert_eq!(
        out,
        "<p>Intro<br>\n<span class=\"table-caption\">Quarterly figures</span><br></p>\n<table>\n<tr><td>1</td></tr>\n</table>"
    );
    assert_well_nested(&out);
}

#[test]
fn full_pipeline_on_rendered_page() {
    let dict = dictionary_file();
    let polisher = polisher_with_dictionary(dict.path());

    let md = polisher.normalize_markdown("[[_TOC_]]\n#Bericht\nDonaudampfschifffahrtsgesellschaft");
    assert_eq!(md, "[[_TOC_]]\n# Bericht<br>\nDonaudampfschifffahrtsgesellschaft<br>");

    // What the renderer would make of it.
    let html = "<h1 id=\"bericht\">Bericht<br></h1>\n<p>Donaudampfschifffahrtsgesellschaft<br></p>\n<p>Gesellschaft</p>\n<table>\n<tr><td>Gesellschaft</td></tr>\n</table>";
    let out = polisher.polish_html(html);
    assert!(out.contains("<p>Donau&shy;dampf"), "got: {out}");
    assert!(out.contains("<p><span class=\"table-caption\">Gesellschaft</span></p>"));
    assert!(out.contains("<td>Gesellschaft</td>"));
}
