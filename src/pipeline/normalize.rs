//! Normalisation: deterministic canonicalisation of extracted text.
//!
//! Every extractor funnels its raw text through [`normalize`] so that the
//! output of all five formats converges on the same Markdown conventions.
//! The rules are cheap regex/string passes with no shared state.
//!
//! ## Rule Order
//!
//! Carriage returns go first so the line-anchored bullet rule sees clean
//! `\n` line ends. Blank-line collapsing runs after bullets, and trimming
//! runs last. With this order a second pass is always a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

/// Normalise raw extracted text into Markdown-safe text.
///
/// Rules (applied in order):
/// 1. Strip every carriage return
/// 2. Rewrite the UTF-8-as-CP1252 mojibake bullet (`â€¢`) anywhere to `- `
/// 3. Rewrite known bullet glyphs at line start to a `- ` list marker
/// 4. Collapse 3+ consecutive newlines down to exactly 2
/// 5. Trim leading and trailing whitespace
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(input: &str) -> String {
    let s = strip_carriage_returns(input);
    let s = repair_mojibake_bullets(&s);
    let s = canonicalise_bullets(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Strip carriage returns ──────────────────────────────────────────

fn strip_carriage_returns(input: &str) -> String {
    input.replace('\r', "")
}

// ── Rule 2: Repair mojibake bullets ─────────────────────────────────────────

fn repair_mojibake_bullets(input: &str) -> String {
    input.replace("â€¢ ", "- ").replace("â€¢", "- ")
}

// ── Rule 3: Canonicalise bullet glyphs ──────────────────────────────────────
//
// U+F0B7 and U+F0A7 are the Symbol/Wingdings private-use bullets that PDF
// text layers and Word exports leak when the font mapping is lost.
// Indentation is any horizontal whitespace, NBSP included, matching what the
// final trim removes.

static RE_BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([^\S\n]*)[\u{2022}\u{25CF}\u{25AA}\u{25E6}\u{2023}\u{2219}\u{25A0}\u{25BA}\u{25B8}\u{27A2}\u{F0B7}\u{F0A7}][^\S\n]*")
        .unwrap()
});

fn canonicalise_bullets(input: &str) -> String {
    RE_BULLET.replace_all(input, "${1}- ").to_string()
}

// ── Rule 4: Collapse excessive blank lines ──────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "\r\n\r\n\r\n",
        "Hello",
        "a\r\nb\rc",
        "a\n\n\n\n\nb",
        "a\n\r\n\r\n\r\nb",
        "• one\n• two",
        "  ● nested\n\t▪ tab",
        "â€¢ mojibake",
        "inline • bullet stays",
        "••double",
        "• \n• ",
        "\u{F0B7}\tsymbol font",
        "\u{a0}• item",
        "\u{2003}● em-indented\n\u{a0}\u{a0}▪ nbsp",
        "•\u{a0}after nbsp",
        "## Slide 1\n\n\n\n## Slide 2\n",
        "| a | b |\n| --- | --- |\n| 1 | 2 |",
        "**bold** and *italic* and <u>under</u>",
        "\n\n\n• leading blank lines",
        "- already a list\n- item",
        "text\n\n--- Page Break ---\n\nmore",
    ];

    #[test]
    fn strips_carriage_returns() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nbc");
        for s in SAMPLES {
            assert!(!normalize(s).contains('\r'), "CR left in {s:?}");
        }
    }

    #[test]
    fn collapses_three_or_more_newlines_to_two() {
        assert_eq!(normalize("a\n\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\nb"), "a\nb");
    }

    #[test]
    fn newline_runs_split_by_carriage_returns_still_collapse() {
        assert_eq!(normalize("a\n\r\n\r\n\r\nb"), "a\n\nb");
    }

    #[test]
    fn rewrites_line_start_bullets() {
        assert_eq!(normalize("• one\n• two"), "- one\n- two");
        assert_eq!(normalize("intro\n  ● nested"), "intro\n  - nested");
        assert_eq!(normalize("\u{F0B7}\tsymbol"), "- symbol");
        assert_eq!(normalize("•tight"), "- tight");
    }

    #[test]
    fn unicode_indented_bullets_are_rewritten_on_the_first_pass() {
        assert_eq!(normalize("\u{a0}• item"), "- item");
        assert_eq!(normalize("intro\n\u{2003}● em"), "intro\n\u{2003}- em");
        let once = normalize("\u{a0}\u{a0}▪ nbsp");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn repairs_mojibake_bullets() {
        assert_eq!(normalize("â€¢ item"), "- item");
        assert_eq!(normalize("a â€¢ b"), "a - b");
        assert_eq!(normalize("â€¢tight"), "- tight");
    }

    #[test]
    fn leaves_inline_glyphs_and_existing_lists_alone() {
        assert_eq!(normalize("inline • bullet"), "inline • bullet");
        assert_eq!(normalize("- already\n- list"), "- already\n- list");
        assert_eq!(normalize("**bold** text"), "**bold** text");
    }

    #[test]
    fn trims_outer_whitespace() {
        assert_eq!(normalize("\n\n  Hello  \n\n"), "Hello");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn is_idempotent() {
        for s in SAMPLES {
            let once = normalize(s);
            let twice = normalize(&once);
            assert_eq!(once, twice, "not idempotent for {s:?}");
        }
    }
}
