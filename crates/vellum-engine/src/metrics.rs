//! Text metrics for Markdown articles.
//!
//! The count is characters of visible prose, not whitespace-separated
//! words: Markdown syntax is stripped, whitespace is removed, and every
//! remaining character counts. That keeps the numbers meaningful for
//! CJK text, where prose carries no spaces at all.

use regex::Regex;
use std::sync::LazyLock;

/// Characters read per minute. Tuned for dense prose where every
/// character counts.
const CHARS_PER_MINUTE: f64 = 400.0;

static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[.*?\]\(.*?\)").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+\s?").unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\*\*|__|[*_])").unwrap());
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*[->*+]\s+").unwrap());
static ORDERED_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMetrics {
    pub word_count: usize,
    pub read_minutes: u32,
}

/// Strips Markdown/HTML syntax and counts the remaining non-whitespace
/// characters. Fenced code blocks and image tags vanish entirely; link
/// labels survive their URLs. The strip order matters: code blocks go
/// first so their contents never match the other patterns.
pub fn word_count(markdown: &str) -> usize {
    let text = FENCED_CODE.replace_all(markdown, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = LIST_MARKER.replace_all(&text, "");
    let text = ORDERED_MARKER.replace_all(&text, "");
    let text = HTML_TAG.replace_all(&text, "");
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Estimated minutes to read `word_count` characters. Zero only for
/// empty text; any visible prose takes at least a minute.
pub fn read_minutes(word_count: usize) -> u32 {
    if word_count == 0 {
        return 0;
    }
    ((word_count as f64 / CHARS_PER_MINUTE).round() as u32).max(1)
}

pub fn compute_metrics(markdown: &str) -> TextMetrics {
    let word_count = word_count(markdown);
    TextMetrics {
        word_count,
        read_minutes: read_minutes(word_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_plain_characters_without_whitespace() {
        assert_eq!(word_count("hello world"), 10);
    }

    #[test]
    fn strips_emphasis_markers() {
        assert_eq!(word_count("**bold** plain"), 9);
        assert_eq!(word_count("__bold__ and _em_"), 9);
    }

    #[test]
    fn fenced_code_blocks_vanish() {
        let md = "Intro\n```rust\nlet x = 1;\n```\nOutro";
        assert_eq!(word_count(md), 10);
        // Text after the closing fence on the same line still counts.
        assert_eq!(word_count("```code\nhidden\n```visible"), 7);
    }

    #[test]
    fn images_vanish_but_link_labels_survive() {
        assert_eq!(word_count("![pic](a.png) see [docs](http://x)"), 7);
    }

    #[test]
    fn heading_markers_stripped() {
        assert_eq!(word_count("# Title\nbody"), 9);
    }

    #[test]
    fn list_and_quote_markers_stripped() {
        assert_eq!(word_count("- one\n- two\n1. three"), 11);
        assert_eq!(word_count("> quoted"), 6);
    }

    #[test]
    fn html_tags_stripped() {
        assert_eq!(word_count("<div>hi</div> there"), 7);
    }

    #[test]
    fn cjk_characters_count_individually() {
        // The full-width comma is prose, not whitespace.
        assert_eq!(word_count("你好，世界"), 5);
    }

    #[test]
    fn empty_text_reads_in_zero_minutes() {
        let m = compute_metrics("");
        assert_eq!((m.word_count, m.read_minutes), (0, 0));

        let blank = compute_metrics("  \n\t ");
        assert_eq!((blank.word_count, blank.read_minutes), (0, 0));
    }

    #[test]
    fn short_text_reads_in_one_minute() {
        assert_eq!(compute_metrics("hello").read_minutes, 1);
        // Under half a reading minute still rounds up to the floor.
        assert_eq!(read_minutes(100), 1);
    }

    #[test]
    fn read_time_scales_with_length() {
        let long = "a".repeat(800);
        let m = compute_metrics(&long);
        assert_eq!(m.word_count, 800);
        assert_eq!(m.read_minutes, 2);
    }
}
