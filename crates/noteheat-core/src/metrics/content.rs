//! Content normalization and per-document metrics.

use once_cell::sync::Lazy;
use regex::Regex;

use super::TrackingMode;

/// Leading `---` ... `---` block, only at the very start of the text.
static FRONTMATTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\r?\n(?:.*?\r?\n)?---(?:\r?\n|\z)").expect("frontmatter pattern")
});

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("code fence pattern"));

/// `- [x]` at the start of a line, after optional indentation.
static COMPLETED_TASK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*- \[x\]").expect("task pattern"));

/// Drop a leading frontmatter block and every fenced code block.
pub fn normalize(text: &str) -> String {
    let body = match FRONTMATTER.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    CODE_FENCE.replace_all(body, "").into_owned()
}

/// Whitespace-separated tokens.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

/// Lines carrying a completed checklist marker.
pub fn count_completed_tasks(text: &str) -> u64 {
    COMPLETED_TASK.find_iter(text).count() as u64
}

/// Normalize `text`, then measure it according to `mode`.
pub fn measure(text: &str, mode: TrackingMode) -> u64 {
    let normalized = normalize(text);
    match mode {
        TrackingMode::Words => count_words(&normalized),
        TrackingMode::Tasks => count_completed_tasks(&normalized),
    }
}
