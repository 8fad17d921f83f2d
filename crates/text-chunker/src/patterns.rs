//! Shared line patterns and byte accounting used by the classifier, splitters and packer.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    // Patterns are compile-time literals covered by the tests below.
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid built-in pattern {pattern}: {err}"))
}

/// One bracketed JSON value per line, optionally followed by a comma
pub(crate) static NDJSON_LINE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*[\{\[].*[\}\]]\s*,?\s*$"));

pub(crate) static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| compile(r"^\s*#"));

pub(crate) static PYTHON_DEFINITION: Lazy<Regex> = Lazy::new(|| compile(r"^\s*(def|class)\s"));

pub(crate) static CSTYLE_HINT: Lazy<Regex> =
    Lazy::new(|| compile(r"\bfunction\b|\bclass\b|\binterface\b|\{\s*$"));

pub(crate) static ISO_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}:\d{2}"));

pub(crate) static CLOCK_TIMESTAMP: Lazy<Regex> = Lazy::new(|| compile(r"^\s*\d{2}:\d{2}:\d{2}"));

pub(crate) static BRACKETED_DATE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*\[\d{4}-\d{2}-\d{2}"));

pub(crate) static CSTYLE_TYPE_DECL: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*(class|struct|enum|interface)\b"));

pub(crate) static CSTYLE_FUNCTION_SIGNATURE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*(public|private|protected|static|\w+\s+)*\w+\s*\([^;]*\)\s*\{?$")
});

pub(crate) static SCRIPT_DEFINITION: Lazy<Regex> =
    Lazy::new(|| compile(r"^(def|class|function)\s"));

/// Split content into its canonical line sequence.
///
/// `\r\n` and `\n` both terminate a line; a final terminator does not open an
/// extra empty line, and empty content has no lines at all.
#[must_use]
pub fn split_lines(content: &str) -> Vec<&str> {
    content.lines().collect()
}

/// Whitespace-only (or empty) line
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// UTF-8 size of `lines` joined with a single `\n`, no trailing separator
#[must_use]
pub fn joined_len<S: AsRef<str>>(lines: &[S]) -> usize {
    let text: usize = lines.iter().map(|line| line.as_ref().len()).sum();
    text + lines.len().saturating_sub(1)
}

/// `count >= ceil(total * percent / 100)` in exact integer arithmetic
#[must_use]
pub(crate) const fn meets_ratio(count: usize, total: usize, percent: u8) -> bool {
    count * 100 >= total * percent as usize
}

/// Timestamp at the start of a log entry
pub(crate) fn starts_with_timestamp(line: &str) -> bool {
    ISO_TIMESTAMP.is_match(line) || CLOCK_TIMESTAMP.is_match(line)
}

/// NDJSON shape test shared by the classifier and the JSON splitter
pub(crate) fn looks_like_ndjson<S: AsRef<str>>(non_blank: &[S], percent: u8) -> bool {
    if non_blank.is_empty() {
        return false;
    }
    let matching = non_blank
        .iter()
        .filter(|line| NDJSON_LINE.is_match(line.as_ref()))
        .count();
    meets_ratio(matching, non_blank.len(), percent)
}
