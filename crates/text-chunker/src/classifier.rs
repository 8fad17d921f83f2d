use crate::config::ChunkerConfig;
use crate::kind::Kind;
use crate::patterns::{
    is_blank, looks_like_ndjson, meets_ratio, starts_with_timestamp, CSTYLE_HINT,
    MARKDOWN_HEADING, PYTHON_DEFINITION,
};

/// Leading lines of a file, as seen by content detection
struct Sample<'s, 'a> {
    lines: &'s [&'a str],
    non_empty: Vec<&'a str>,
}

impl<'s, 'a> Sample<'s, 'a> {
    fn new(lines: &'s [&'a str]) -> Self {
        let non_empty = lines.iter().copied().filter(|line| !is_blank(line)).collect();
        Self { lines, non_empty }
    }

    fn count_matching(&self, predicate: impl Fn(&str) -> bool) -> usize {
        self.lines.iter().filter(|line| predicate(**line)).count()
    }
}

type Rule = fn(&Sample<'_, '_>, &ChunkerConfig) -> bool;

/// Content rules in priority order; the first match wins
const CONTENT_RULES: &[(Rule, Kind)] = &[
    (is_ndjson, Kind::Ndjson),
    (is_json, Kind::Json),
    (is_markdown, Kind::Markdown),
    (is_python, Kind::Python),
    (is_cstyle, Kind::CStyle),
    (is_log, Kind::Log),
];

fn is_ndjson(sample: &Sample<'_, '_>, config: &ChunkerConfig) -> bool {
    looks_like_ndjson(&sample.non_empty, config.ndjson_ratio_percent)
}

fn is_json(sample: &Sample<'_, '_>, _: &ChunkerConfig) -> bool {
    sample
        .non_empty
        .first()
        .map(|line| line.trim_start())
        .is_some_and(|line| line.starts_with('{') || line.starts_with('['))
}

fn is_markdown(sample: &Sample<'_, '_>, _: &ChunkerConfig) -> bool {
    sample.count_matching(|line| MARKDOWN_HEADING.is_match(line)) >= 3
}

fn is_python(sample: &Sample<'_, '_>, _: &ChunkerConfig) -> bool {
    sample.count_matching(|line| PYTHON_DEFINITION.is_match(line)) >= 2
}

fn is_cstyle(sample: &Sample<'_, '_>, _: &ChunkerConfig) -> bool {
    sample.count_matching(|line| CSTYLE_HINT.is_match(line)) >= 2
}

fn is_log(sample: &Sample<'_, '_>, config: &ChunkerConfig) -> bool {
    let stamped = sample.count_matching(starts_with_timestamp);
    meets_ratio(stamped, sample.lines.len(), config.log_ratio_percent)
}

/// Maps a file name and its lines to a [`Kind`]
#[derive(Debug, Clone, Default)]
pub struct KindClassifier {
    config: ChunkerConfig,
}

impl KindClassifier {
    #[must_use]
    pub const fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Classify by extension, falling back to content detection on the sample
    #[must_use]
    pub fn classify(&self, file_name: &str, lines: &[&str]) -> Kind {
        if let Some(kind) = Kind::from_path(file_name) {
            log::debug!("{file_name}: classified as {kind} by extension");
            return kind;
        }

        let kind = self.detect(lines);
        log::debug!("{file_name}: classified as {kind} by content");
        kind
    }

    /// Content detection only, ignoring any extension
    #[must_use]
    pub fn detect(&self, lines: &[&str]) -> Kind {
        let sample_len = lines.len().min(self.config.sample_lines);
        let sample = Sample::new(&lines[..sample_len]);

        if sample.non_empty.is_empty() {
            return Kind::Text;
        }

        CONTENT_RULES
            .iter()
            .find(|(rule, _)| rule(&sample, &self.config))
            .map_or(Kind::Text, |(_, kind)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::split_lines;

    fn classify(name: &str, content: &str) -> Kind {
        KindClassifier::default().classify(name, &split_lines(content))
    }

    #[test]
    fn extension_wins_over_content() {
        assert_eq!(classify("data.md", "{\"a\":1}\n{\"b\":2}"), Kind::Markdown);
        assert_eq!(classify("Build.PS1", "def x\n"), Kind::PowerShell);
        assert_eq!(classify("app.jsx", ""), Kind::Js);
    }

    #[test]
    fn empty_or_blank_content_is_text() {
        assert_eq!(classify("notes.txt", ""), Kind::Text);
        assert_eq!(classify("notes.txt", "  \n\t\n"), Kind::Text);
    }

    #[test]
    fn detects_ndjson() {
        assert_eq!(classify("dump.txt", "{\"a\":1}\n{\"b\":2}\n{\"c\":3}"), Kind::Ndjson);
    }

    #[test]
    fn detects_json_when_records_span_lines() {
        let content = "{\n  \"name\": \"x\",\n  \"tags\": [1, 2]\n}";
        assert_eq!(classify("payload.txt", content), Kind::Json);
    }

    #[test]
    fn detects_markdown() {
        let content = "# Title\ntext\n## Part\nmore\n### Deep\n";
        assert_eq!(classify("README", content), Kind::Markdown);
    }

    #[test]
    fn detects_python() {
        let content = "import os\n\ndef main():\n    pass\n\nclass Thing:\n    pass\n";
        assert_eq!(classify("script.txt", content), Kind::Python);
    }

    #[test]
    fn detects_cstyle() {
        let content = "function a() {\n  return 1;\n}\nfunction b() {\n  return 2;\n}\n";
        assert_eq!(classify("lib.rs", content), Kind::CStyle);
    }

    #[test]
    fn detects_cstyle_from_trailing_open_braces() {
        let content = "if ready {\n  go();\n}\nwhile busy {\n  wait();\n}\n";
        assert_eq!(classify("snippet.txt", content), Kind::CStyle);

        let single = "if ready {\n  go();\n}\n";
        assert_eq!(classify("snippet.txt", single), Kind::Text);
    }

    #[test]
    fn detects_log_with_blank_lines_in_denominator() {
        let content = "2024-01-01 10:00:00 start\n  detail\n10:00:05 tick\n\n\n";
        // 2 of 5 sampled lines are stamped; ceil(0.3 * 5) = 2
        assert_eq!(classify("service.out", content), Kind::Log);

        let sparse = "2024-01-01 10:00:00 start\na\nb\nc\nd\ne\nf\n";
        assert_eq!(classify("service.out", sparse), Kind::Text);
    }

    #[test]
    fn priority_order_is_preserved() {
        // Both markdown and python signals present: markdown is checked first.
        let content = "# a\n# b\n# c\ndef x():\ndef y():\n";
        assert_eq!(classify("mixed.txt", content), Kind::Markdown);
    }

    #[test]
    fn plain_prose_is_text() {
        assert_eq!(classify("letter.txt", "Dear team,\n\nThanks.\n"), Kind::Text);
    }

    #[test]
    fn only_sample_lines_are_inspected() {
        let config = ChunkerConfig {
            sample_lines: 2,
            ..Default::default()
        };
        let classifier = KindClassifier::new(config);
        let lines = split_lines("plain\nwords\n# a\n# b\n# c");
        assert_eq!(classifier.detect(&lines), Kind::Text);
    }

    #[test]
    fn classification_is_deterministic() {
        let content = "2024-01-01 10:00:00 a\n2024-01-01 10:00:01 b\n";
        let first = classify("x.out", content);
        for _ in 0..5 {
            assert_eq!(classify("x.out", content), first);
        }
    }
}
