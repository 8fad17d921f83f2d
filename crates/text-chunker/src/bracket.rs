/// Scanner state for quote/escape-aware bracket counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanState {
    #[default]
    Code,
    InString,
    /// Next character inside a string is taken literally
    EscapeInString,
    /// Next character outside a string is taken literally
    EscapeInCode,
}

/// Counts net `{`/`[` minus `}`/`]` over a line, ignoring brackets inside
/// double-quoted strings.
///
/// The scanner is a two-flag machine (`inside string`, `escape next`) encoded as
/// explicit states so that escape-of-escape and brackets inside strings take a
/// single well-defined transition each.
#[derive(Debug, Default)]
pub(crate) struct BracketScanner {
    state: ScanState,
}

impl BracketScanner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Net bracket delta of `line`. The scanner resets at the start of every line.
    pub(crate) fn line_delta(&mut self, line: &str) -> i64 {
        self.state = ScanState::Code;
        line.chars().map(|ch| self.step(ch)).sum()
    }

    fn step(&mut self, ch: char) -> i64 {
        let (next, delta) = match (self.state, ch) {
            (ScanState::EscapeInString, _) => (ScanState::InString, 0),
            (ScanState::EscapeInCode, _) => (ScanState::Code, 0),
            (ScanState::InString, '\\') => (ScanState::EscapeInString, 0),
            (ScanState::InString, '"') => (ScanState::Code, 0),
            (ScanState::InString, _) => (ScanState::InString, 0),
            (ScanState::Code, '\\') => (ScanState::EscapeInCode, 0),
            (ScanState::Code, '"') => (ScanState::InString, 0),
            (ScanState::Code, '{' | '[') => (ScanState::Code, 1),
            (ScanState::Code, '}' | ']') => (ScanState::Code, -1),
            (ScanState::Code, _) => (ScanState::Code, 0),
        };
        self.state = next;
        delta
    }

    #[cfg(test)]
    fn in_string(&self) -> bool {
        matches!(self.state, ScanState::InString | ScanState::EscapeInString)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(line: &str) -> i64 {
        BracketScanner::new().line_delta(line)
    }

    #[test]
    fn counts_plain_brackets() {
        assert_eq!(delta("{"), 1);
        assert_eq!(delta(r#"{"a": [1, 2"#), 2);
        assert_eq!(delta("]}"), -2);
        assert_eq!(delta("{}"), 0);
    }

    #[test]
    fn ignores_brackets_inside_strings() {
        assert_eq!(delta(r#"{"text": "{[}"}"#), 0);
        assert_eq!(delta(r#""]]]""#), 0);
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        assert_eq!(delta(r#"{"q": "say \"{\" please"}"#), 0);
        assert_eq!(delta(r#""\"{""#), 0);
    }

    #[test]
    fn escaped_backslash_ends_escape() {
        // "\\" is a complete string, so the brace after it counts
        assert_eq!(delta(r#"{"path": "C:\\"}"#), 0);
        assert_eq!(delta(r#""\\" {"#), 1);
    }

    #[test]
    fn escape_outside_string_suppresses_next_char() {
        assert_eq!(delta(r"\{"), 0);
        assert_eq!(delta(r"\\{"), 1);
    }

    #[test]
    fn state_resets_between_lines() {
        let mut scanner = BracketScanner::new();
        assert_eq!(scanner.line_delta(r#""unterminated {"#), 0);
        assert!(scanner.in_string());
        assert_eq!(scanner.line_delta("{"), 1);
        assert!(!scanner.in_string());
    }
}
