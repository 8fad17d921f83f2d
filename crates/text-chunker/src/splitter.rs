use crate::bracket::BracketScanner;
use crate::config::ChunkerConfig;
use crate::kind::Kind;
use crate::patterns::{
    is_blank, looks_like_ndjson, starts_with_timestamp, BRACKETED_DATE, CSTYLE_FUNCTION_SIGNATURE,
    CSTYLE_TYPE_DECL, MARKDOWN_HEADING, SCRIPT_DEFINITION,
};
use crate::types::Block;

/// Block boundary strategy, selected by [`Kind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitStrategy {
    /// Declarations delimited by a running `{`/`}` depth
    BraceDepth,
    /// `def`/`class`/`function` at column zero
    LinePrefix,
    /// Markdown headings
    Heading,
    /// JSON values (or one NDJSON record per line)
    Bracket,
    /// Log entries starting with a timestamp
    Timestamp,
    /// Paragraphs separated by blank lines
    Paragraph,
}

impl SplitStrategy {
    #[must_use]
    pub const fn for_kind(kind: Kind) -> Self {
        match kind {
            Kind::CStyle | Kind::Js => Self::BraceDepth,
            Kind::Python | Kind::PowerShell | Kind::Ruby => Self::LinePrefix,
            Kind::Markdown => Self::Heading,
            Kind::Json | Kind::Ndjson => Self::Bracket,
            Kind::Log => Self::Timestamp,
            Kind::Yaml | Kind::Xml | Kind::Html | Kind::Text => Self::Paragraph,
        }
    }
}

/// Accumulates lines into blocks.
///
/// A pending run made only of blank lines is never emitted on its own: it is
/// carried into the next block, or appended to the previous block at end of input.
struct BlockBuilder<'a> {
    blocks: Vec<Block<'a>>,
    start_line: usize,
    current: Vec<&'a str>,
}

impl<'a> BlockBuilder<'a> {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            start_line: 0,
            current: Vec::new(),
        }
    }

    fn push(&mut self, line_number: usize, line: &'a str) {
        if self.current.is_empty() {
            self.start_line = line_number;
        }
        self.current.push(line);
    }

    fn has_content(&self) -> bool {
        self.current.iter().any(|line| !is_blank(line))
    }

    /// Close the open block, if it holds anything besides blank lines
    fn close(&mut self) {
        if self.has_content() {
            let lines = std::mem::take(&mut self.current);
            self.blocks.push(Block::new(self.start_line, lines));
        }
    }

    fn finish(mut self) -> Vec<Block<'a>> {
        if self.current.is_empty() {
            return self.blocks;
        }

        if !self.has_content() {
            if let Some(last) = self.blocks.last_mut() {
                last.lines.append(&mut self.current);
                return self.blocks;
            }
        }

        let lines = std::mem::take(&mut self.current);
        self.blocks.push(Block::new(self.start_line, lines));
        self.blocks
    }
}

/// Splits a file's full line sequence into semantic blocks
#[derive(Debug, Clone, Default)]
pub struct BlockSplitter {
    config: ChunkerConfig,
}

impl BlockSplitter {
    #[must_use]
    pub const fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Split `lines` with the strategy for `kind`
    #[must_use]
    pub fn split<'a>(&self, kind: Kind, lines: &[&'a str]) -> Vec<Block<'a>> {
        let strategy = SplitStrategy::for_kind(kind);
        let blocks = self.split_with_strategy(strategy, lines);
        log::debug!(
            "{kind}: split {} lines into {} blocks ({strategy:?})",
            lines.len(),
            blocks.len()
        );
        blocks
    }

    /// Split `lines` with an explicit strategy
    #[must_use]
    pub fn split_with_strategy<'a>(
        &self,
        strategy: SplitStrategy,
        lines: &[&'a str],
    ) -> Vec<Block<'a>> {
        match strategy {
            SplitStrategy::BraceDepth => split_brace_depth(lines),
            SplitStrategy::LinePrefix => {
                split_on_trigger(lines, |line| SCRIPT_DEFINITION.is_match(line))
            }
            SplitStrategy::Heading => split_on_trigger(lines, |line| MARKDOWN_HEADING.is_match(line)),
            SplitStrategy::Bracket => self.split_bracketed(lines),
            SplitStrategy::Timestamp => split_on_trigger(lines, |line| {
                starts_with_timestamp(line) || BRACKETED_DATE.is_match(line)
            }),
            SplitStrategy::Paragraph => split_paragraphs(lines),
        }
    }

    fn split_bracketed<'a>(&self, lines: &[&'a str]) -> Vec<Block<'a>> {
        let records: Vec<(usize, &'a str)> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !is_blank(line))
            .map(|(idx, line)| (idx + 1, *line))
            .collect();
        let record_lines: Vec<&str> = records.iter().map(|(_, line)| *line).collect();

        if looks_like_ndjson(&record_lines, self.config.ndjson_ratio_percent) {
            return records
                .into_iter()
                .map(|(number, line)| Block::new(number, vec![line]))
                .collect();
        }

        split_json_values(lines)
    }
}

/// Open a new block whenever `is_start` matches and a block is already open
fn split_on_trigger<'a>(lines: &[&'a str], is_start: impl Fn(&str) -> bool) -> Vec<Block<'a>> {
    let mut builder = BlockBuilder::new();
    for (idx, &line) in lines.iter().enumerate() {
        if is_start(line) {
            builder.close();
        }
        builder.push(idx + 1, line);
    }
    builder.finish()
}

fn is_declaration_start(trimmed: &str) -> bool {
    CSTYLE_TYPE_DECL.is_match(trimmed) || CSTYLE_FUNCTION_SIGNATURE.is_match(trimmed)
}

fn brace_delta(line: &str) -> i64 {
    line.chars()
        .map(|ch| match ch {
            '{' => 1,
            '}' => -1,
            _ => 0,
        })
        .sum()
}

/// One block per top-level declaration.
///
/// Declaration triggers are only honoured at depth <= 0, so nested methods and
/// control-flow headers stay inside their enclosing body.
fn split_brace_depth<'a>(lines: &[&'a str]) -> Vec<Block<'a>> {
    let mut builder = BlockBuilder::new();
    let mut depth: i64 = 0;

    for (idx, &line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if depth <= 0 && is_declaration_start(trimmed) {
            builder.close();
            depth = 0;
        }

        builder.push(idx + 1, line);
        depth += brace_delta(line);

        if depth <= 0 && trimmed.contains('}') {
            builder.close();
            depth = 0;
        }
    }

    builder.finish()
}

/// Close a block whenever the string-aware bracket depth returns to zero
fn split_json_values<'a>(lines: &[&'a str]) -> Vec<Block<'a>> {
    let mut builder = BlockBuilder::new();
    let mut scanner = BracketScanner::new();
    let mut depth: i64 = 0;

    for (idx, &line) in lines.iter().enumerate() {
        builder.push(idx + 1, line);
        depth += scanner.line_delta(line);

        if depth <= 0 {
            builder.close();
            depth = 0;
        }
    }

    builder.finish()
}

/// Runs of non-blank lines; blank lines are dropped
fn split_paragraphs<'a>(lines: &[&'a str]) -> Vec<Block<'a>> {
    let mut builder = BlockBuilder::new();
    for (idx, &line) in lines.iter().enumerate() {
        if is_blank(line) {
            builder.close();
            continue;
        }
        builder.push(idx + 1, line);
    }
    builder.finish()
}
