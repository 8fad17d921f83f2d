use crate::kind::Kind;
use crate::patterns::joined_len;
use serde::{Deserialize, Serialize};

/// A named text payload handed to the chunker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name; only its extension is consulted
    pub name: String,

    /// Full text content, any line-ending convention
    pub content: String,
}

impl SourceFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// A contiguous run of source lines forming one semantic unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Line number of the first line (1-indexed)
    pub start_line: usize,

    /// The lines, borrowed from the source content
    pub lines: Vec<&'a str>,
}

impl<'a> Block<'a> {
    #[must_use]
    pub const fn new(start_line: usize, lines: Vec<&'a str>) -> Self {
        Self { start_line, lines }
    }

    /// Line number of the last line (1-indexed, inclusive)
    #[must_use]
    pub fn end_line(&self) -> usize {
        self.start_line + self.lines.len().saturating_sub(1)
    }

    /// UTF-8 size of the block's lines joined with `\n`
    #[must_use]
    pub fn byte_len(&self) -> usize {
        joined_len(&self.lines)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// A byte-bounded output unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Kind of the file this chunk came from
    pub kind: Kind,

    /// First source line (1-indexed)
    pub start_line: usize,

    /// Last source line (1-indexed, inclusive)
    pub end_line: usize,

    /// The chunk's lines, in source order
    pub lines: Vec<String>,
}

impl Chunk {
    /// Build a chunk from an ordered run of numbered lines
    pub(crate) fn from_numbered(kind: Kind, lines: Vec<(usize, &str)>) -> Self {
        let start_line = lines.first().map_or(0, |(number, _)| *number);
        let end_line = lines.last().map_or(0, |(number, _)| *number);
        Self {
            kind,
            start_line,
            end_line,
            lines: lines.into_iter().map(|(_, line)| line.to_string()).collect(),
        }
    }

    /// Materialized text: lines joined with `\n`
    #[must_use]
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// UTF-8 size of [`Chunk::content`]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        joined_len(&self.lines)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if chunk spans a specific source line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// A single line that on its own exceeds `max_bytes`
    #[must_use]
    pub fn is_oversized_line(&self, max_bytes: usize) -> bool {
        self.lines.len() == 1 && self.byte_len() > max_bytes
    }
}
