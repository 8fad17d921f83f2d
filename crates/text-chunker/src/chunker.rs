use crate::classifier::KindClassifier;
use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::kind::Kind;
use crate::packer::SizePacker;
use crate::patterns::split_lines;
use crate::splitter::BlockSplitter;
use crate::types::{Chunk, SourceFile};
use serde::{Deserialize, Serialize};

/// Result of splitting one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOutput {
    /// Kind the file was classified as
    pub kind: Kind,

    /// Number of semantic blocks before packing
    pub block_count: usize,

    /// Byte-bounded chunks, in source order
    pub chunks: Vec<Chunk>,
}

/// Main chunker interface: classify, split into blocks, pack into chunks
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    classifier: KindClassifier,
    splitter: BlockSplitter,
    packer: SizePacker,
}

impl Chunker {
    /// Create a new chunker, rejecting invalid configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        let packer = SizePacker::new(config.max_bytes)?;
        Ok(Self {
            classifier: KindClassifier::new(config.clone()),
            splitter: BlockSplitter::new(config.clone()),
            packer,
            config,
        })
    }

    /// Classify content without splitting it
    #[must_use]
    pub fn classify(&self, file_name: &str, content: &str) -> Kind {
        self.classifier.classify(file_name, &split_lines(content))
    }

    /// Split text content; `file_name` is only used for its extension
    #[must_use]
    pub fn split_str(&self, content: &str, file_name: &str) -> SplitOutput {
        let lines = split_lines(content);
        let kind = self.classifier.classify(file_name, &lines);
        let blocks = self.splitter.split(kind, &lines);
        let chunks = self.packer.pack(kind, &blocks);

        log::debug!(
            "{file_name}: {} lines -> {} blocks -> {} chunks (max {} bytes)",
            lines.len(),
            blocks.len(),
            chunks.len(),
            self.config.max_bytes
        );

        SplitOutput {
            kind,
            block_count: blocks.len(),
            chunks,
        }
    }

    /// Split a named source file
    #[must_use]
    pub fn split_file(&self, file: &SourceFile) -> SplitOutput {
        self.split_str(&file.content, &file.name)
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(&self, chunks: &[Chunk]) -> ChunkingStats {
        let sizes = || chunks.iter().map(Chunk::byte_len);
        let total_bytes: usize = sizes().sum();

        ChunkingStats {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(Chunk::line_count).sum(),
            total_bytes,
            avg_bytes_per_chunk: if chunks.is_empty() {
                0
            } else {
                total_bytes / chunks.len()
            },
            min_bytes: sizes().min().unwrap_or(0),
            max_bytes: sizes().max().unwrap_or(0),
            oversized_chunks: chunks
                .iter()
                .filter(|chunk| chunk.is_oversized_line(self.config.max_bytes))
                .count(),
        }
    }
}

/// Split `content` into chunks of at most `max_bytes`, using default heuristics
pub fn split_text(file_name: &str, content: &str, max_bytes: usize) -> Result<Vec<Chunk>> {
    let config = ChunkerConfig::default().with_max_bytes(max_bytes);
    let chunker = Chunker::new(config)?;
    Ok(chunker.split_str(content, file_name).chunks)
}

/// Statistics about chunking results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub total_bytes: usize,
    pub avg_bytes_per_chunk: usize,
    pub min_bytes: usize,
    pub max_bytes: usize,
    /// Single-line chunks that exceed the budget on their own
    pub oversized_chunks: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Bytes: {} | Avg: {} | Range: {}-{} | Oversized: {}",
            self.total_chunks,
            self.total_lines,
            self.total_bytes,
            self.avg_bytes_per_chunk,
            self.min_bytes,
            self.max_bytes,
            self.oversized_chunks
        )
    }
}

impl Default for Chunker {
    fn default() -> Self {
        let config = ChunkerConfig::default();
        Self {
            classifier: KindClassifier::new(config.clone()),
            splitter: BlockSplitter::new(config.clone()),
            packer: SizePacker::default(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChunkerError;
    use pretty_assertions::assert_eq;

    const MARKDOWN: &str = "# Title\nintro\nmore intro\n## Section\nbody";

    #[test]
    fn test_split_str_markdown() {
        let chunker = Chunker::new(ChunkerConfig::default().with_max_bytes(1000)).unwrap();
        let output = chunker.split_str(MARKDOWN, "notes.md");
        assert_eq!(output.kind, Kind::Markdown);
        assert_eq!(output.block_count, 2);
        assert_eq!(output.chunks.len(), 1);
        assert_eq!(output.chunks[0].content(), MARKDOWN);
    }

    #[test]
    fn test_split_empty_content() {
        let chunker = Chunker::default();
        let output = chunker.split_str("", "empty.txt");
        assert_eq!(output.block_count, 0);
        assert!(output.chunks.is_empty());
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let result = Chunker::new(ChunkerConfig::default().with_max_bytes(0));
        assert!(matches!(result, Err(ChunkerError::InvalidMaxBytes(0))));

        let result = split_text("a.txt", "hello", 0);
        assert!(result.unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_split_file_uses_name_for_kind() {
        let chunker = Chunker::default();
        let file = SourceFile::new("main.py", "def a():\n    pass\ndef b():\n    pass\n");
        let output = chunker.split_file(&file);
        assert_eq!(output.kind, Kind::Python);
        assert_eq!(output.block_count, 2);
    }

    #[test]
    fn test_classify() {
        let chunker = Chunker::default();
        assert_eq!(chunker.classify("x.unknown", "{\"a\":1}\n{\"b\":2}"), Kind::Ndjson);
        assert_eq!(chunker.classify("x.yml", "a: 1"), Kind::Yaml);
    }

    #[test]
    fn test_chunking_stats() {
        let chunker = Chunker::new(ChunkerConfig::default().with_max_bytes(8)).unwrap();
        let output = chunker.split_str("aaaa\n\nbbbb\n\n0123456789ab", "plain.txt");
        let stats = chunker.get_stats(&output.chunks);

        assert_eq!(stats.total_chunks, 3);
        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.total_bytes, 20);
        assert_eq!(stats.min_bytes, 4);
        assert_eq!(stats.max_bytes, 12);
        assert_eq!(stats.oversized_chunks, 1);
        assert!(stats.to_string().contains("Chunks: 3"));
    }

    #[test]
    fn test_stats_for_no_chunks() {
        let stats = Chunker::default().get_stats(&[]);
        assert_eq!(stats.total_chunks, 0);
        assert_eq!(stats.avg_bytes_per_chunk, 0);
        assert_eq!(stats.min_bytes, 0);
    }
}
