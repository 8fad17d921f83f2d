use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::kind::Kind;
use crate::types::{Block, Chunk};

/// Lines of the chunk being assembled, with their source line numbers
struct PendingChunk<'a> {
    lines: Vec<(usize, &'a str)>,
    bytes: usize,
}

impl<'a> PendingChunk<'a> {
    const fn new() -> Self {
        Self {
            lines: Vec::new(),
            bytes: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Size of the chunk if `block_bytes` were appended after a `\n` separator
    fn bytes_with(&self, block_bytes: usize) -> usize {
        if self.is_empty() {
            block_bytes
        } else {
            self.bytes + 1 + block_bytes
        }
    }

    fn append_block(&mut self, block: &Block<'a>) {
        self.bytes = self.bytes_with(block.byte_len());
        self.lines.extend(numbered(block));
    }

    fn flush_into(&mut self, kind: Kind, chunks: &mut Vec<Chunk>) {
        if !self.is_empty() {
            chunks.push(Chunk::from_numbered(kind, std::mem::take(&mut self.lines)));
        }
        self.bytes = 0;
    }
}

fn numbered<'a, 'b>(block: &'b Block<'a>) -> impl Iterator<Item = (usize, &'a str)> + 'b {
    block
        .lines
        .iter()
        .enumerate()
        .map(|(offset, &line)| (block.start_line + offset, line))
}

/// Greedy first-fit packer of blocks into byte-bounded chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePacker {
    max_bytes: usize,
}

impl SizePacker {
    /// Create a packer; `max_bytes` must be positive
    pub fn new(max_bytes: usize) -> Result<Self> {
        if max_bytes == 0 {
            return Err(ChunkerError::InvalidMaxBytes(max_bytes));
        }
        Ok(Self { max_bytes })
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Pack `blocks` left to right, preserving line order
    #[must_use]
    pub fn pack(&self, kind: Kind, blocks: &[Block<'_>]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut pending = PendingChunk::new();

        for block in blocks {
            let block_bytes = block.byte_len();

            if block_bytes > self.max_bytes {
                pending.flush_into(kind, &mut chunks);
                self.pack_lines(kind, block, &mut chunks);
            } else if pending.bytes_with(block_bytes) <= self.max_bytes {
                pending.append_block(block);
            } else {
                pending.flush_into(kind, &mut chunks);
                pending.append_block(block);
            }
        }

        pending.flush_into(kind, &mut chunks);
        chunks
    }

    /// Line-granularity fallback for a block that alone exceeds the budget
    fn pack_lines(&self, kind: Kind, block: &Block<'_>, chunks: &mut Vec<Chunk>) {
        let mut pending = PendingChunk::new();

        for (number, line) in numbered(block) {
            // Each line costs its own bytes plus one newline.
            let line_bytes = line.len() + 1;
            if !pending.is_empty() && pending.bytes + line_bytes > self.max_bytes {
                pending.flush_into(kind, chunks);
            }
            if line.len() > self.max_bytes {
                log::warn!(
                    "line {number} is {} bytes, over the {} byte budget; emitting it alone",
                    line.len(),
                    self.max_bytes
                );
            }
            pending.lines.push((number, line));
            pending.bytes += line_bytes;
        }

        pending.flush_into(kind, chunks);
    }
}

impl Default for SizePacker {
    fn default() -> Self {
        Self {
            max_bytes: ChunkerConfig::default().max_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(chunks: &[Chunk]) -> Vec<String> {
        chunks.iter().map(Chunk::content).collect()
    }

    #[test]
    fn rejects_zero_budget() {
        assert!(matches!(
            SizePacker::new(0),
            Err(ChunkerError::InvalidMaxBytes(0))
        ));
    }

    #[test]
    fn merges_small_blocks_into_one_chunk() {
        let blocks = vec![Block::new(1, vec!["# A", "x", "y"]), Block::new(4, vec!["# B", "z"])];
        let chunks = SizePacker::new(1000).unwrap().pack(Kind::Markdown, &blocks);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content(), "# A\nx\ny\n# B\nz");
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 5);
    }

    #[test]
    fn separator_between_blocks_counts_toward_budget() {
        // 3 + 1 + 3 = 7 bytes when joined
        let blocks = vec![Block::new(1, vec!["aaa"]), Block::new(2, vec!["bbb"])];
        assert_eq!(SizePacker::new(7).unwrap().pack(Kind::Text, &blocks).len(), 1);
        assert_eq!(SizePacker::new(6).unwrap().pack(Kind::Text, &blocks).len(), 2);
    }

    #[test]
    fn oversized_block_degrades_to_lines() {
        let line = "x".repeat(50);
        let block = Block::new(1, vec![line.as_str(), line.as_str(), line.as_str()]);
        assert_eq!(block.byte_len(), 152);

        let chunks = SizePacker::new(120).unwrap().pack(Kind::Text, &[block]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].line_count(), 2);
        assert_eq!(chunks[0].byte_len(), 101);
        assert_eq!(chunks[1].line_count(), 1);
        assert_eq!((chunks[1].start_line, chunks[1].end_line), (3, 3));
    }

    #[test]
    fn oversized_single_line_is_emitted_alone() {
        let long = "y".repeat(30);
        let block = Block::new(1, vec!["a", long.as_str(), "b"]);
        let chunks = SizePacker::new(10).unwrap().pack(Kind::Log, &[block]);
        assert_eq!(texts(&chunks), vec!["a".to_string(), long.clone(), "b".to_string()]);
        assert!(chunks[1].is_oversized_line(10));
    }

    #[test]
    fn degraded_region_is_not_merged_with_neighbours() {
        let big = "z".repeat(20);
        let blocks = vec![
            Block::new(1, vec!["a"]),
            Block::new(2, vec![big.as_str(), "c"]),
            Block::new(4, vec!["d"]),
        ];
        let chunks = SizePacker::new(21).unwrap().pack(Kind::Text, &blocks);
        assert_eq!(
            texts(&chunks),
            vec!["a".to_string(), big.clone(), "c".to_string(), "d".to_string()]
        );
    }

    #[test]
    fn flushes_when_next_block_does_not_fit() {
        let blocks = vec![
            Block::new(1, vec!["12345"]),
            Block::new(2, vec!["67890"]),
            Block::new(3, vec!["abc"]),
        ];
        let chunks = SizePacker::new(10).unwrap().pack(Kind::Text, &blocks);
        assert_eq!(texts(&chunks), vec!["12345", "67890\nabc"]);
    }

    #[test]
    fn no_blocks_no_chunks() {
        assert!(SizePacker::new(1).unwrap().pack(Kind::Text, &[]).is_empty());
    }

    #[test]
    fn multibyte_lines_are_measured_in_utf8_bytes() {
        // "привет" is 12 bytes in UTF-8
        let blocks = vec![Block::new(1, vec!["привет"]), Block::new(2, vec!["мир"])];
        let chunks = SizePacker::new(12).unwrap().pack(Kind::Text, &blocks);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|chunk| chunk.byte_len() <= 12));
    }
}
