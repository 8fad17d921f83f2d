//! # Context Text Chunker
//!
//! Heuristic, byte-bounded chunking of source files and text for pasting into
//! size-limited consumers such as a model context window.
//!
//! ## Philosophy
//!
//! Chunks should stay semantically coherent:
//! - Do not cut a function, JSON value or log entry in half when avoidable
//! - Never reorder or duplicate lines
//! - Degrade to line granularity only for blocks that cannot fit on their own
//!
//! No parsing happens here: every decision is a line-level heuristic.
//!
//! ## Architecture
//!
//! ```text
//! name + content
//!     │
//!     ├──> KindClassifier (extension table, then ordered content rules)
//!     │
//!     ├──> BlockSplitter (strategy chosen by Kind)
//!     │    ├─> BraceDepth   cstyle, js
//!     │    ├─> LinePrefix   python, powershell, ruby
//!     │    ├─> Heading      markdown
//!     │    ├─> Bracket      json, ndjson
//!     │    ├─> Timestamp    log
//!     │    └─> Paragraph    everything else
//!     │
//!     └──> SizePacker (greedy first-fit under max_bytes)
//!          └─> Chunk[] with source line ranges
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_text_chunker::{Chunker, ChunkerConfig, Kind};
//!
//! let config = ChunkerConfig::default().with_max_bytes(1000);
//! let chunker = Chunker::new(config).unwrap();
//!
//! let output = chunker.split_str("{\"a\":1}\n{\"b\":2}\n{\"c\":3}", "events.dump");
//! assert_eq!(output.kind, Kind::Ndjson);
//! assert_eq!(output.block_count, 3);
//! for chunk in &output.chunks {
//!     println!("lines {}-{}: {} bytes", chunk.start_line, chunk.end_line, chunk.byte_len());
//! }
//! ```

mod bracket;
mod chunker;
mod classifier;
mod config;
mod error;
mod extensions;
mod kind;
mod packer;
mod patterns;
mod splitter;
mod types;

pub use chunker::{split_text, Chunker, ChunkingStats, SplitOutput};
pub use classifier::KindClassifier;
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use extensions::{is_supported_extension, SUPPORTED_EXTENSIONS};
pub use kind::Kind;
pub use packer::SizePacker;
pub use patterns::{is_blank, joined_len, split_lines};
pub use splitter::{BlockSplitter, SplitStrategy};
pub use types::{Block, Chunk, SourceFile};
