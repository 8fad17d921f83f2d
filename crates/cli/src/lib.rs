use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use context_text_chunker::{Chunk, Chunker, ChunkerConfig, ChunkingStats, Kind};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

pub mod files;

use files::{LoadedFile, SkippedFile};

const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "context-chunk")]
#[command(about = "Split files into byte-bounded, semantically coherent chunks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML file with chunker settings (max_bytes, sample_lines, ...)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split files (or folders) into chunks of at most --max-bytes
    Split(SplitArgs),

    /// Print the detected content kind of each file
    Classify(ClassifyArgs),

    /// Concatenate files into one text, optionally with `----- name -----` headers
    Merge(MergeArgs),

    /// Save a copy of a file under a `.txt` name
    #[command(name = "to-text")]
    ToText(ToTextArgs),

    /// List the files a folder read would pick up
    Scan(ScanArgs),
}

#[derive(Args)]
struct SplitArgs {
    /// Files or folders to split
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Maximum chunk size in bytes (overrides the config file)
    #[arg(long)]
    max_bytes: Option<usize>,

    /// Write each chunk to `<name>.partNNN.txt` in this directory, mirroring subfolders
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip files larger than this when reading folders
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Output JSON
    #[arg(long, conflicts_with = "out_dir")]
    json: bool,
}

#[derive(Args)]
struct ClassifyArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MergeArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Precede each file with a `----- name -----` line
    #[arg(long)]
    headers: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ToTextArgs {
    file: PathBuf,

    /// Target directory (default: next to the source file)
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ScanArgs {
    dir: PathBuf,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

/// Split result for one input file
#[derive(Debug, Serialize)]
struct FileReport {
    name: String,
    kind: Kind,
    block_count: usize,
    stats: ChunkingStats,
    chunks: Vec<Chunk>,
}

#[derive(Serialize)]
struct ClassifyReport {
    name: String,
    kind: Kind,
}

#[derive(Serialize)]
struct ScanEntry<'a> {
    name: &'a str,
    size: u64,
}

#[derive(Serialize)]
struct ScanReport<'a> {
    files: Vec<ScanEntry<'a>>,
    skipped: &'a [SkippedFile],
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Split(args) => args.json,
        Commands::Classify(args) => args.json,
        Commands::Scan(args) => args.json,
        Commands::Merge(_) | Commands::ToText(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Split(args) => run_split(cli.config.as_deref(), args).await,
        Commands::Classify(args) => run_classify(cli.config.as_deref(), args),
        Commands::Merge(args) => run_merge(args),
        Commands::ToText(args) => run_to_text(args),
        Commands::Scan(args) => run_scan(args),
    }
}

fn load_config(path: Option<&Path>, max_bytes: Option<usize>) -> Result<ChunkerConfig> {
    let mut config = match path {
        Some(path) => ChunkerConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ChunkerConfig::default(),
    };
    if let Some(max_bytes) = max_bytes {
        config.max_bytes = max_bytes;
    }
    Ok(config)
}

fn collect_inputs(paths: &[PathBuf], max_file_size: u64) -> Result<Vec<LoadedFile>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            inputs.extend(files::read_folder(path, max_file_size)?.files);
        } else {
            inputs.push(files::read_file(path)?);
        }
    }
    Ok(inputs)
}

/// Files are independent, so each is split on the blocking pool.
async fn split_all(chunker: Arc<Chunker>, inputs: Vec<LoadedFile>) -> Result<Vec<FileReport>> {
    let mut tasks = JoinSet::new();
    for (idx, file) in inputs.into_iter().enumerate() {
        let chunker = Arc::clone(&chunker);
        tasks.spawn_blocking(move || {
            let output = chunker.split_str(&file.content, &file.name);
            let stats = chunker.get_stats(&output.chunks);
            (
                idx,
                FileReport {
                    name: file.name,
                    kind: output.kind,
                    block_count: output.block_count,
                    stats,
                    chunks: output.chunks,
                },
            )
        });
    }

    let mut reports = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        reports.push(joined.context("split task failed")?);
    }
    reports.sort_by_key(|(idx, _)| *idx);
    Ok(reports.into_iter().map(|(_, report)| report).collect())
}

/// Output names for every chunk, rejecting collisions before anything is written.
///
/// Single files are named by their bare file name, so `a/util.py` and
/// `b/util.py` passed side by side would otherwise share parts.
fn part_files(reports: &[FileReport]) -> Result<Vec<(String, &Chunk)>> {
    let mut seen = HashSet::new();
    let mut parts = Vec::new();
    for report in reports {
        if !seen.insert(report.name.as_str()) {
            anyhow::bail!(
                "more than one input is named {}; split them separately or pass their folder",
                report.name
            );
        }
        for (idx, chunk) in report.chunks.iter().enumerate() {
            parts.push((files::chunk_file_name(&report.name, idx + 1), chunk));
        }
    }
    Ok(parts)
}

async fn run_split(config_path: Option<&Path>, args: SplitArgs) -> Result<()> {
    let config = load_config(config_path, args.max_bytes)?;
    let chunker = Chunker::new(config).context("invalid chunker settings")?;
    let inputs = collect_inputs(&args.paths, args.max_file_size)?;
    let reports = split_all(Arc::new(chunker), inputs).await?;

    for report in &reports {
        log::info!("{} [{}]: {}", report.name, report.kind, report.stats);
    }

    if args.json {
        let json = serde_json::to_string_pretty(&reports)?;
        return print_stdout(&json);
    }

    if let Some(out_dir) = &args.out_dir {
        let parts = part_files(&reports)?;
        for (name, chunk) in parts {
            let path = files::write_output(out_dir, &name, &chunk.content())?;
            print_stdout(&path.display().to_string())?;
        }
        return Ok(());
    }

    for report in &reports {
        let total = report.chunks.len();
        for (idx, chunk) in report.chunks.iter().enumerate() {
            print_stdout(&format!(
                "----- {} [{}/{}] lines {}-{} ({}, {} bytes) -----",
                report.name,
                idx + 1,
                total,
                chunk.start_line,
                chunk.end_line,
                report.kind,
                chunk.byte_len()
            ))?;
            print_stdout(&chunk.content())?;
        }
    }
    Ok(())
}

fn run_classify(config_path: Option<&Path>, args: ClassifyArgs) -> Result<()> {
    let chunker = Chunker::new(load_config(config_path, None)?)?;
    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file = files::read_file(path)?;
        let kind = chunker.classify(&file.name, &file.content);
        reports.push(ClassifyReport {
            name: file.name,
            kind,
        });
    }

    if args.json {
        return print_stdout(&serde_json::to_string_pretty(&reports)?);
    }
    for report in &reports {
        print_stdout(&format!("{}\t{}", report.name, report.kind))?;
    }
    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let inputs = args
        .files
        .iter()
        .map(|path| files::read_file(path))
        .collect::<Result<Vec<_>>>()?;
    let merged = files::merge_files(&inputs, args.headers);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &merged)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("Merged {} files into {}", inputs.len(), path.display());
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(merged.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn run_to_text(args: ToTextArgs) -> Result<()> {
    let file = files::read_file(&args.file)?;
    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => args
            .file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let path = files::write_output(&out_dir, &files::text_file_name(&file.name), &file.content)?;
    print_stdout(&path.display().to_string())
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let scan = files::read_folder(&args.dir, args.max_file_size)?;

    if args.json {
        let report = ScanReport {
            files: scan
                .files
                .iter()
                .map(|file| ScanEntry {
                    name: &file.name,
                    size: file.size,
                })
                .collect(),
            skipped: &scan.skipped,
        };
        return print_stdout(&serde_json::to_string_pretty(&report)?);
    }

    for file in &scan.files {
        print_stdout(&format!("{}\t{}", file.size, file.name))?;
    }
    Ok(())
}
