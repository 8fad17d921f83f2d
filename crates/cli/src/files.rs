use anyhow::{Context, Result};
use context_text_chunker::{is_supported_extension, ChunkerError};
use ignore::WalkBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// A file read into memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedFile {
    /// Path relative to the scanned root (or the file name for single files)
    pub name: String,
    pub size: u64,
    pub content: String,
}

/// Why a file was left out of a folder scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooLarge,
    UnsupportedExtension,
    NotUtf8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Default, Serialize)]
pub struct FolderScan {
    pub files: Vec<LoadedFile>,
    pub skipped: Vec<SkippedFile>,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Read a single file, rejecting extensions outside the allow-list
pub fn read_file(path: &Path) -> Result<LoadedFile> {
    let name = display_name(path);
    if !is_supported_extension(&name) {
        return Err(ChunkerError::unsupported_extension(name).into());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(LoadedFile {
        name,
        size: content.len() as u64,
        content,
    })
}

/// Recursively read a folder.
///
/// Entries whose name starts with `.` are skipped together with everything below
/// them, as are files over `max_file_size` bytes, unsupported extensions and
/// files that are not valid UTF-8.
pub fn read_folder(root: &Path, max_file_size: u64) -> Result<FolderScan> {
    if !root.is_dir() {
        anyhow::bail!("not a directory: {}", root.display());
    }

    let mut scan = FolderScan::default();
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let walk_root = root.to_path_buf();
    builder.filter_entry(move |entry| {
        entry.path() == walk_root || !is_hidden_name(&entry.file_name().to_string_lossy())
    });

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Failed to read entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let name = relative_name(root, path);

        if !is_supported_extension(path) {
            scan.skip(name, SkipReason::UnsupportedExtension);
            continue;
        }

        let size = entry
            .metadata()
            .map(|meta| meta.len())
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if size > max_file_size {
            log::debug!("Skipping large file {name} ({size} bytes > {max_file_size})");
            scan.skip(name, SkipReason::TooLarge);
            continue;
        }

        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        match String::from_utf8(bytes) {
            Ok(content) => scan.files.push(LoadedFile {
                name,
                size,
                content,
            }),
            Err(_) => scan.skip(name, SkipReason::NotUtf8),
        }
    }

    log::info!(
        "Read {} files from {} ({} skipped)",
        scan.files.len(),
        root.display(),
        scan.skipped.len()
    );
    Ok(scan)
}

impl FolderScan {
    fn skip(&mut self, name: String, reason: SkipReason) {
        log::debug!("Skipping {name}: {reason:?}");
        self.skipped.push(SkippedFile { name, reason });
    }
}

fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Concatenate files, each followed by a newline and optionally preceded by a
/// `----- name -----` header line
#[must_use]
pub fn merge_files(files: &[LoadedFile], headers: bool) -> String {
    let mut out = String::new();
    for file in files {
        if headers {
            let _ = writeln!(out, "----- {} -----", file.name);
        }
        out.push_str(&file.content);
        out.push('\n');
    }
    out
}

/// Name used by "convert to text": the original stem with a `.txt` extension
#[must_use]
pub fn text_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    format!("{stem}.txt")
}

/// Output name of the n-th (1-based) chunk of `file_name`.
///
/// The full relative name is kept, extension and subfolders included, so
/// `a/util.py` and `b/util.py` (or `app.py` and `app.md`) map to distinct parts.
#[must_use]
pub fn chunk_file_name(file_name: &str, index: usize) -> String {
    format!("{file_name}.part{index:03}.txt")
}

/// Write `content` to `dir/name`, creating missing parent directories
pub fn write_output(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let parent = path.parent().unwrap_or(dir);
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
