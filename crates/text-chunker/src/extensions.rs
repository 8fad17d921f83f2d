use std::path::Path;

/// Extensions (lowercase, without the dot) accepted for splitting
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "c", "cpp", "cc", "cxx", "h", "hpp", "cs", "py", "pyw", "js", "jsx", "ts", "tsx", "java",
    "go", "rs", "php", "rb", "swift", "kt", "kts", "html", "htm", "css", "scss", "sass", "xml",
    "json", "jsonl", "ndjson", "yaml", "yml", "sql", "sh", "bash", "zsh", "bat", "cmd", "ps1",
    "psm1", "psd1", "md", "txt", "log",
];

/// Case-insensitive allow-list check on a file name or path
#[must_use]
pub fn is_supported_extension(file_name: impl AsRef<Path>) -> bool {
    file_name
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
}
