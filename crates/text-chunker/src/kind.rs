use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Coarse content family of a file, driving which splitting strategy applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    PowerShell,
    Python,
    Js,
    Json,
    Ndjson,
    CStyle,
    Ruby,
    Markdown,
    Log,
    Yaml,
    Xml,
    Html,
    Text,
}

impl Kind {
    /// All kinds, in declaration order
    pub const ALL: [Kind; 13] = [
        Kind::PowerShell,
        Kind::Python,
        Kind::Js,
        Kind::Json,
        Kind::Ndjson,
        Kind::CStyle,
        Kind::Ruby,
        Kind::Markdown,
        Kind::Log,
        Kind::Yaml,
        Kind::Xml,
        Kind::Html,
        Kind::Text,
    ];

    /// Look up a kind by extension (without the dot, any case).
    ///
    /// Returns `None` for extensions that must be resolved by content detection.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let kind = match ext.to_ascii_lowercase().as_str() {
            "ps1" => Kind::PowerShell,
            "py" | "pyw" => Kind::Python,
            "js" | "jsx" | "ts" | "tsx" => Kind::Js,
            "json" => Kind::Json,
            "jsonl" | "ndjson" => Kind::Ndjson,
            "cs" | "java" | "cpp" | "c" | "h" | "go" => Kind::CStyle,
            "rb" => Kind::Ruby,
            "md" => Kind::Markdown,
            "log" => Kind::Log,
            "yaml" | "yml" => Kind::Yaml,
            "xml" => Kind::Xml,
            "html" | "htm" => Kind::Html,
            _ => return None,
        };
        Some(kind)
    }

    /// Look up a kind from a file name or path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get kind name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::PowerShell => "powershell",
            Kind::Python => "python",
            Kind::Js => "js",
            Kind::Json => "json",
            Kind::Ndjson => "ndjson",
            Kind::CStyle => "cstyle",
            Kind::Ruby => "ruby",
            Kind::Markdown => "markdown",
            Kind::Log => "log",
            Kind::Yaml => "yaml",
            Kind::Xml => "xml",
            Kind::Html => "html",
            Kind::Text => "text",
        }
    }

    /// Whether splitting this kind may drop whitespace-only lines.
    ///
    /// An upper bound, not an exact answer: `Json` only drops them when its
    /// records sit one per line; multi-line documents keep every line.
    #[must_use]
    pub const fn may_drop_blank_lines(self) -> bool {
        !matches!(
            self,
            Kind::PowerShell
                | Kind::Python
                | Kind::Ruby
                | Kind::Js
                | Kind::CStyle
                | Kind::Markdown
                | Kind::Log
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Kind::from_extension("ps1"), Some(Kind::PowerShell));
        assert_eq!(Kind::from_extension("PY"), Some(Kind::Python));
        assert_eq!(Kind::from_extension("tsx"), Some(Kind::Js));
        assert_eq!(Kind::from_extension("ndjson"), Some(Kind::Ndjson));
        assert_eq!(Kind::from_extension("Go"), Some(Kind::CStyle));
        assert_eq!(Kind::from_extension("htm"), Some(Kind::Html));
        assert_eq!(Kind::from_extension("txt"), None);
        assert_eq!(Kind::from_extension("rs"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Kind::from_path("notes/README.md"), Some(Kind::Markdown));
        assert_eq!(Kind::from_path("server.LOG"), Some(Kind::Log));
        assert_eq!(Kind::from_path("Makefile"), None);
        assert_eq!(Kind::from_path("archive.tar.yml"), Some(Kind::Yaml));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        for kind in Kind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_blank_dropping_kinds() {
        assert!(Kind::Text.may_drop_blank_lines());
        assert!(Kind::Ndjson.may_drop_blank_lines());
        assert!(!Kind::Python.may_drop_blank_lines());
        assert!(!Kind::Markdown.may_drop_blank_lines());
    }
}
