use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// File type category derived from a path's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    Python,
    JavaScript,
    TypeScript,
    React,
    ReactTs,
    Html,
    Css,
    Scss,
    Json,
    Yaml,
    Toml,
    Markdown,
    Text,
    Sql,
    Shell,
    Docker,
    Rust,
    Go,
    Java,
    Php,
    Ruby,
    C,
    Cpp,
    Header,
    Other,
}

impl FileCategory {
    pub const ALL: [FileCategory; 25] = [
        FileCategory::Python,
        FileCategory::JavaScript,
        FileCategory::TypeScript,
        FileCategory::React,
        FileCategory::ReactTs,
        FileCategory::Html,
        FileCategory::Css,
        FileCategory::Scss,
        FileCategory::Json,
        FileCategory::Yaml,
        FileCategory::Toml,
        FileCategory::Markdown,
        FileCategory::Text,
        FileCategory::Sql,
        FileCategory::Shell,
        FileCategory::Docker,
        FileCategory::Rust,
        FileCategory::Go,
        FileCategory::Java,
        FileCategory::Php,
        FileCategory::Ruby,
        FileCategory::C,
        FileCategory::Cpp,
        FileCategory::Header,
        FileCategory::Other,
    ];

    /// Map a lowercase extension (without the dot) to its category
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "py" => FileCategory::Python,
            "js" => FileCategory::JavaScript,
            "ts" => FileCategory::TypeScript,
            "jsx" => FileCategory::React,
            "tsx" => FileCategory::ReactTs,
            "html" => FileCategory::Html,
            "css" => FileCategory::Css,
            "scss" => FileCategory::Scss,
            "json" => FileCategory::Json,
            "yaml" | "yml" => FileCategory::Yaml,
            "toml" => FileCategory::Toml,
            "md" => FileCategory::Markdown,
            "txt" => FileCategory::Text,
            "sql" => FileCategory::Sql,
            "sh" => FileCategory::Shell,
            "dockerfile" => FileCategory::Docker,
            "rs" => FileCategory::Rust,
            "go" => FileCategory::Go,
            "java" => FileCategory::Java,
            "php" => FileCategory::Php,
            "rb" => FileCategory::Ruby,
            "c" => FileCategory::C,
            "cpp" => FileCategory::Cpp,
            "h" => FileCategory::Header,
            _ => FileCategory::Other,
        }
    }

    /// Categorize a path by its extension; paths without one are `Other`
    pub fn from_path(path: &str) -> Self {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(FileCategory::from_extension)
            .unwrap_or(FileCategory::Other)
    }

    /// Human-readable name, as shown in tables and accepted by filters
    pub fn name(&self) -> &'static str {
        match self {
            FileCategory::Python => "Python",
            FileCategory::JavaScript => "JavaScript",
            FileCategory::TypeScript => "TypeScript",
            FileCategory::React => "React",
            FileCategory::ReactTs => "React TS",
            FileCategory::Html => "HTML",
            FileCategory::Css => "CSS",
            FileCategory::Scss => "SCSS",
            FileCategory::Json => "JSON",
            FileCategory::Yaml => "YAML",
            FileCategory::Toml => "TOML",
            FileCategory::Markdown => "Markdown",
            FileCategory::Text => "Text",
            FileCategory::Sql => "SQL",
            FileCategory::Shell => "Shell",
            FileCategory::Docker => "Docker",
            FileCategory::Rust => "Rust",
            FileCategory::Go => "Go",
            FileCategory::Java => "Java",
            FileCategory::Php => "PHP",
            FileCategory::Ruby => "Ruby",
            FileCategory::C => "C",
            FileCategory::Cpp => "C++",
            FileCategory::Header => "Header",
            FileCategory::Other => "Other",
        }
    }

    /// Look up a category by its display name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        FileCategory::ALL.into_iter().find(|c| c.name().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
