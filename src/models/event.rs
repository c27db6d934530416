use std::fmt;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::FileCategory;

/// Directory names that usually mark the start of a project's own tree
const PROJECT_INDICATORS: &[&str] =
    &["src", "lib", "app", "components", "pages", "api", "utils", "tests", "docs"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Write,
    Read,
    /// Reserved; edit events are never turned into a [`FileEvent`]
    Edit,
    /// Reserved; edit events are never turned into a [`FileEvent`]
    MultiEdit,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Write => "Write",
            OperationKind::Read => "Read",
            OperationKind::Edit => "Edit",
            OperationKind::MultiEdit => "MultiEdit",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete content of one file at one point in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvent {
    pub path: String,
    pub content: String,
    pub kind: OperationKind,
    pub timestamp: Option<DateTime<Utc>>,
    pub conversation_id: String,
}

impl FileEvent {
    /// Content size in UTF-8 bytes
    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_path(&self.path)
    }

    pub fn file_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.clone())
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    /// Shortened path for display
    ///
    /// Relative paths are shown as-is. Absolute paths are cut at the first
    /// project indicator directory (`src`, `lib`, ...) or reduced to their
    /// last few components.
    pub fn display_path(&self) -> String {
        let path = Path::new(&self.path);
        if path.is_relative() {
            return self.path.clone();
        }

        let parts: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect();

        if let Some(i) = parts.iter().skip(1).position(|p| PROJECT_INDICATORS.contains(p)) {
            return join_parts(&parts[i + 1..]);
        }

        let keep = if parts.len() > 3 { 3 } else { parts.len().min(2) };
        join_parts(&parts[parts.len() - keep..])
    }
}

fn join_parts(parts: &[&str]) -> String {
    parts.iter().collect::<PathBuf>().to_string_lossy().to_string()
}
