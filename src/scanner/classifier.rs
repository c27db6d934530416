use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde_json::{Map, Value};

use crate::models::{FileEvent, LogRecord, OperationKind, RecordPayload};

const TOOL_WRITE: &str = "Write";
const UNSUPPORTED_TOOLS: &[&str] = &["Edit", "MultiEdit", "NotebookEdit"];
const RESULT_TYPE_TEXT: &str = "text";

/// Why a record did not produce a [`FileEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Not a file write or read at all
    NotFileOperation,
    /// A file operation whose content is not the whole file (edits)
    UnsupportedOperation(String),
    MissingField(&'static str),
    ReadError,
    /// A read of only part of a file
    TruncatedRead,
    /// Path with `..` components
    UnsafePath(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotFileOperation => write!(f, "not a file operation"),
            Rejection::UnsupportedOperation(name) => write!(f, "unsupported operation: {}", name),
            Rejection::MissingField(field) => write!(f, "missing field: {}", field),
            Rejection::ReadError => write!(f, "read returned an error"),
            Rejection::TruncatedRead => write!(f, "read returned partial content"),
            Rejection::UnsafePath(path) => write!(f, "unsafe path: {}", path),
        }
    }
}

/// Turns log records into file events
///
/// Only whole-content events are accepted: `Write` tool calls with inline
/// content, and complete, successful file reads.
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    project_root: Option<PathBuf>,
}

impl EventClassifier {
    pub fn new(project_root: Option<PathBuf>) -> Self {
        Self { project_root }
    }

    pub fn classify(&self, record: &LogRecord) -> Result<FileEvent, Rejection> {
        match &record.payload {
            RecordPayload::ToolUse { name, input } => self.classify_tool_use(record, name, input),
            RecordPayload::ToolResult { result, is_error } => {
                self.classify_tool_result(record, result, *is_error)
            }
            RecordPayload::Other => Err(Rejection::NotFileOperation),
        }
    }

    fn classify_tool_use(
        &self,
        record: &LogRecord,
        name: &str,
        input: &Map<String, Value>,
    ) -> Result<FileEvent, Rejection> {
        if UNSUPPORTED_TOOLS.contains(&name) {
            return Err(Rejection::UnsupportedOperation(name.to_string()));
        }
        if name != TOOL_WRITE {
            return Err(Rejection::NotFileOperation);
        }

        let raw_path = string_field(input, "file_path")?;
        let content = string_field(input, "content")?;
        self.build_event(record, raw_path, content, OperationKind::Write)
    }

    fn classify_tool_result(
        &self,
        record: &LogRecord,
        result: &Value,
        is_error: bool,
    ) -> Result<FileEvent, Rejection> {
        let Some(result) = result.as_object() else {
            // Plain string results are tool errors or command output
            return Err(if is_error { Rejection::ReadError } else { Rejection::NotFileOperation });
        };

        if result.get("type").and_then(|t| t.as_str()) != Some(RESULT_TYPE_TEXT) {
            return Err(Rejection::NotFileOperation);
        }
        if is_error {
            return Err(Rejection::ReadError);
        }

        let file = match result.get("file") {
            Some(Value::Object(file)) => file,
            _ => return Err(Rejection::MissingField("file")),
        };
        let raw_path = string_field(file, "filePath")?;
        let content = string_field(file, "content")?;

        if is_partial_read(file) {
            return Err(Rejection::TruncatedRead);
        }
        self.build_event(record, raw_path, content, OperationKind::Read)
    }

    fn build_event(
        &self,
        record: &LogRecord,
        raw_path: &str,
        content: &str,
        kind: OperationKind,
    ) -> Result<FileEvent, Rejection> {
        let path = normalize_path(raw_path, self.project_root.as_deref())
            .ok_or_else(|| Rejection::UnsafePath(raw_path.to_string()))?;

        Ok(FileEvent {
            path,
            content: content.to_string(),
            kind,
            timestamp: record.timestamp,
            conversation_id: record.conversation_id.clone(),
        })
    }
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, Rejection> {
    map.get(key).and_then(|v| v.as_str()).ok_or(Rejection::MissingField(key))
}

/// A read that started past line 1 or returned fewer lines than the file has
fn is_partial_read(file: &Map<String, Value>) -> bool {
    let get = |key: &str| file.get(key).and_then(|v| v.as_u64());

    if get("startLine").is_some_and(|start| start > 1) {
        return true;
    }
    matches!((get("numLines"), get("totalLines")), (Some(num), Some(total)) if num < total)
}

/// Normalize a logged file path into a catalog key
///
/// `.` components are dropped. Paths with `..` components, and empty paths,
/// yield `None`. Paths under `root` become relative to it; anything else is kept
/// as given.
pub fn normalize_path(raw: &str, root: Option<&Path>) -> Option<String> {
    let path = Path::new(raw);

    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => return None,
            Component::CurDir => {}
            other => cleaned.push(other.as_os_str()),
        }
    }

    if let Some(root) = root
        && let Ok(relative) = cleaned.strip_prefix(root)
        && !relative.as_os_str().is_empty()
    {
        return Some(relative.to_string_lossy().to_string());
    }

    if cleaned.as_os_str().is_empty() {
        return None;
    }
    Some(cleaned.to_string_lossy().to_string())
}
