//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

/// Builder for creating test .claude directory structures
pub struct ClaudeDirBuilder {
    temp_dir: TempDir,
}

impl ClaudeDirBuilder {
    /// Create a new builder with an empty .claude directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the .claude directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a project directory with the given encoded name and conversation logs
    pub fn with_project(self, encoded_name: &str, log_files: &[LogFileBuilder]) -> Self {
        let project_dir = self.project_dir(encoded_name);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for log_file in log_files {
            log_file.create_in(&project_dir);
        }

        self
    }

    /// Path of a project directory (whether or not it exists yet)
    pub fn project_dir(&self, encoded_name: &str) -> PathBuf {
        self.temp_dir.path().join("projects").join(encoded_name)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ClaudeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one conversation log file
pub struct LogFileBuilder {
    filename: String,
    lines: Vec<String>,
}

impl LogFileBuilder {
    /// Create a new log file with the given filename
    pub fn new(filename: &str) -> Self {
        Self { filename: filename.to_string(), lines: Vec::new() }
    }

    /// Add a record line
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// Add several record lines
    pub fn with_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Create the file in the given directory
    pub fn create_in(&self, dir: &Path) {
        let file_path = dir.join(&self.filename);
        let mut file = fs::File::create(file_path).expect("Failed to create log file");
        file.write_all(self.lines.join("\n").as_bytes()).expect("Failed to write log file");
    }
}

/// Assistant line with a single `Write` tool call
pub fn write_record(path: &str, content: &str, timestamp_ms: i64) -> String {
    tool_use_record("Write", json!({"file_path": path, "content": content}), timestamp_ms)
}

/// Assistant line with an `Edit` tool call (never recoverable)
pub fn edit_record(path: &str, timestamp_ms: i64) -> String {
    tool_use_record(
        "Edit",
        json!({"file_path": path, "old_string": "a", "new_string": "b"}),
        timestamp_ms,
    )
}

/// Assistant line with one tool call
pub fn tool_use_record(name: &str, input: serde_json::Value, timestamp_ms: i64) -> String {
    json!({
        "type": "assistant",
        "message": {
            "role": "assistant",
            "content": [{"type": "tool_use", "id": "toolu_01", "name": name, "input": input}]
        },
        "timestamp": timestamp_ms,
        "sessionId": "550e8400-e29b-41d4-a716-446655440000"
    })
    .to_string()
}

/// User line carrying the result of a complete file read
pub fn read_record(path: &str, content: &str, timestamp_ms: i64) -> String {
    let lines = content.split('\n').count();
    read_record_range(path, content, 1, lines, lines, timestamp_ms)
}

/// User line carrying the result of a file read with an explicit line range
pub fn read_record_range(
    path: &str,
    content: &str,
    start_line: usize,
    num_lines: usize,
    total_lines: usize,
    timestamp_ms: i64,
) -> String {
    json!({
        "type": "user",
        "message": {
            "role": "user",
            "content": [{"type": "tool_result", "tool_use_id": "toolu_01", "content": content}]
        },
        "toolUseResult": {
            "type": "text",
            "file": {
                "filePath": path,
                "content": content,
                "numLines": num_lines,
                "startLine": start_line,
                "totalLines": total_lines
            }
        },
        "timestamp": timestamp_ms,
        "sessionId": "550e8400-e29b-41d4-a716-446655440000"
    })
    .to_string()
}

/// Plain user prompt
pub fn user_text_record(text: &str, timestamp_ms: i64) -> String {
    json!({
        "type": "user",
        "message": {"role": "user", "content": text},
        "timestamp": timestamp_ms,
        "sessionId": "550e8400-e29b-41d4-a716-446655440000"
    })
    .to_string()
}

/// A line that is not valid JSON
pub fn malformed_record() -> String {
    r#"{"type":"assistant","message":{"content":[{"type":"tool_use""#.to_string()
}

/// Helper to create a realistic .claude directory with sample data
///
/// `project1` has two Python files (one with two versions) and a Markdown file;
/// `project2` has a single read-back TOML file.
pub fn realistic_claude_dir() -> TempDir {
    ClaudeDirBuilder::new()
        .with_project(
            "-Users%2Ftest%2Fproject1",
            &[
                LogFileBuilder::new("session-a.jsonl")
                    .with_line(user_text_record("Create the app", 1_700_000_000_000))
                    .with_line(write_record(
                        "/Users/test/project1/src/app.py",
                        "print('v1')\n",
                        1_700_000_001_000,
                    ))
                    .with_line(write_record(
                        "/Users/test/project1/README.md",
                        "# Project 1\n",
                        1_700_000_002_000,
                    )),
                LogFileBuilder::new("session-b.jsonl")
                    .with_line(write_record(
                        "/Users/test/project1/src/app.py",
                        "print('v2')\n",
                        1_700_000_003_000,
                    ))
                    .with_line(write_record(
                        "/Users/test/project1/src/util.py",
                        "def helper():\n    pass\n",
                        1_700_000_004_000,
                    ))
                    .with_line(edit_record("/Users/test/project1/src/app.py", 1_700_000_005_000)),
            ],
        )
        .with_project(
            "-Users%2Ftest%2Fproject2",
            &[LogFileBuilder::new("session-c.jsonl").with_line(read_record(
                "/Users/test/project2/Cargo.toml",
                "[package]\nname = \"p2\"",
                1_600_000_000_000,
            ))],
        )
        .build()
}
