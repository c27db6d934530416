use std::collections::VecDeque;
use std::io::{self, BufRead};

use serde_json::Value;
use tracing::debug;

use crate::models::record::{
    RECORD_TYPE_ASSISTANT, RECORD_TYPE_USER, RawAssistantLine, RawContentBlock,
    RawMessageContent, RawUserLine,
};
use crate::models::{LogRecord, RecordPayload};
use crate::parsers::deserializers::timestamp_from_value;

/// Lazily decodes conversation log lines into [`LogRecord`]s
///
/// Lines that are not well-formed records (invalid or truncated JSON, non-object
/// values, objects without a `type` tag, user/assistant lines of the wrong shape)
/// are skipped and counted. Blank lines are ignored. I/O errors are yielded as
/// `Err` items and end nothing by themselves; the caller decides whether to stop.
pub struct LogRecordReader<R> {
    lines: io::Lines<R>,
    source: String,
    fallback_conversation_id: String,
    pending: VecDeque<LogRecord>,
    line_num: usize,
    skipped: usize,
}

impl<R: BufRead> LogRecordReader<R> {
    /// `source` names the log in diagnostics; `conversation_id` is used for lines without a `sessionId`
    pub fn new(reader: R, source: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            source: source.into(),
            fallback_conversation_id: conversation_id.into(),
            pending: VecDeque::new(),
            line_num: 0,
            skipped: 0,
        }
    }

    /// Number of malformed lines skipped so far
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    fn skip(&mut self, reason: &str) {
        self.skipped += 1;
        debug!(source = %self.source, line = self.line_num, "Skipping malformed line: {}", reason);
    }

    fn decode_line(&mut self, line: &str) {
        let value = match serde_json::from_str::<Value>(line) {
            Ok(value) => value,
            Err(e) => return self.skip(&e.to_string()),
        };

        let Some(record_type) = value.get("type").and_then(|t| t.as_str()).map(str::to_string)
        else {
            return self.skip("missing record type");
        };

        match record_type.as_str() {
            RECORD_TYPE_ASSISTANT => match serde_json::from_value::<RawAssistantLine>(value) {
                Ok(raw) => self.push_assistant(record_type, raw),
                Err(e) => self.skip(&e.to_string()),
            },
            RECORD_TYPE_USER => match serde_json::from_value::<RawUserLine>(value) {
                Ok(raw) => self.push_user(record_type, raw),
                Err(e) => self.skip(&e.to_string()),
            },
            _ => {
                // Summaries, snapshots, system lines: well-formed but without tool payloads
                let timestamp = value.get("timestamp").and_then(|t| timestamp_from_value(t).ok());
                let conversation_id = value
                    .get("sessionId")
                    .and_then(|s| s.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| self.fallback_conversation_id.clone());
                self.pending.push_back(LogRecord {
                    record_type,
                    timestamp,
                    conversation_id,
                    payload: RecordPayload::Other,
                });
            }
        }
    }

    fn conversation_id(&self, session_id: Option<String>) -> String {
        session_id
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.fallback_conversation_id.clone())
    }

    fn push_assistant(&mut self, record_type: String, raw: RawAssistantLine) {
        let conversation_id = self.conversation_id(raw.session_id);
        let before = self.pending.len();

        if let RawMessageContent::Blocks(blocks) = raw.message.content {
            for block in blocks {
                if let RawContentBlock::ToolUse { name, input } = RawContentBlock::from_value(block)
                {
                    let input = match input {
                        Value::Object(map) => map,
                        _ => Default::default(),
                    };
                    self.pending.push_back(LogRecord {
                        record_type: record_type.clone(),
                        timestamp: raw.timestamp,
                        conversation_id: conversation_id.clone(),
                        payload: RecordPayload::ToolUse { name, input },
                    });
                }
            }
        }

        if self.pending.len() == before {
            self.pending.push_back(LogRecord {
                record_type,
                timestamp: raw.timestamp,
                conversation_id,
                payload: RecordPayload::Other,
            });
        }
    }

    fn push_user(&mut self, record_type: String, raw: RawUserLine) {
        let conversation_id = self.conversation_id(raw.session_id);

        let payload = match raw.tool_use_result {
            Some(result) => {
                let is_error = match raw.message.map(|m| m.content) {
                    Some(RawMessageContent::Blocks(blocks)) => blocks.into_iter().any(|b| {
                        matches!(
                            RawContentBlock::from_value(b),
                            RawContentBlock::ToolResult { is_error: true }
                        )
                    }),
                    _ => false,
                };
                RecordPayload::ToolResult { result, is_error }
            }
            None => RecordPayload::Other,
        };

        self.pending.push_back(LogRecord {
            record_type,
            timestamp: raw.timestamp,
            conversation_id,
            payload,
        });
    }
}

impl<R: BufRead> Iterator for LogRecordReader<R> {
    type Item = io::Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }

            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    // Non-UTF-8 bytes, e.g. a write torn mid-character
                    self.line_num += 1;
                    self.skip("line is not valid UTF-8");
                    continue;
                }
                Err(e) => return Some(Err(e)),
            };
            self.line_num += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.decode_line(line);
        }
    }
}
