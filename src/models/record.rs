use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const RECORD_TYPE_USER: &str = "user";
pub const RECORD_TYPE_ASSISTANT: &str = "assistant";

/// Tool invocation data carried by a [`LogRecord`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPayload {
    /// A `tool_use` block from an assistant message
    ToolUse { name: String, input: Map<String, Value> },
    /// The `toolUseResult` attached to a user line
    ToolResult { result: Value, is_error: bool },
    /// Any record without a tool payload (text, thinking, summaries, snapshots, ...)
    Other,
}

/// One typed record produced by the log parser
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub record_type: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub conversation_id: String,
    pub payload: RecordPayload,
}

impl LogRecord {
    pub fn is_tool_use(&self) -> bool {
        matches!(self.payload, RecordPayload::ToolUse { .. })
    }
}

/// Raw shape of an `assistant` line
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssistantLine {
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: RawMessage,
}

/// Raw shape of a `user` line
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUserLine {
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<RawMessage>,
    #[serde(default)]
    pub tool_use_result: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub content: RawMessageContent,
}

/// Message content is either a plain string or a list of typed blocks
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawMessageContent {
    Blocks(Vec<Value>),
    Text(String),
}

impl Default for RawMessageContent {
    fn default() -> Self {
        RawMessageContent::Text(String::new())
    }
}

/// Content block inside a message; unknown block types decode to `Other`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawContentBlock {
    ToolUse {
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Other,
}

impl RawContentBlock {
    /// Decode a block, treating undecodable blocks as `Other`
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or(RawContentBlock::Other)
    }
}
