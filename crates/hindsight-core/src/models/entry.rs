use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record discriminator of a transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum EntryKind {
    Summary,
    UserTurn,
    AssistantTurn,
    FileSnapshot,
    /// Forward-compatible passthrough; carries the raw `type` value.
    Unknown(String),
}

impl EntryKind {
    /// Map the raw `type` discriminator of a log line.
    pub fn from_discriminator(raw: &str) -> Self {
        match raw {
            "summary" => Self::Summary,
            "user" => Self::UserTurn,
            "assistant" => Self::AssistantTurn,
            "file-history-snapshot" => Self::FileSnapshot,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Normalized speaker of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
    None,
}

impl Role {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("user") => Self::User,
            Some("assistant") => Self::Assistant,
            Some("system") => Self::System,
            _ => Self::None,
        }
    }
}

/// A tool invocation emitted by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub input: serde_json::Value,
}

/// The outcome of a tool invocation, fed back on a user-role entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_use_id: Option<String>,
    pub content: String,
    pub is_error: bool,
}

/// One normalized transcript record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique within the transcript.
    pub id: String,
    pub parent_id: Option<String>,
    pub kind: EntryKind,
    pub timestamp: Option<DateTime<Utc>>,
    pub is_sidechain: bool,
    pub role: Role,
    /// Concatenated user-visible text. Never includes reasoning.
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: Vec<ToolResult>,
    /// Model reasoning, kept apart from `text` and never used for detection.
    pub internal_reasoning: Option<String>,
    /// 1-based line number in the source file.
    pub line_number: usize,
}

impl Entry {
    pub fn is_user_turn(&self) -> bool {
        self.kind == EntryKind::UserTurn
    }

    pub fn is_assistant_turn(&self) -> bool {
        self.kind == EntryKind::AssistantTurn
    }

    /// A user-role entry that only ferries tool results back to the model.
    pub fn is_tool_result_carrier(&self) -> bool {
        self.is_user_turn() && !self.tool_results.is_empty() && self.text.trim().is_empty()
    }
}
