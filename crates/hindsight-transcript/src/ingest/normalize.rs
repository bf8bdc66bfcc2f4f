//! RawLine → Entry normalization.

use chrono::{DateTime, Utc};
use hindsight_core::models::{Entry, EntryKind, Role, ToolCall, ToolResult};
use tracing::debug;

use super::raw::{RawBlock, RawContent, RawLine};

/// Normalize one parsed line. Infallible: anything unexpected becomes an
/// empty field or an `Unknown` kind.
pub(crate) fn normalize(raw: RawLine, line_number: usize) -> Entry {
    let discriminator = raw.kind.unwrap_or_default();
    let kind = EntryKind::from_discriminator(&discriminator);

    // Records without their own uuid get a positional id so the arena stays keyed.
    let id = raw
        .uuid
        .unwrap_or_else(|| format!("{}@{}", synthetic_prefix(&discriminator), line_number));

    let mut text_parts: Vec<String> = Vec::new();
    let mut reasoning_parts: Vec<String> = Vec::new();
    let mut tool_calls = Vec::new();
    let mut tool_results = Vec::new();

    let role_raw = raw.message.as_ref().and_then(|m| m.role.clone());
    match raw.message.and_then(|m| m.content) {
        Some(RawContent::Text(text)) => text_parts.push(text),
        Some(RawContent::Blocks(blocks)) => {
            for value in blocks {
                let block = match serde_json::from_value::<RawBlock>(value) {
                    Ok(block) => block,
                    Err(e) => {
                        debug!(line_number, error = %e, "dropping malformed content block");
                        continue;
                    }
                };
                match block {
                    RawBlock::Text { text } => text_parts.push(text),
                    RawBlock::Thinking { thinking } => reasoning_parts.push(thinking),
                    RawBlock::ToolUse { name, input } => tool_calls.push(ToolCall { name, input }),
                    RawBlock::ToolResult {
                        tool_use_id,
                        content,
                        is_error,
                    } => tool_results.push(ToolResult {
                        tool_use_id,
                        content: content.as_ref().map(flatten_result_content).unwrap_or_default(),
                        is_error: is_error.unwrap_or(false),
                    }),
                    RawBlock::Other => {}
                }
            }
        }
        Some(RawContent::Other(_)) | None => {}
    }

    if let Some(summary) = raw.summary {
        text_parts.push(summary);
    }
    if let Some(serde_json::Value::String(content)) = raw.content {
        text_parts.push(content);
    }

    let role = match (&kind, role_raw.as_deref()) {
        (_, Some(r)) => Role::from_raw(Some(r)),
        (EntryKind::UserTurn, None) => Role::User,
        (EntryKind::AssistantTurn, None) => Role::Assistant,
        (EntryKind::Unknown(tag), None) if tag == "system" => Role::System,
        _ => Role::None,
    };

    Entry {
        id,
        parent_id: raw.parent_uuid,
        kind,
        timestamp: raw.timestamp.as_deref().and_then(parse_timestamp),
        is_sidechain: raw.is_sidechain.unwrap_or(false),
        role,
        text: join_nonempty(&text_parts),
        tool_calls,
        tool_results,
        internal_reasoning: if reasoning_parts.is_empty() {
            None
        } else {
            Some(join_nonempty(&reasoning_parts))
        },
        line_number,
    }
}

fn synthetic_prefix(discriminator: &str) -> &str {
    if discriminator.is_empty() {
        "untyped"
    } else {
        discriminator
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Tool result content is a string, an array of text blocks, or arbitrary JSON.
fn flatten_result_content(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| item.get("text").and_then(|t| t.as_str()))
                .map(str::to_string)
                .collect();
            join_nonempty(&parts)
        }
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn join_nonempty(parts: &[String]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Entry {
        let raw: RawLine = serde_json::from_str(line).unwrap();
        normalize(raw, 1)
    }

    #[test]
    fn plain_string_content_becomes_text() {
        let e = parse(r#"{"type":"user","uuid":"u","message":{"role":"user","content":"hello"}}"#);
        assert_eq!(e.text, "hello");
        assert_eq!(e.role, Role::User);
        assert!(e.tool_calls.is_empty());
    }

    #[test]
    fn reasoning_is_kept_out_of_text() {
        let e = parse(
            r#"{"type":"assistant","uuid":"a","message":{"role":"assistant","content":[
                {"type":"thinking","thinking":"secret plan"},
                {"type":"text","text":"visible answer"}]}}"#,
        );
        assert_eq!(e.text, "visible answer");
        assert_eq!(e.internal_reasoning.as_deref(), Some("secret plan"));
    }

    #[test]
    fn tool_blocks_are_split_out() {
        let e = parse(
            r#"{"type":"user","uuid":"t","message":{"role":"user","content":[
                {"type":"tool_result","tool_use_id":"toolu_1","content":[{"type":"text","text":"boom"}],"is_error":true}]}}"#,
        );
        assert_eq!(e.tool_results.len(), 1);
        assert!(e.tool_results[0].is_error);
        assert_eq!(e.tool_results[0].content, "boom");
        assert!(e.is_tool_result_carrier());
    }

    #[test]
    fn unknown_block_types_are_ignored() {
        let e = parse(
            r#"{"type":"user","uuid":"i","message":{"role":"user","content":[
                {"type":"image","source":{"data":"..."}},{"type":"text","text":"see image"}]}}"#,
        );
        assert_eq!(e.text, "see image");
    }

    #[test]
    fn malformed_block_is_dropped_not_the_entry() {
        let e = parse(
            r#"{"type":"assistant","uuid":"b","parentUuid":"a","message":{"role":"assistant","content":[
                {"type":"text","text":null},
                {"type":"tool_use","id":"toolu_1","input":{}},
                {"type":"text","text":"still here"},
                {"type":"tool_use","name":"Bash","input":{"command":"ls"}}]}}"#,
        );
        assert_eq!(e.id, "b");
        assert_eq!(e.parent_id.as_deref(), Some("a"));
        assert_eq!(e.text, "still here");
        assert_eq!(e.tool_calls.len(), 1);
        assert_eq!(e.tool_calls[0].name, "Bash");
    }

    #[test]
    fn non_array_content_yields_empty_text() {
        let e = parse(r#"{"type":"user","uuid":"u","message":{"role":"user","content":{"odd":1}}}"#);
        assert_eq!(e.id, "u");
        assert!(e.text.is_empty());
    }

    #[test]
    fn missing_uuid_gets_positional_id() {
        let e = parse(r#"{"type":"summary","summary":"Fixing tests","leafUuid":"x"}"#);
        assert_eq!(e.id, "summary@1");
        assert_eq!(e.kind, EntryKind::Summary);
        assert_eq!(e.text, "Fixing tests");
    }

    #[test]
    fn invalid_timestamp_is_dropped_not_fatal() {
        let e = parse(r#"{"type":"user","uuid":"u","timestamp":"yesterday"}"#);
        assert!(e.timestamp.is_none());
    }
}
