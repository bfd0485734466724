//! History items exchanged between an [`Agent`](crate) and its model client.
//!
//! `InputItem` is the single type that makes up a `Context`'s history. A
//! `message` output from the model becomes an `AssistantMessage`; a
//! `function_call` output becomes a `ToolCall` followed, once dispatched, by
//! a `ToolOutput`.

use serde::{Deserialize, Serialize};

/// One entry in an agent's conversation history.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// A message from the human driving the conversation.
    UserMessage {
        /// The message text.
        text: String,
    },
    /// A text reply produced by the model.
    AssistantMessage {
        /// The reply text.
        text: String,
    },
    /// Developer/system instruction injected mid-conversation.
    DeveloperMessage {
        /// The instruction text.
        text: String,
    },
    /// A tool invocation requested by the model.
    ToolCall {
        /// Id correlating this call with its eventual `ToolOutput`.
        id: String,
        /// Name of the tool to invoke.
        name: String,
        /// Raw JSON arguments as emitted by the model.
        args_json: serde_json::Value,
    },
    /// The host's reply to a `ToolCall`, fed back to the model.
    ToolOutput {
        /// The `ToolCall.id` this output answers.
        call_id: String,
        /// Success payload, present on success.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        output_json: Option<serde_json::Value>,
        /// Error payload, present on failure. Never set together with
        /// `output_json`.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        error_json: Option<serde_json::Value>,
    },
}

impl InputItem {
    /// Build a user message item.
    pub fn user(text: impl Into<String>) -> Self {
        Self::UserMessage { text: text.into() }
    }

    /// Build an assistant message item.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::AssistantMessage { text: text.into() }
    }

    /// Build a developer/system message item.
    pub fn developer(text: impl Into<String>) -> Self {
        Self::DeveloperMessage { text: text.into() }
    }

    /// A successful tool output item.
    pub fn tool_output_ok(call_id: impl Into<String>, output: serde_json::Value) -> Self {
        Self::ToolOutput {
            call_id: call_id.into(),
            output_json: Some(output),
            error_json: None,
        }
    }

    /// A failed tool output item.
    pub fn tool_output_err(call_id: impl Into<String>, error: serde_json::Value) -> Self {
        Self::ToolOutput {
            call_id: call_id.into(),
            output_json: None,
            error_json: Some(error),
        }
    }

    /// The call id this item references, if any (`ToolCall.id` or
    /// `ToolOutput.call_id`).
    pub fn call_id(&self) -> Option<&str> {
        match self {
            Self::ToolCall { id, .. } => Some(id),
            Self::ToolOutput { call_id, .. } => Some(call_id),
            _ => None,
        }
    }

    /// Plain text carried by a user/assistant/developer message, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::UserMessage { text }
            | Self::AssistantMessage { text }
            | Self::DeveloperMessage { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_output_carries_call_id() {
        let item = InputItem::tool_output_ok("call-1", serde_json::json!({"sum": 5}));
        assert_eq!(item.call_id(), Some("call-1"));
    }

    #[test]
    fn tagged_roundtrip() {
        let item = InputItem::ToolCall {
            id: "c1".into(),
            name: "add".into(),
            args_json: serde_json::json!({"a": 2, "b": 3}),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: InputItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn text_extraction() {
        assert_eq!(InputItem::user("hi").text(), Some("hi"));
        assert_eq!(
            InputItem::ToolCall { id: "1".into(), name: "x".into(), args_json: serde_json::Value::Null }.text(),
            None
        );
    }
}
