//! Model request/response wire types.
//!
//! [`ModelResponse`] mirrors the wire shape the core expects to consume:
//!
//! ```text
//! { id, object:"response", created_at, status, model,
//!   output: [ {type:"message", role, content:[{type:"output_text", text}]},
//!             {type:"function_call", call_id, name, arguments /*json string*/ } ],
//!   usage: { input_tokens, output_tokens, total_tokens } }
//! ```
//!
//! Unknown output item types are dropped with a `tracing::warn!` rather than
//! failing decode; unknown top-level fields are ignored by default serde
//! behavior (no `deny_unknown_fields`).

use agentflow_proto::{RequestId, SpanId, TraceId};
use agentflow_tool::ToolSchema;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the core submits to a model client for one turn.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation history, already assembled by the agent loop.
    pub history: Vec<agentflow_proto::InputItem>,
    /// Developer/system instructions for this run.
    pub instructions: Option<String>,
    /// Tool descriptors available this turn.
    pub tools: Vec<ToolSchema>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Maximum tokens the model may generate.
    pub max_output_tokens: Option<u32>,
    /// Opaque metadata passed through to the provider.
    pub metadata: serde_json::Value,
    /// Trace attributes threaded through to the provider for distributed
    /// tracing continuity.
    pub trace: TraceAttributes,
}

/// Trace-correlation attributes attached to a model request.
#[derive(Debug, Clone, Default)]
pub struct TraceAttributes {
    /// The run's trace id.
    pub parent_trace_id: Option<TraceId>,
    /// The run's current span id.
    pub parent_span_id: Option<SpanId>,
    /// The run's request id, if any.
    pub request_id: Option<RequestId>,
}

/// Status of a model response.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// Terminal: the response is complete.
    Completed,
    /// Non-terminal: more output is expected (streaming).
    InProgress,
    /// Terminal: the request failed.
    Failed,
}

/// Token usage reported with a response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub input_tokens: u64,
    /// Tokens generated by the model.
    pub output_tokens: u64,
    /// Sum of input and output tokens.
    pub total_tokens: u64,
    /// Cost of this turn in USD, if the provider reports pricing.
    /// `Decimal` rather than a float — cost figures get summed and compared
    /// against budgets, and binary floating point drifts under that.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub estimated_cost_usd: Option<Decimal>,
}

/// One interpreted output item from a response.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputItem {
    /// A text reply.
    Message {
        /// The message role as reported by the wire ("assistant", etc).
        role: String,
        /// Concatenated `output_text` content.
        text: String,
    },
    /// A tool invocation request.
    FunctionCall {
        /// Correlates with the eventual tool output.
        call_id: String,
        /// Tool name.
        name: String,
        /// Raw JSON-encoded arguments string, as emitted by the model.
        arguments: String,
    },
    /// A request to transfer control to another `Interactable`.
    Handoff {
        /// Name of the handoff target, resolved by the caller.
        target: String,
        /// Optional reason text.
        reason: Option<String>,
    },
}

/// A fully decoded, terminal model response.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Response id.
    pub id: String,
    /// Response status.
    pub status: ResponseStatus,
    /// Model that produced the response.
    pub model: String,
    /// Interpreted output items, in emitted order. Unknown item types have
    /// already been filtered out (and logged) by [`parse_response`].
    pub output: Vec<OutputItem>,
    /// Token usage for this turn.
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    id: String,
    #[allow(dead_code)]
    object: String,
    #[allow(dead_code)]
    created_at: i64,
    status: ResponseStatus,
    model: String,
    output: Vec<serde_json::Value>,
    #[serde(default)]
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct RawContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Parse a raw model response JSON value into a [`ModelResponse`].
///
/// Unknown `output` item types are skipped with a warning rather than
/// failing the whole decode.
pub fn parse_response(raw: serde_json::Value) -> Result<ModelResponse, serde_json::Error> {
    let raw: RawResponse = serde_json::from_value(raw)?;
    let mut output = Vec::with_capacity(raw.output.len());

    for item in raw.output {
        let kind = item.get("type").and_then(|v| v.as_str()).unwrap_or("");
        match kind {
            "message" => {
                let role = item.get("role").and_then(|v| v.as_str()).unwrap_or("assistant").to_string();
                let text = item
                    .get("content")
                    .and_then(|v| v.as_array())
                    .map(|blocks| {
                        blocks
                            .iter()
                            .filter_map(|b| serde_json::from_value::<RawContentBlock>(b.clone()).ok())
                            .filter(|b| b.kind == "output_text")
                            .map(|b| b.text)
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .unwrap_or_default();
                output.push(OutputItem::Message { role, text });
            }
            "function_call" => {
                let call_id = item.get("call_id").and_then(|v| v.as_str()).unwrap_or_default().to_string();
                let name = item.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string();
                let arguments = item.get("arguments").and_then(|v| v.as_str()).unwrap_or("{}").to_string();
                output.push(OutputItem::FunctionCall { call_id, name, arguments });
            }
            "handoff" => {
                let target = item.get("target").and_then(|v| v.as_str()).unwrap_or_default().to_string();
                let reason = item.get("reason").and_then(|v| v.as_str()).map(String::from);
                output.push(OutputItem::Handoff { target, reason });
            }
            other => {
                tracing::warn!(kind = other, "ignoring unknown model response output item type");
            }
        }
    }

    Ok(ModelResponse {
        id: raw.id,
        status: raw.status,
        model: raw.model,
        output,
        usage: raw.usage,
    })
}
