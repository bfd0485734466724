//! The terminal value of a run: [`AgentResult`].

use agentflow_context::Context;
use agentflow_proto::{AgentError, InputItem};
use agentflow_provider::ModelResponse;

/// One tool invocation that happened during a run, preserved for callers
/// that want to inspect dispatch history without re-walking `history`.
#[derive(Debug, Clone)]
pub struct ToolExecution {
    /// The `ToolCall.id` this execution answers.
    pub call_id: String,
    /// Name of the tool that was invoked.
    pub tool_name: String,
    /// Decoded (or raw, on decode failure) arguments.
    pub args: serde_json::Value,
    /// Success or error payload.
    pub outcome: ToolOutcome,
}

/// Result payload of one tool invocation.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    /// The tool succeeded with this payload.
    Ok(serde_json::Value),
    /// The tool failed (not found, decode error, or invocation error).
    Err(serde_json::Value),
}

/// A tool call the loop has recorded but not yet dispatched — only produced
/// by an `Interactable` implementation that defers dispatch to the host
/// instead of the default synchronous auto-dispatch `Agent` performs.
#[derive(Debug, Clone)]
pub struct PendingToolCall {
    /// Correlates with the eventual `ToolOutput`.
    pub id: String,
    /// Tool name as requested by the model.
    pub name: String,
    /// Raw JSON arguments.
    pub args_json: serde_json::Value,
}

/// The terminal value of a run. Exactly one variant is ever populated.
#[non_exhaustive]
#[derive(Debug)]
pub enum AgentResult {
    /// The run completed normally.
    Success {
        /// The final assistant text.
        output: String,
        /// Full history at completion.
        history: Vec<InputItem>,
        /// Number of model turns used. Always `<= maxTurns`.
        turns_used: u32,
        /// The last raw model response, if the provider returned one.
        final_response: Option<ModelResponse>,
        /// Every tool call dispatched during the run, in order.
        tool_executions: Vec<ToolExecution>,
    },
    /// The run suspended with unresolved tool calls. Never produced by the
    /// stock `Agent` loop (which always auto-dispatches) — reserved for
    /// `Interactable` implementations that defer dispatch to a host policy.
    Paused {
        /// Tool calls awaiting dispatch.
        pending_calls: Vec<PendingToolCall>,
        /// Context at the point of suspension.
        context: Context,
    },
    /// The run transferred control to another `Interactable`.
    Handoff {
        /// Name of the handoff target.
        target: String,
        /// Optional reason text from the model.
        reason: Option<String>,
        /// Context at the point of handoff.
        context: Context,
    },
    /// The run terminated in error.
    Error {
        /// Why it failed.
        cause: AgentError,
        /// Context at the point of failure.
        context: Context,
        /// Number of model turns used before failing.
        turns_used: u32,
    },
}

impl AgentResult {
    /// `true` for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The final text, if this is a `Success`.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Success { output, .. } => Some(output),
            _ => None,
        }
    }
}
