//! Fatal error taxonomy for agent runs.
//!
//! These are the causes that can appear inside `AgentResult::Error`. Tool
//! decode/invocation failures are deliberately **not** part of this enum —
//! they are recovered locally as `ToolOutput` error payloads and never
//! propagate here (see `agentflow_tool::ToolError`).

use thiserror::Error;

/// Why an agent run terminated in error.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AgentError {
    /// An input or output guardrail rejected the text.
    #[error("guardrail failed: {0}")]
    GuardrailError(String),

    /// `maxTurns` was reached without a terminal assistant message.
    #[error("turn budget exceeded")]
    TurnBudgetExceeded,

    /// The model client failed (transport, parse, or provider-side error).
    #[error("model error: {0}")]
    ModelError(String),

    /// A router found no matching target and no fallback was configured.
    #[error("no route available")]
    RouteUnavailable,

    /// The run was cancelled externally.
    #[error("cancelled")]
    Cancelled,

    /// Catch-all for errors outside the known taxonomy.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            AgentError::GuardrailError("blocked".into()).to_string(),
            "guardrail failed: blocked"
        );
        assert_eq!(AgentError::TurnBudgetExceeded.to_string(), "turn budget exceeded");
        assert_eq!(AgentError::RouteUnavailable.to_string(), "no route available");
        assert_eq!(AgentError::Cancelled.to_string(), "cancelled");
    }
}
