//! Errors raised while resolving a [`crate::Blueprint`] against a live
//! guardrail registry and tool list. These are always build-time — a
//! malformed blueprint never produces a runtime error, only a failed
//! resolution before any agent exists.

use thiserror::Error;

/// Why resolving a blueprint into live handles failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// A blueprint referenced an input guardrail id not present in the
    /// registry.
    #[error("unregistered input guardrail: {0}")]
    UnknownInputGuardrail(String),

    /// A blueprint referenced an output guardrail id not present in the
    /// registry.
    #[error("unregistered output guardrail: {0}")]
    UnknownOutputGuardrail(String),

    /// A blueprint referenced a tool name absent from the caller-supplied
    /// tool instance list.
    #[error("no available tool instance named: {0}")]
    UnknownTool(String),

    /// An `agent`/`supervisor`/... node referenced a child id not present
    /// in the arena.
    #[error("dangling blueprint reference: {0}")]
    DanglingReference(String),

    /// A `ResponderBlueprint` set neither `provider` nor `base_url`.
    #[error("responder blueprint must set one of provider or base_url")]
    MissingResponder,
}
