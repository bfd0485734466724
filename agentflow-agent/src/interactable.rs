//! [`Interactable`] — the common boundary implemented by [`crate::Agent`] and
//! every orchestrator in `agentflow-orch`.
//!
//! Modeled as an `async_trait` rather than a return-position-`impl Trait`
//! trait: orchestrators need to hold a heterogeneous `Vec<Arc<dyn
//! Interactable>>` and `tokio::spawn` concurrent dispatch to its members,
//! which RPITIT traits cannot support without boxing anyway.

use agentflow_context::Context;
use agentflow_proto::InputItem;
use async_trait::async_trait;

/// What is fed into a run. `Text` and `Item` are conveniences that start a
/// fresh [`Context`]; `WithContext` continues an existing one (its most
/// recent `UserMessage` is what guardrails and the model see).
#[derive(Debug, Clone)]
pub enum AgentInput {
    /// Plain user text — wrapped in a fresh context as a `UserMessage`.
    Text(String),
    /// A pre-built history item — wrapped in a fresh context.
    Item(InputItem),
    /// An existing context, continued as-is.
    WithContext(Context),
}

impl From<&str> for AgentInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AgentInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Context> for AgentInput {
    fn from(ctx: Context) -> Self {
        Self::WithContext(ctx)
    }
}

impl AgentInput {
    /// Resolve into a concrete `Context`, appending the new input if this is
    /// a `Text`/`Item` variant.
    pub fn into_context(self) -> Context {
        match self {
            Self::Text(text) => {
                let mut ctx = Context::new();
                ctx.add_message(InputItem::user(text));
                ctx
            }
            Self::Item(item) => {
                let mut ctx = Context::new();
                ctx.add_message(item);
                ctx
            }
            Self::WithContext(ctx) => ctx,
        }
    }
}

/// Anything that can run a single request to completion: an [`Agent`](crate::Agent)
/// or any orchestrator composing several of them.
#[async_trait]
pub trait Interactable: Send + Sync {
    /// Run to a terminal [`crate::AgentResult`].
    async fn interact(&self, input: AgentInput) -> crate::AgentResult;

    /// A short, human-readable name — used by orchestrators when reporting
    /// per-branch failures (e.g. `ParallelAgents.run`'s error summaries).
    fn name(&self) -> &str;
}
