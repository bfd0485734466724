//! [`ParallelAgents`] — fan-out, race, and fan-in over a fixed set of
//! [`Interactable`] children.
//!
//! `run`'s concurrent-dispatch-preserving-input-order mechanism is modeled
//! directly on `LocalOrch::dispatch_many`: spawn every child on its own
//! task, then await the `JoinHandle`s back in the original order rather
//! than completion order.

use agentflow_agent::{AgentInput, AgentResult, Interactable};
use agentflow_context::Context;
use agentflow_proto::AgentError;
use std::sync::Arc;

/// Fans a single input out to a fixed set of children.
pub struct ParallelAgents {
    agents: Vec<Arc<dyn Interactable>>,
}

impl ParallelAgents {
    /// Build from a non-empty list of children.
    ///
    /// # Panics
    ///
    /// Panics if `agents` is empty.
    pub fn of(agents: Vec<Arc<dyn Interactable>>) -> Self {
        assert!(!agents.is_empty(), "ParallelAgents requires at least one agent");
        Self { agents }
    }

    /// Read-only view of the children.
    pub fn agents(&self) -> &[Arc<dyn Interactable>] {
        &self.agents
    }

    /// Build one child's context as an isolated **copy** of `shared_ctx`
    /// (history included — children may see the existing transcript) with
    /// its own span id, not a [`Context::fork`] (which would drop history).
    fn child_context(shared_ctx: Option<&Context>) -> Context {
        let mut base = shared_ctx.cloned().unwrap_or_default();
        base.ensure_trace_context();
        let mut child = base.copy();
        child.reset_span(agentflow_proto::SpanId::generate());
        child
    }

    /// Run every child concurrently against an isolated copy of `shared_ctx`
    /// (or a fresh context if absent). Results come back in input order;
    /// a child failure becomes an `Error` entry, not a whole-run failure.
    pub async fn run(&self, input: impl Into<RunInput>, shared_ctx: Option<&Context>) -> Vec<AgentResult> {
        let run_input = input.into();
        let mut handles = Vec::with_capacity(self.agents.len());

        for agent in &self.agents {
            let agent = Arc::clone(agent);
            let ctx = Self::child_context(shared_ctx);
            let agent_input = run_input.clone().into_agent_input(ctx);
            handles.push(tokio::spawn(async move { agent.interact(agent_input).await }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(join_err) => AgentResult::Error {
                    cause: AgentError::Other(Box::new(join_err)),
                    context: Context::new(),
                    turns_used: 0,
                },
            };
            results.push(result);
        }
        results
    }

    /// Race all children concurrently; the first non-`Error` result wins.
    /// Other branches are cancelled best-effort (their tasks are aborted;
    /// any in-flight model call they started may still complete in the
    /// background and is simply discarded).
    pub async fn run_first(&self, input: impl Into<RunInput>) -> AgentResult {
        let run_input = input.into();
        let mut handles = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            let agent = Arc::clone(agent);
            let ctx = Self::child_context(None);
            let agent_input = run_input.clone().into_agent_input(ctx);
            handles.push(tokio::spawn(async move { agent.interact(agent_input).await }));
        }

        let mut pending = handles;
        loop {
            if pending.is_empty() {
                return AgentResult::Error {
                    cause: AgentError::Other("all ParallelAgents.runFirst branches errored".into()),
                    context: Context::new(),
                    turns_used: 0,
                };
            }
            let (outcome, _index, rest) = futures::future::select_all(pending).await;
            pending = rest;
            if let Ok(result) = outcome {
                if result.is_success() {
                    for handle in &pending {
                        handle.abort();
                    }
                    return result;
                }
            }
        }
    }

    /// Fan out, wait for every child (failures become string summaries),
    /// then feed a composite prompt to `synthesizer`. The synthesizer's
    /// context inherits the shared parent trace.
    pub async fn run_and_synthesize(
        &self,
        input: impl Into<RunInput>,
        synthesizer: &dyn Interactable,
        shared_ctx: Option<&Context>,
    ) -> AgentResult {
        let mut parent = shared_ctx.cloned().unwrap_or_default();
        parent.ensure_trace_context();
        let results = self.run(input, Some(&parent)).await;

        let mut summary = String::from("Worker results:\n");
        for (agent, result) in self.agents.iter().zip(&results) {
            let line = match result {
                AgentResult::Success { output, .. } => format!("- {}: {}\n", agent.name(), output),
                AgentResult::Error { cause, .. } => format!("- {}: ERROR: {}\n", agent.name(), cause),
                AgentResult::Handoff { target, .. } => format!("- {}: handed off to {}\n", agent.name(), target),
                AgentResult::Paused { .. } => format!("- {}: paused\n", agent.name()),
            };
            summary.push_str(&line);
        }

        let synth_ctx = Self::child_context(Some(&parent));
        synthesizer.interact(AgentInput::WithContext(synth_ctx).with_text_appended(summary)).await
    }
}

/// What to feed each `ParallelAgents` child: either the same text/item for
/// all of them, or a context already carrying the user input.
#[derive(Clone)]
pub enum RunInput {
    /// Plain text, wrapped per-child.
    Text(String),
}

impl From<&str> for RunInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RunInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl RunInput {
    fn into_agent_input(self, mut ctx: Context) -> AgentInput {
        match self {
            Self::Text(text) => {
                ctx.add_message(agentflow_proto::InputItem::user(text));
                AgentInput::WithContext(ctx)
            }
        }
    }
}

trait WithTextAppended {
    fn with_text_appended(self, text: String) -> Self;
}

impl WithTextAppended for AgentInput {
    fn with_text_appended(self, text: String) -> Self {
        let mut ctx = self.into_context();
        ctx.add_message(agentflow_proto::InputItem::user(text));
        AgentInput::WithContext(ctx)
    }
}
