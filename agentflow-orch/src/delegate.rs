//! Shared machinery for building `delegate_to_<worker>` synthetic tools,
//! used by both [`crate::supervisor::SupervisorAgent`] and
//! [`crate::hierarchical::HierarchicalAgents`].
//!
//! A tool's `call` only receives JSON arguments (see
//! `agentflow_tool::ToolDyn`), not the run's `Context` — so the ambient
//! parent context is threaded in via a task-local, scoped around each
//! top-level `interact` call and read back out here when the tool fires.
//! A task-local rather than a shared `Arc<Mutex<Option<Context>>>` cell is
//! required because `SupervisorAgent`/`HierarchicalAgents` are themselves
//! `Interactable`s composed behind `Arc<dyn Interactable>` and may be
//! invoked concurrently (e.g. as children of `ParallelAgents`): a cell
//! shared across calls would let one call's delegate tool read another
//! concurrent call's context. `PARENT_CONTEXT::scope` isolates each
//! `interact` call's context to that call's future tree, including across
//! `.await` points and executor thread migrations.

use agentflow_agent::{AgentInput, AgentResult, Interactable};
use agentflow_context::Context;
use agentflow_proto::{InputItem, SpanId};
use agentflow_tool::{FnTool, ToolDyn};
use serde::Deserialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

tokio::task_local! {
    /// The calling `interact()`'s context, visible only within that call's
    /// future tree. Set by [`crate::supervisor::SupervisorAgent::interact`]
    /// and [`crate::hierarchical::HierarchicalAgents::interact`] via
    /// `PARENT_CONTEXT.scope(..)`.
    pub(crate) static PARENT_CONTEXT: Context;
}

#[derive(Deserialize)]
pub(crate) struct DelegateArgs {
    task: String,
}

fn delegate_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "task": {
                "type": "string",
                "description": "Free-form description of the task to delegate to this worker"
            }
        },
        "required": ["task"]
    })
}

/// Build a `delegate_to_<worker_name>` tool. `budget` (with `max_rounds`),
/// when set, enforces a shared cap on total sub-delegations across every
/// tool built against the same budget — used by `HierarchicalAgents` to
/// bound recursive delegation; `SupervisorAgent` passes `None`.
pub(crate) fn delegate_tool(
    worker_name: &str,
    description: impl Into<String>,
    target: Arc<dyn Interactable>,
    budget: Option<(Arc<AtomicU32>, u32)>,
) -> Arc<dyn ToolDyn> {
    let tool_name = format!("delegate_to_{worker_name}");
    let description = description.into();

    Arc::new(FnTool::new(tool_name, description, delegate_schema(), move |args: DelegateArgs| {
        let target = Arc::clone(&target);
        let budget = budget.clone();
        async move {
            if let Some((counter, max_rounds)) = &budget {
                let used = counter.fetch_add(1, Ordering::SeqCst);
                if used >= *max_rounds {
                    return Err(format!("maxRounds ({max_rounds}) exceeded"));
                }
            }

            let parent = PARENT_CONTEXT.try_with(Context::clone).unwrap_or_default();
            let mut child_ctx = parent.fork(SpanId::generate());
            child_ctx.add_message(InputItem::user(args.task));

            match target.interact(AgentInput::WithContext(child_ctx)).await {
                AgentResult::Success { output, .. } => Ok(serde_json::json!({ "output": output })),
                AgentResult::Error { cause, .. } => Err(cause.to_string()),
                AgentResult::Handoff { target, reason, .. } => {
                    Ok(serde_json::json!({ "handoff_to": target, "reason": reason }))
                }
                AgentResult::Paused { .. } => Err("worker paused awaiting tool dispatch".to_string()),
            }
        }
    }))
}
