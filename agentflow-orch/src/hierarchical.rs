//! [`HierarchicalAgents`] — an executive delegating to department managers,
//! which in turn delegate to their own workers (same mechanism,
//! recursively), bounded by a shared `maxRounds` budget.

use crate::delegate::{delegate_tool, PARENT_CONTEXT};
use agentflow_agent::{Agent, AgentConfig, AgentInput, AgentResult, Interactable};
use agentflow_provider::Provider;
use async_trait::async_trait;
use std::sync::atomic::AtomicU32;
use std::sync::Arc;

/// An executive agent owning one `delegate_to_<department>` tool per
/// department. Each department's manager is itself typically a
/// [`crate::supervisor::SupervisorAgent`], type-erased as `Arc<dyn
/// Interactable>` so departments may have heterogeneous internal structure.
pub struct HierarchicalAgents<P: Provider> {
    executive: Agent<P>,
    rounds_used: Arc<AtomicU32>,
}

impl<P: Provider> HierarchicalAgents<P> {
    /// Build an executive from `config`/`provider`, a list of
    /// `(department_name, description, manager)` departments, and a total
    /// sub-delegation budget shared across the whole hierarchy.
    pub fn new(
        config: AgentConfig,
        provider: P,
        departments: Vec<(String, String, Arc<dyn Interactable>)>,
        max_rounds: u32,
    ) -> Self {
        let rounds_used = Arc::new(AtomicU32::new(0));
        let mut agent = Agent::new(config, provider);
        for (name, description, manager) in departments {
            let tool = delegate_tool(&name, description, manager, Some((Arc::clone(&rounds_used), max_rounds)));
            agent = agent.with_tool(tool);
        }
        Self { executive: agent, rounds_used }
    }

    /// Total sub-delegations executed so far across the whole hierarchy.
    pub fn rounds_used(&self) -> u32 {
        self.rounds_used.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> Interactable for HierarchicalAgents<P> {
    async fn interact(&self, input: AgentInput) -> AgentResult {
        let ctx = input.into_context();
        let executive = &self.executive;
        PARENT_CONTEXT
            .scope(ctx.clone(), async move { executive.run(AgentInput::WithContext(ctx)).await })
            .await
    }

    fn name(&self) -> &str {
        Interactable::name(&self.executive)
    }
}
