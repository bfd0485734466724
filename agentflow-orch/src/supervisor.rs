//! [`SupervisorAgent`] — a coordinator whose tools are dynamically
//! generated `delegate_to_<worker>` wrappers around its workers.

use crate::delegate::{delegate_tool, PARENT_CONTEXT};
use agentflow_agent::{Agent, AgentConfig, AgentInput, AgentResult, Interactable};
use agentflow_provider::Provider;
use async_trait::async_trait;
use std::sync::Arc;

/// A coordinator agent: an ordinary [`Agent`] whose tool list is extended
/// with one synthetic `delegate_to_<name>` tool per worker. Each
/// delegation is a sub-run whose context is forked from the supervisor's.
pub struct SupervisorAgent<P: Provider> {
    agent: Agent<P>,
}

impl<P: Provider> SupervisorAgent<P> {
    /// Build a supervisor from `config`/`provider` plus a list of
    /// `(worker_name, description, target)` workers.
    pub fn new(config: AgentConfig, provider: P, workers: Vec<(String, String, Arc<dyn Interactable>)>) -> Self {
        let mut agent = Agent::new(config, provider);
        for (name, description, target) in workers {
            let tool = delegate_tool(&name, description, target, None);
            agent = agent.with_tool(tool);
        }
        Self { agent }
    }

    /// The underlying agent's configuration.
    pub fn config(&self) -> &AgentConfig {
        self.agent.config()
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> Interactable for SupervisorAgent<P> {
    async fn interact(&self, input: AgentInput) -> AgentResult {
        let ctx = input.into_context();
        let agent = &self.agent;
        PARENT_CONTEXT.scope(ctx.clone(), async move { agent.run(AgentInput::WithContext(ctx)).await }).await
    }

    fn name(&self) -> &str {
        Interactable::name(&self.agent)
    }
}
