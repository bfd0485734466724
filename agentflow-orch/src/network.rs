//! [`AgentNetwork`] — peers taking turns over a shared, growing transcript.

use agentflow_agent::{AgentInput, AgentResult, Interactable};
use agentflow_context::Context;
use agentflow_proto::{AgentError, InputItem};
use std::sync::Arc;

/// Round-robin peers, each seeing the cumulative transcript, with an
/// optional final synthesizer.
pub struct AgentNetwork {
    peers: Vec<Arc<dyn Interactable>>,
    synthesizer: Option<Arc<dyn Interactable>>,
    max_rounds: u32,
}

impl AgentNetwork {
    /// Build a network from a non-empty peer list, bounded to `max_rounds`
    /// round-robin passes.
    ///
    /// # Panics
    ///
    /// Panics if `peers` is empty.
    pub fn new(peers: Vec<Arc<dyn Interactable>>, max_rounds: u32) -> Self {
        assert!(!peers.is_empty(), "AgentNetwork requires at least one peer");
        Self { peers, synthesizer: None, max_rounds }
    }

    /// Attach a synthesizer that produces the final composite answer after
    /// the last round (chainable).
    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Interactable>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Run `max_rounds` round-robin passes over the peers, starting from
    /// `input`, then hand off to the synthesizer if one is set.
    pub async fn run(&self, input: impl Into<String>) -> AgentResult {
        let mut ctx = Context::new();
        ctx.ensure_trace_context();
        ctx.add_message(InputItem::user(input.into()));

        let mut last_result: Option<AgentResult> = None;

        for _round in 0..self.max_rounds {
            for peer in &self.peers {
                let result = peer.interact(AgentInput::WithContext(ctx.clone())).await;
                if let AgentResult::Success { output, .. } = &result {
                    ctx.add_message(InputItem::assistant(output.clone()));
                }
                last_result = Some(result);
            }
        }

        if let Some(synthesizer) = &self.synthesizer {
            return synthesizer.interact(AgentInput::WithContext(ctx)).await;
        }

        last_result.unwrap_or(AgentResult::Error {
            cause: AgentError::Other("AgentNetwork ran zero rounds".into()),
            context: ctx,
            turns_used: 0,
        })
    }
}
