#![deny(missing_docs)]
//! # agentflow — umbrella crate
//!
//! Single import surface for the agentflow framework: protocol types,
//! context, guardrails, tools, providers, the agentic loop, composite
//! orchestrators, and serializable blueprints, each gated behind a
//! feature so a binary only pulls in what it uses.

#[cfg(feature = "agent")]
pub use agentflow_agent;
#[cfg(feature = "blueprint")]
pub use agentflow_blueprint;
#[cfg(feature = "core")]
pub use agentflow_context;
#[cfg(feature = "core")]
pub use agentflow_guardrail;
#[cfg(feature = "orch")]
pub use agentflow_orch;
#[cfg(feature = "core")]
pub use agentflow_proto;
#[cfg(feature = "provider")]
pub use agentflow_provider;
#[cfg(feature = "core")]
pub use agentflow_tool;

/// Happy-path imports for composing agentflow systems.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use agentflow_context::Context;

    #[cfg(feature = "core")]
    pub use agentflow_guardrail::{
        GuardrailRegistry, GuardrailResult, InputGuardrail, OutputGuardrail,
    };

    #[cfg(feature = "core")]
    pub use agentflow_proto::{AgentError, InputItem};

    #[cfg(feature = "core")]
    pub use agentflow_tool::{FnTool, ToolDyn, ToolError, ToolStore};

    #[cfg(feature = "provider")]
    pub use agentflow_provider::{ModelRequest, ModelResponse, Provider, ProviderError};

    #[cfg(feature = "agent")]
    pub use agentflow_agent::{
        Agent, AgentConfig, AgentInput, AgentResult, AgentStream, Interactable, InteractableStream,
    };

    #[cfg(feature = "orch")]
    pub use agentflow_orch::{
        AgentNetwork, HierarchicalAgents, ParallelAgents, RouterAgent, RouterStream, SupervisorAgent,
    };

    #[cfg(feature = "blueprint")]
    pub use agentflow_blueprint::{Blueprint, BlueprintArena, ResolvedAgent};
}
