//! Serializable topology descriptions.
//!
//! A [`Blueprint`] describes an agent or orchestrator the way an LLM (or a
//! config file) would author one: by name, not by live object. Guardrails
//! and tools are referenced symbolically — a registry id or instance
//! name — and resolved against a live [`agentflow_guardrail::GuardrailRegistry`]
//! and a caller-supplied tool list in [`crate::resolve`]. The model id is
//! deliberately absent from [`ResponderBlueprint`]; it is injected by the
//! caller when a concrete [`agentflow_provider::Provider`] is constructed,
//! never by the blueprint itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node in a blueprint tree, tagged by `"type"`.
///
/// Composite variants reference their children by id into a
/// [`crate::arena::BlueprintArena`] rather than embedding them inline —
/// this lets two nodes share a subtree (e.g. the same worker under two
/// different supervisors) without an ownership cycle.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Blueprint {
    /// A single `Agent`.
    Agent(AgentBlueprint),
    /// A round-robin peer network.
    Network(NetworkBlueprint),
    /// A manager agent delegating to named workers via tool calls.
    Supervisor(SupervisorBlueprint),
    /// Fan-out to independent children, gathered or raced.
    Parallel(ParallelBlueprint),
    /// Single-hop classification to one of several targets.
    Router(RouterBlueprint),
    /// Two-level supervisor-of-supervisors.
    Hierarchical(HierarchicalBlueprint),
}

impl Blueprint {
    /// The author-facing name of this node, regardless of variant.
    pub fn name(&self) -> &str {
        match self {
            Blueprint::Agent(b) => &b.name,
            Blueprint::Network(b) => &b.name,
            Blueprint::Supervisor(b) => &b.name,
            Blueprint::Parallel(b) => &b.name,
            Blueprint::Router(b) => &b.name,
            Blueprint::Hierarchical(b) => &b.name,
        }
    }
}

/// A single-agent node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentBlueprint {
    /// Author-facing name, also used as the agent's `Interactable::name`.
    pub name: String,
    /// System/developer instructions.
    pub instructions: String,
    /// Upper bound on tool-use continuation turns.
    #[serde(default)]
    pub max_turns: Option<u32>,
    /// Sampling temperature, if the responder supports it.
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Output token cap, if the responder supports it.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// Names of tool instances this agent may call.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Registry ids of input guardrails, run once before the loop.
    #[serde(default)]
    pub input_guardrails: Vec<String>,
    /// Registry ids of output guardrails, run once after a final message.
    #[serde(default)]
    pub output_guardrails: Vec<String>,
    /// Blueprint arena ids of handoff targets.
    #[serde(default)]
    pub handoffs: Vec<String>,
    /// The model/transport this agent talks to.
    pub responder: ResponderBlueprint,
}

/// A round-robin peer network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkBlueprint {
    /// Author-facing name.
    pub name: String,
    /// Arena ids of peers, called in round-robin order.
    pub peers: Vec<String>,
    /// Maximum number of rounds before the network stops.
    pub max_rounds: u32,
    /// Arena id of an optional synthesizer run on the final transcript.
    #[serde(default)]
    pub synthesizer: Option<String>,
}

/// A manager agent delegating to named workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorBlueprint {
    /// Author-facing name.
    pub name: String,
    /// The manager's own instructions.
    pub instructions: String,
    /// `(worker description, arena id)` pairs exposed as delegate tools.
    pub workers: Vec<WorkerRef>,
    /// The manager's responder.
    pub responder: ResponderBlueprint,
}

/// One delegate-tool target: a human-facing description plus the arena id
/// of the actual worker blueprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRef {
    /// Shown to the manager model as the tool description.
    pub description: String,
    /// Arena id of the worker node.
    pub target: String,
}

/// Fan-out to independent children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelBlueprint {
    /// Author-facing name.
    pub name: String,
    /// Arena ids of children run concurrently.
    pub children: Vec<String>,
    /// Arena id of an optional synthesizer run over the gathered results.
    #[serde(default)]
    pub synthesizer: Option<String>,
}

/// Single-hop classification to one of several named targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterBlueprint {
    /// Author-facing name.
    pub name: String,
    /// `(route description, arena id)` pairs offered to the classifier.
    pub routes: Vec<WorkerRef>,
    /// Arena id of the fallback target, used when classification fails.
    #[serde(default)]
    pub fallback: Option<String>,
    /// The responder used to classify the incoming input.
    pub responder: ResponderBlueprint,
}

/// Supervisor-of-supervisors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchicalBlueprint {
    /// Author-facing name.
    pub name: String,
    /// The executive's own instructions.
    pub instructions: String,
    /// `(department description, arena id)` pairs, each typically itself a
    /// `supervisor` node.
    pub departments: Vec<WorkerRef>,
    /// Shared executive-to-department delegation budget.
    pub max_rounds: u32,
    /// The executive's responder.
    pub responder: ResponderBlueprint,
}

/// How an agent reaches its model, minus the model id itself.
///
/// Exactly one of `provider` or `base_url` must be set — `provider` names
/// a well-known backend resolved by the caller's own provider factory,
/// `base_url` points at an OpenAI-compatible HTTP endpoint. The model id
/// is supplied alongside whichever provider instance the caller builds
/// from this blueprint; it never round-trips through the blueprint itself,
/// since blueprints are meant to be portable across deployments that may
/// pin different models to the same role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponderBlueprint {
    /// Name of a well-known provider backend (e.g. `"openai"`, `"anthropic"`).
    #[serde(default)]
    pub provider: Option<String>,
    /// An OpenAI-compatible HTTP endpoint, for custom/self-hosted backends.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key.
    #[serde(default)]
    pub api_key_env_var: Option<String>,
    /// Retry behavior for transient provider failures.
    #[serde(default)]
    pub retry_policy: Option<RetryPolicyBlueprint>,
    /// Opaque metadata attached to every request's trace attributes.
    #[serde(default)]
    pub trace_metadata: Value,
}

impl ResponderBlueprint {
    /// `Ok(())` iff exactly the documented invariant — provider or
    /// base_url set — holds.
    pub fn validate(&self) -> Result<(), crate::BlueprintError> {
        if self.provider.is_none() && self.base_url.is_none() {
            return Err(crate::BlueprintError::MissingResponder);
        }
        Ok(())
    }
}

/// Retry behavior for transient provider failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicyBlueprint {
    /// Maximum retry attempts after the initial call.
    pub max_retries: u32,
    /// Base backoff in milliseconds, doubled per attempt.
    pub base_delay_ms: u64,
}
