#![deny(missing_docs)]
//! Serializable, polymorphic agent topology descriptions.
//!
//! A [`Blueprint`] lets an LLM (or a config author) describe an agent or
//! orchestrator by name — instructions, tool names, guardrail ids, worker
//! references — without ever touching a live object. [`BlueprintArena`]
//! holds a whole tree of named nodes so composite topologies can share
//! subtrees by reference. [`resolve_agent`] turns one leaf's symbolic
//! references into live handles against a process-wide
//! [`agentflow_guardrail::GuardrailRegistry`] and a caller-supplied tool
//! list; building the actual `Agent`/orchestrator from a [`ResolvedAgent`]
//! and a concrete `Provider` is left to the caller, since a blueprint
//! never carries a model id or a live provider instance.

mod arena;
mod error;
mod resolve;
mod types;

pub use arena::BlueprintArena;
pub use error::BlueprintError;
pub use resolve::{resolve_agent, ResolvedAgent};
pub use types::{
    AgentBlueprint, Blueprint, HierarchicalBlueprint, NetworkBlueprint, ParallelBlueprint,
    ResponderBlueprint, RetryPolicyBlueprint, RouterBlueprint, SupervisorBlueprint, WorkerRef,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let bp = Blueprint::Agent(AgentBlueprint {
            name: "writer".to_string(),
            instructions: "draft copy".to_string(),
            max_turns: Some(6),
            temperature: Some(0.7),
            max_output_tokens: None,
            tools: vec!["search".to_string()],
            input_guardrails: vec!["writer.input".to_string()],
            output_guardrails: vec![],
            handoffs: vec![],
            responder: ResponderBlueprint {
                provider: Some("openai".to_string()),
                ..Default::default()
            },
        });
        let json = serde_json::to_string(&bp).expect("serializes");
        assert!(json.contains("\"type\":\"agent\""));
        let back: Blueprint = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back.name(), "writer");
    }

    #[test]
    fn composite_blueprint_references_children_by_id() {
        let mut arena = BlueprintArena::default();
        arena.root = "boss".to_string();
        arena.insert(
            "worker-a",
            Blueprint::Agent(AgentBlueprint {
                name: "worker-a".to_string(),
                instructions: "do the work".to_string(),
                max_turns: None,
                temperature: None,
                max_output_tokens: None,
                tools: vec![],
                input_guardrails: vec![],
                output_guardrails: vec![],
                handoffs: vec![],
                responder: ResponderBlueprint {
                    provider: Some("mock".to_string()),
                    ..Default::default()
                },
            }),
        );
        arena.insert(
            "boss",
            Blueprint::Supervisor(SupervisorBlueprint {
                name: "boss".to_string(),
                instructions: "delegate everything".to_string(),
                workers: vec![WorkerRef {
                    description: "does the work".to_string(),
                    target: "worker-a".to_string(),
                }],
                responder: ResponderBlueprint {
                    provider: Some("mock".to_string()),
                    ..Default::default()
                },
            }),
        );
        assert!(arena.validate().is_ok());
    }

    #[test]
    fn model_id_is_not_a_field_of_responder_blueprint() {
        let json = serde_json::to_value(ResponderBlueprint {
            provider: Some("openai".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(json.get("model").is_none());
    }
}
