//! Turning symbolic references into live handles.
//!
//! This crate never constructs an `Agent` or orchestrator itself — that
//! would require a concrete [`agentflow_provider::Provider`], which a
//! blueprint deliberately doesn't carry. Instead, [`resolve_agent`] takes
//! one [`AgentBlueprint`] plus a caller-supplied tool list and produces a
//! [`ResolvedAgent`]: the same structural data, with guardrail ids and
//! tool names replaced by the live handles the caller then hands to
//! `Agent::with_tool`/`with_input_guardrail`/etc.

use std::sync::Arc;

use agentflow_guardrail::{ErasedInputGuardrail, ErasedOutputGuardrail, GuardrailRegistry};
use agentflow_tool::ToolDyn;

use crate::types::AgentBlueprint;
use crate::BlueprintError;

/// An [`AgentBlueprint`] with every symbolic reference resolved against a
/// live registry and tool list.
pub struct ResolvedAgent {
    /// Carried through unchanged from the blueprint.
    pub name: String,
    /// Carried through unchanged from the blueprint.
    pub instructions: String,
    /// Carried through unchanged from the blueprint.
    pub max_turns: Option<u32>,
    /// Carried through unchanged from the blueprint.
    pub temperature: Option<f32>,
    /// Carried through unchanged from the blueprint.
    pub max_output_tokens: Option<u32>,
    /// Resolved from [`AgentBlueprint::tools`] against `available_tools`.
    pub tools: Vec<Arc<dyn ToolDyn>>,
    /// Resolved from [`AgentBlueprint::input_guardrails`] against the
    /// global [`GuardrailRegistry`].
    pub input_guardrails: Vec<Arc<dyn ErasedInputGuardrail>>,
    /// Resolved from [`AgentBlueprint::output_guardrails`] against the
    /// global [`GuardrailRegistry`].
    pub output_guardrails: Vec<Arc<dyn ErasedOutputGuardrail>>,
    /// Arena ids of handoff targets, left unresolved — the caller walks
    /// these against its own arena once every agent node is resolved.
    pub handoffs: Vec<String>,
}

/// Resolve one [`AgentBlueprint`], matching `tools` entries against
/// `available_tools` by [`ToolDyn::name`] and guardrail ids against the
/// process-wide [`GuardrailRegistry`].
pub fn resolve_agent(
    blueprint: &AgentBlueprint,
    available_tools: &[Arc<dyn ToolDyn>],
) -> Result<ResolvedAgent, BlueprintError> {
    blueprint.responder.validate()?;

    let mut tools = Vec::with_capacity(blueprint.tools.len());
    for wanted in &blueprint.tools {
        let found = available_tools
            .iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| BlueprintError::UnknownTool(wanted.clone()))?;
        tools.push(Arc::clone(found));
    }

    let registry = GuardrailRegistry::global();
    let mut input_guardrails = Vec::with_capacity(blueprint.input_guardrails.len());
    for id in &blueprint.input_guardrails {
        let g = registry
            .resolve_input(id)
            .ok_or_else(|| BlueprintError::UnknownInputGuardrail(id.clone()))?;
        input_guardrails.push(g);
    }

    let mut output_guardrails = Vec::with_capacity(blueprint.output_guardrails.len());
    for id in &blueprint.output_guardrails {
        let g = registry
            .resolve_output(id)
            .ok_or_else(|| BlueprintError::UnknownOutputGuardrail(id.clone()))?;
        output_guardrails.push(g);
    }

    Ok(ResolvedAgent {
        name: blueprint.name.clone(),
        instructions: blueprint.instructions.clone(),
        max_turns: blueprint.max_turns,
        temperature: blueprint.temperature,
        max_output_tokens: blueprint.max_output_tokens,
        tools,
        input_guardrails,
        output_guardrails,
        handoffs: blueprint.handoffs.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponderBlueprint;
    use agentflow_guardrail::{named_input, GuardrailResult};
    use serde_json::{json, Value};
    use std::future::Future;
    use std::pin::Pin;

    struct EchoTool;

    impl ToolDyn for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes its input"
        }
        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
        fn call(
            &self,
            args_json: Value,
        ) -> Pin<Box<dyn Future<Output = Result<Value, agentflow_tool::ToolError>> + Send + '_>>
        {
            Box::pin(async move { Ok(args_json) })
        }
    }

    fn always_passes() -> impl agentflow_guardrail::InputGuardrail {
        struct Always;
        impl agentflow_guardrail::InputGuardrail for Always {
            async fn check(
                &self,
                _input: &str,
                _ctx: &agentflow_context::Context,
            ) -> GuardrailResult {
                GuardrailResult::passed()
            }
        }
        Always
    }

    fn blueprint() -> AgentBlueprint {
        AgentBlueprint {
            name: "resolver-test".to_string(),
            instructions: "be helpful".to_string(),
            max_turns: Some(4),
            temperature: None,
            max_output_tokens: None,
            tools: vec!["echo".to_string()],
            input_guardrails: vec!["resolver-test.input".to_string()],
            output_guardrails: vec![],
            handoffs: vec![],
            responder: ResponderBlueprint {
                provider: Some("mock".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn resolves_registered_tool_and_guardrail() {
        named_input("resolver-test.input", always_passes());
        let tools: Vec<Arc<dyn ToolDyn>> = vec![Arc::new(EchoTool)];
        let resolved = resolve_agent(&blueprint(), &tools).expect("resolves");
        assert_eq!(resolved.tools.len(), 1);
        assert_eq!(resolved.input_guardrails.len(), 1);
    }

    #[test]
    fn unknown_tool_is_reported() {
        let bp = blueprint();
        let err = resolve_agent(&bp, &[]).unwrap_err();
        assert!(matches!(err, BlueprintError::UnknownTool(name) if name == "echo"));
    }

    #[test]
    fn missing_responder_is_reported_before_tool_lookup() {
        let mut bp = blueprint();
        bp.responder = ResponderBlueprint::default();
        let err = resolve_agent(&bp, &[]).unwrap_err();
        assert!(matches!(err, BlueprintError::MissingResponder));
    }
}
