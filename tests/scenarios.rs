//! End-to-end scenarios exercising the core agent loop and orchestrators
//! without live model calls, the same way the mock-provider composability
//! suite in this workspace's component crates does.
//!
//! 1. **Guardrail blocks input** — no outbound model call is issued.
//! 2. **Single-turn success** — one model message, no tools.
//! 3. **Two-turn tool use** — a tool call, then a final message.
//! 4. **Router classification** — exact match and fallback-on-invalid.
//! 5. **Parallel isolation** — children never mutate the shared context.
//! 6. **Trace continuity** — an empty-trace context gains ids that persist
//!    across a second call.

use agentflow::prelude::*;
use agentflow_context::Context;
use agentflow_provider::mock::ScriptedProvider;
use agentflow_provider::{ModelResponse, OutputItem, ResponseStatus, Usage};
use std::sync::Arc;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn text_response(text: &str) -> ModelResponse {
    ModelResponse {
        id: "resp-1".to_string(),
        status: ResponseStatus::Completed,
        model: "mock-model".to_string(),
        output: vec![OutputItem::Message {
            role: "assistant".to_string(),
            text: text.to_string(),
        }],
        usage: Usage::default(),
    }
}

fn tool_call_response(call_id: &str, name: &str, args: &str) -> ModelResponse {
    ModelResponse {
        id: "resp-tool".to_string(),
        status: ResponseStatus::Completed,
        model: "mock-model".to_string(),
        output: vec![OutputItem::FunctionCall {
            call_id: call_id.to_string(),
            name: name.to_string(),
            arguments: args.to_string(),
        }],
        usage: Usage::default(),
    }
}

fn base_config(name: &str) -> AgentConfig {
    AgentConfig::new(name, "mock-model").with_instructions("be helpful")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenario 1: Guardrail blocks input
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn guardrail_blocks_input_before_any_model_call() {
    struct BlocksSubstring;
    impl InputGuardrail for BlocksSubstring {
        async fn check(&self, input: &str, _ctx: &Context) -> GuardrailResult {
            if input.contains("blocked") {
                GuardrailResult::failed("contains blocked substring")
            } else {
                GuardrailResult::passed()
            }
        }
    }

    let provider = ScriptedProvider::new(vec![text_response("should never be returned")]);
    let agent = Agent::new(base_config("gatekeeper"), provider)
        .with_input_guardrail(Arc::new(BlocksSubstring));

    let result = agent.run(AgentInput::Text("contains blocked stuff".to_string())).await;

    match result {
        AgentResult::Error { cause, .. } => {
            assert!(matches!(cause, AgentError::GuardrailError(_)));
        }
        other => panic!("expected Error{{GuardrailError}}, got {other:?}"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenario 2: Single-turn success
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn single_turn_success_with_no_tools() {
    let provider = ScriptedProvider::new(vec![text_response("Hello")]);
    let agent = Agent::new(base_config("greeter"), provider);

    let result = agent.run(AgentInput::Text("hi".to_string())).await;

    match result {
        AgentResult::Success {
            output,
            turns_used,
            tool_executions,
            ..
        } => {
            assert_eq!(turns_used, 1);
            assert!(output.contains("Hello"));
            assert!(tool_executions.is_empty());
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenario 3: Two-turn tool use
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(serde::Deserialize)]
struct AddArgs {
    a: i64,
    b: i64,
}

#[tokio::test]
async fn two_turn_tool_use_then_final_message() {
    let provider = ScriptedProvider::new(vec![
        tool_call_response("call-1", "add", r#"{"a":2,"b":3}"#),
        text_response("The result is 5."),
    ]);

    let add_tool = FnTool::new(
        "add",
        "adds two integers",
        serde_json::json!({
            "type": "object",
            "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
            "required": ["a", "b"],
        }),
        |args: AddArgs| async move { Ok::<_, String>(args.a + args.b) },
    );

    let agent = Agent::new(base_config("mathbot"), provider).with_tool(Arc::new(add_tool));

    let result = agent.run(AgentInput::Text("2+3".to_string())).await;

    match result {
        AgentResult::Success {
            output,
            tool_executions,
            ..
        } => {
            assert!(output.contains('5'));
            assert_eq!(tool_executions.len(), 1);
            assert_eq!(tool_executions[0].tool_name, "add");
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenario 4: Router classification
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn router_dispatches_to_the_classified_route() {
    let classifier = ScriptedProvider::new(vec![text_response("1")]);
    let billing_provider = ScriptedProvider::new(vec![text_response("Billing handled it")]);
    let tech_provider = ScriptedProvider::new(vec![text_response("Tech handled it")]);

    let billing: Arc<dyn Interactable> =
        Arc::new(Agent::new(base_config("billing"), billing_provider));
    let tech: Arc<dyn Interactable> = Arc::new(Agent::new(base_config("tech"), tech_provider));

    let router = RouterAgent::builder("mock-model", classifier)
        .add_route(billing, "billing, invoices")
        .add_route(tech, "technical issues")
        .build();

    let result = router.interact(AgentInput::Text("I was overcharged".to_string())).await;
    assert_eq!(result.output(), Some("Billing handled it"));
}

#[tokio::test]
async fn router_falls_back_when_classification_is_invalid() {
    let classifier = ScriptedProvider::new(vec![text_response("invalid")]);
    let billing_provider = ScriptedProvider::new(vec![text_response("Billing handled it")]);
    let fallback_provider = ScriptedProvider::new(vec![text_response("Fallback handled it")]);

    let billing: Arc<dyn Interactable> =
        Arc::new(Agent::new(base_config("billing"), billing_provider));
    let fallback: Arc<dyn Interactable> =
        Arc::new(Agent::new(base_config("fallback"), fallback_provider));

    let router = RouterAgent::builder("mock-model", classifier)
        .add_route(billing, "billing, invoices")
        .with_fallback(fallback)
        .build();

    let result = router.interact(AgentInput::Text("???".to_string())).await;
    assert_eq!(result.output(), Some("Fallback handled it"));
}

#[tokio::test]
async fn router_without_fallback_reports_route_unavailable() {
    let classifier = ScriptedProvider::new(vec![text_response("invalid")]);
    let billing_provider = ScriptedProvider::new(vec![text_response("Billing handled it")]);
    let billing: Arc<dyn Interactable> =
        Arc::new(Agent::new(base_config("billing"), billing_provider));

    let router = RouterAgent::builder("mock-model", classifier)
        .add_route(billing, "billing, invoices")
        .build();

    let result = router.interact(AgentInput::Text("???".to_string())).await;
    match result {
        AgentResult::Error { cause, .. } => assert!(matches!(cause, AgentError::RouteUnavailable)),
        other => panic!("expected Error{{RouteUnavailable}}, got {other:?}"),
    }
}

#[tokio::test]
async fn router_stream_fires_route_chosen_before_forwarding_the_targets_stream() {
    use std::sync::Mutex;

    let classifier = ScriptedProvider::new(vec![text_response("1")]);
    let tech_provider = ScriptedProvider::new(vec![text_response("Tech handled it")]);
    let tech: Arc<dyn Interactable> = Arc::new(Agent::new(base_config("tech"), tech_provider));

    let router = Arc::new(
        RouterAgent::builder("mock-model", classifier)
            .add_route(tech, "technical issues")
            .build(),
    );

    let chosen = Arc::new(Mutex::new(String::new()));
    let c = Arc::clone(&chosen);

    let result = router
        .interact_stream(AgentInput::Text("my laptop won't boot".to_string()))
        .on_route_chosen(move |name| *c.lock().unwrap() = name.to_string())
        .subscribe()
        .await;

    assert_eq!(chosen.lock().unwrap().as_str(), "tech");
    assert_eq!(result.output(), Some("Tech handled it"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenario 5: Parallel isolation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn parallel_children_never_mutate_the_shared_context() {
    struct MutatesState(&'static str);

    #[async_trait::async_trait]
    impl Interactable for MutatesState {
        async fn interact(&self, input: AgentInput) -> AgentResult {
            let mut ctx = input.into_context();
            ctx.set_state("k", Some(serde_json::json!("mutated-by-child")));
            AgentResult::Success {
                output: self.0.to_string(),
                history: ctx.history_snapshot(),
                turns_used: 1,
                final_response: None,
                tool_executions: vec![],
            }
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    let mut shared_ctx = Context::new();
    shared_ctx.set_state("k", Some(serde_json::json!("initial")));

    let parallel = ParallelAgents::of(vec![
        Arc::new(MutatesState("one")) as Arc<dyn Interactable>,
        Arc::new(MutatesState("two")) as Arc<dyn Interactable>,
    ]);

    let _ = parallel.run("x", Some(&shared_ctx)).await;

    assert_eq!(
        shared_ctx.get_state("k"),
        Some(&serde_json::json!("initial"))
    );
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scenario 6: Trace continuity
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn trace_ids_persist_across_repeated_calls() {
    struct EnsuresTraceContext;

    #[async_trait::async_trait]
    impl Interactable for EnsuresTraceContext {
        async fn interact(&self, input: AgentInput) -> AgentResult {
            let mut ctx = input.into_context();
            ctx.ensure_trace_context();
            AgentResult::Handoff {
                target: "noop".to_string(),
                reason: None,
                context: ctx,
            }
        }

        fn name(&self) -> &str {
            "ensures-trace-context"
        }
    }

    let node = EnsuresTraceContext;
    let ctx = Context::new();
    assert!(!ctx.has_trace_context());

    let first = node.interact(AgentInput::WithContext(ctx)).await;
    let (trace_id, ctx_after_first) = match first {
        AgentResult::Handoff { context, .. } => {
            assert!(context.has_trace_context());
            let trace_id = context.trace_id().expect("trace id set").to_string();
            assert_eq!(trace_id.len(), 32);
            assert!(trace_id.chars().all(|c| c.is_ascii_hexdigit()));
            (trace_id, context)
        }
        other => panic!("expected Handoff, got {other:?}"),
    };

    let second = node.interact(AgentInput::WithContext(ctx_after_first)).await;
    match second {
        AgentResult::Handoff { context, .. } => {
            assert_eq!(context.trace_id().unwrap().to_string(), trace_id);
        }
        other => panic!("expected Handoff, got {other:?}"),
    }
}
