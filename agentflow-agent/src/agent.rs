//! [`Agent`] — the default, stock ReAct loop.
//!
//! One pass of `run` (or `interact`, via [`Interactable`]) does exactly
//! this: run input guardrails once, then loop — build a request, call the
//! provider, interpret its output items in emitted order, dispatch any tool
//! calls synchronously, and either loop back or run output guardrails and
//! return.

use crate::config::AgentConfig;
use crate::interactable::{AgentInput, Interactable};
use crate::result::{AgentResult, ToolExecution, ToolOutcome};
use crate::stream::{self, AgentStream, StreamHandlers};
use agentflow_context::Context;
use agentflow_guardrail::{run_input_guardrails, run_output_guardrails, ErasedInputGuardrail, ErasedOutputGuardrail};
use agentflow_proto::{AgentError, InputItem};
use agentflow_provider::{ModelRequest, ModelResponse, OutputItem, Provider, ProviderError, ProviderEvent, TraceAttributes};
use agentflow_tool::ToolStore;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// A named delegation target, used by orchestrators (`agentflow-orch`) to
/// describe a handoff candidate. Kept here, not in `agentflow-orch`, since
/// `Handoff` output items are interpreted directly by [`Agent::run`].
#[derive(Clone)]
pub struct HandoffDescriptor {
    /// The name the model refers to this target by.
    pub name: String,
    /// Human-readable description, included in the model request.
    pub description: String,
    /// The delegation target itself.
    pub target: Arc<dyn Interactable>,
}

/// The stock agent: one `Provider`, a tool store, and two guardrail lists.
pub struct Agent<P: Provider> {
    config: AgentConfig,
    provider: P,
    tools: ToolStore,
    input_guardrails: Vec<Arc<dyn ErasedInputGuardrail>>,
    output_guardrails: Vec<Arc<dyn ErasedOutputGuardrail>>,
    handoffs: Vec<HandoffDescriptor>,
    cancellation: Option<CancellationToken>,
}

impl<P: Provider> Agent<P> {
    /// Start building an agent around `provider`, configured by `config`.
    pub fn new(config: AgentConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            tools: ToolStore::new(),
            input_guardrails: Vec::new(),
            output_guardrails: Vec::new(),
            handoffs: Vec::new(),
            cancellation: None,
        }
    }

    /// Attach a cancellation token, checked between turns and after each
    /// tool dispatch (chainable).
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Register a tool (chainable).
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn agentflow_tool::ToolDyn>) -> Self {
        self.tools.register(tool);
        self
    }

    /// Add an input guardrail, checked once before the loop starts
    /// (chainable).
    #[must_use]
    pub fn with_input_guardrail(mut self, guardrail: Arc<dyn ErasedInputGuardrail>) -> Self {
        self.input_guardrails.push(guardrail);
        self
    }

    /// Add an output guardrail, checked once the run produces a terminal
    /// assistant message (chainable).
    #[must_use]
    pub fn with_output_guardrail(mut self, guardrail: Arc<dyn ErasedOutputGuardrail>) -> Self {
        self.output_guardrails.push(guardrail);
        self
    }

    /// Register a handoff target the model may transfer control to
    /// (chainable).
    #[must_use]
    pub fn with_handoff(mut self, handoff: HandoffDescriptor) -> Self {
        self.handoffs.push(handoff);
        self
    }

    /// This agent's configuration.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn build_request(&self, ctx: &Context) -> ModelRequest {
        ModelRequest {
            model: self.config.model.clone(),
            history: ctx.history_snapshot(),
            instructions: if self.config.instructions.is_empty() {
                None
            } else {
                Some(self.config.instructions.clone())
            },
            tools: self.tools.schemas(),
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
            metadata: self.config.metadata.clone(),
            trace: TraceAttributes {
                parent_trace_id: ctx.trace_id().cloned(),
                parent_span_id: ctx.span_id().cloned(),
                request_id: ctx.request_id().cloned(),
            },
        }
    }

    /// Drive one model turn. With an observer attached, prefers
    /// `Provider::complete_stream`, firing `onTextDelta` per
    /// [`ProviderEvent::TextDelta`] as it arrives and returning the terminal
    /// [`ProviderEvent::Complete`] response; falls back to `complete` when
    /// the provider doesn't override the default (stream-incapable)
    /// `complete_stream`. With no observer, calls `complete` directly —
    /// there is nowhere to forward deltas to.
    async fn call_provider(
        &self,
        request: ModelRequest,
        observer: Option<&Mutex<StreamHandlers>>,
    ) -> Result<ModelResponse, ProviderError> {
        let Some(h) = observer else {
            return self.provider.complete(request).await;
        };

        let mut events = match self.provider.complete_stream(request.clone()).await {
            Ok(events) => events,
            Err(_) => return self.provider.complete(request).await,
        };

        let mut final_response = None;
        while let Some(event) = events.next().await {
            match event {
                ProviderEvent::TextDelta(chunk) => stream::fire_text_delta(h, &chunk),
                ProviderEvent::FunctionCallDelta { .. } => {}
                ProviderEvent::Complete(response) => final_response = Some(response),
                ProviderEvent::Error(msg) => return Err(ProviderError::Other(msg)),
            }
        }

        final_response.ok_or_else(|| ProviderError::Other("provider stream ended without a Complete event".into()))
    }

    fn last_user_text(ctx: &Context) -> Option<&str> {
        ctx.history().iter().rev().find_map(|item| match item {
            InputItem::UserMessage { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Run to completion starting from `input`, with no stream observer.
    pub async fn run(&self, input: AgentInput) -> AgentResult {
        let ctx = input.into_context();
        self.run_with_context(ctx, None).await
    }

    /// Build an observable run. Chain `on_*` setters on the returned
    /// [`AgentStream`] before calling `subscribe`.
    pub fn interact_stream(self: &Arc<Self>, input: AgentInput) -> AgentStream
    where
        P: 'static,
    {
        let agent = Arc::clone(self);
        let handlers: Arc<Mutex<StreamHandlers>> = Arc::default();
        let handlers_for_run = Arc::clone(&handlers);
        let ctx = input.into_context();
        let fut = Box::pin(async move { agent.run_with_context(ctx, Some(&handlers_for_run)).await });
        AgentStream::live(handlers, fut)
    }

    async fn run_with_context(&self, mut ctx: Context, observer: Option<&Mutex<StreamHandlers>>) -> AgentResult {
        ctx.ensure_trace_context();

        if !self.input_guardrails.is_empty() {
            let Some(text) = Self::last_user_text(&ctx) else {
                return AgentResult::Error {
                    cause: AgentError::GuardrailError("no user message to check".into()),
                    context: ctx,
                    turns_used: 0,
                };
            };
            let result = run_input_guardrails(&self.input_guardrails, text, &ctx).await;
            if !result.is_passed() {
                let reason = result.reason().unwrap_or("input guardrail failed").to_string();
                if let Some(h) = observer {
                    stream::fire_guardrail_failed(h, &reason);
                }
                return AgentResult::Error {
                    cause: AgentError::GuardrailError(reason),
                    context: ctx,
                    turns_used: 0,
                };
            }
        }

        let mut turns_used: u32 = 0;
        let mut tool_executions: Vec<ToolExecution> = Vec::new();
        let mut last_response: Option<ModelResponse> = None;
        let mut last_assistant_text = String::new();

        loop {
            if let Some(token) = &self.cancellation {
                if token.is_cancelled() {
                    return AgentResult::Error { cause: AgentError::Cancelled, context: ctx, turns_used };
                }
            }

            let request = self.build_request(&ctx);
            if let Some(h) = observer {
                stream::fire_turn_start(h, turns_used);
            }

            let response = match self.call_provider(request, observer).await {
                Ok(r) => r,
                Err(e) => {
                    let msg = e.to_string();
                    if let Some(h) = observer {
                        stream::fire_error(h, &msg);
                    }
                    return AgentResult::Error {
                        cause: AgentError::ModelError(msg),
                        context: ctx,
                        turns_used,
                    };
                }
            };
            turns_used = ctx.increment_turn();

            if let Some(h) = observer {
                stream::fire_turn_complete(h, &response);
            }

            let mut saw_tool_call = false;

            for item in &response.output {
                match item {
                    OutputItem::Message { text, .. } => {
                        ctx.add_message(InputItem::assistant(text.clone()));
                        last_assistant_text = text.clone();
                        if let Some(h) = observer {
                            stream::fire_text_delta(h, text);
                        }
                    }
                    OutputItem::FunctionCall { call_id, name, arguments } => {
                        saw_tool_call = true;
                        let args: serde_json::Value =
                            serde_json::from_str(arguments).unwrap_or(serde_json::Value::Null);
                        ctx.add_message(InputItem::ToolCall {
                            id: call_id.clone(),
                            name: name.clone(),
                            args_json: args.clone(),
                        });
                        let output_item = self.tools.dispatch(call_id, name, args.clone()).await;
                        let outcome = match &output_item {
                            InputItem::ToolOutput { output_json: Some(v), .. } => ToolOutcome::Ok(v.clone()),
                            InputItem::ToolOutput { error_json: Some(v), .. } => ToolOutcome::Err(v.clone()),
                            _ => ToolOutcome::Err(serde_json::json!({"error": "malformed tool output"})),
                        };
                        let execution = ToolExecution {
                            call_id: call_id.clone(),
                            tool_name: name.clone(),
                            args,
                            outcome,
                        };
                        if let Some(h) = observer {
                            stream::fire_tool_executed(h, &execution);
                        }
                        tool_executions.push(execution);
                        ctx.add_message(output_item);

                        if let Some(token) = &self.cancellation {
                            if token.is_cancelled() {
                                return AgentResult::Error { cause: AgentError::Cancelled, context: ctx, turns_used };
                            }
                        }
                    }
                    OutputItem::Handoff { target, reason } => {
                        if let Some(h) = observer {
                            stream::fire_handoff(h, target);
                        }
                        let result = AgentResult::Handoff {
                            target: target.clone(),
                            reason: reason.clone(),
                            context: ctx,
                        };
                        if let Some(h) = observer {
                            stream::fire_complete(h, &result);
                        }
                        return result;
                    }
                }
            }

            last_response = Some(response);

            if saw_tool_call {
                if turns_used >= self.config.max_turns {
                    let result = AgentResult::Error {
                        cause: AgentError::TurnBudgetExceeded,
                        context: ctx,
                        turns_used,
                    };
                    if let Some(h) = observer {
                        stream::fire_error(h, "turn budget exceeded");
                        stream::fire_complete(h, &result);
                    }
                    return result;
                }
                continue;
            }

            if !self.output_guardrails.is_empty() {
                let result = run_output_guardrails(&self.output_guardrails, &last_assistant_text, &ctx).await;
                if !result.is_passed() {
                    let reason = result.reason().unwrap_or("output guardrail failed").to_string();
                    if let Some(h) = observer {
                        stream::fire_guardrail_failed(h, &reason);
                    }
                    let result = AgentResult::Error {
                        cause: AgentError::GuardrailError(reason),
                        context: ctx,
                        turns_used,
                    };
                    if let Some(h) = observer {
                        stream::fire_complete(h, &result);
                    }
                    return result;
                }
            }

            let result = AgentResult::Success {
                output: last_assistant_text,
                history: ctx.history_snapshot(),
                turns_used,
                final_response: last_response,
                tool_executions,
            };
            if let Some(h) = observer {
                stream::fire_complete(h, &result);
            }
            return result;
        }
    }

    /// Registered handoff targets, if any orchestrator needs to resolve a
    /// `Handoff` result by name.
    pub fn handoffs(&self) -> &[HandoffDescriptor] {
        &self.handoffs
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> Interactable for Agent<P> {
    async fn interact(&self, input: AgentInput) -> AgentResult {
        self.run(input).await
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentflow_guardrail::{named_input, GuardrailResult, InputGuardrail};
    use agentflow_provider::mock::ScriptedProvider;
    use agentflow_provider::{ResponseStatus, Usage};
    use std::future::Future;

    fn response_with_text(text: &str) -> ModelResponse {
        ModelResponse {
            id: "resp-1".into(),
            status: ResponseStatus::Completed,
            model: "test-model".into(),
            output: vec![OutputItem::Message { role: "assistant".into(), text: text.into() }],
            usage: Usage::default(),
        }
    }

    fn response_with_tool_call(call_id: &str, name: &str, args: &str) -> ModelResponse {
        ModelResponse {
            id: "resp-1".into(),
            status: ResponseStatus::Completed,
            model: "test-model".into(),
            output: vec![OutputItem::FunctionCall {
                call_id: call_id.into(),
                name: name.into(),
                arguments: args.into(),
            }],
            usage: Usage::default(),
        }
    }

    #[tokio::test]
    async fn single_turn_success() {
        let provider = ScriptedProvider::new(vec![response_with_text("hello there")]);
        let agent = Agent::new(AgentConfig::new("greeter", "test-model"), provider);

        let result = agent.run(AgentInput::Text("hi".into())).await;
        match result {
            AgentResult::Success { output, turns_used, .. } => {
                assert_eq!(output, "hello there");
                assert_eq!(turns_used, 1);
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn two_turn_tool_use_then_final_message() {
        let provider = ScriptedProvider::new(vec![
            response_with_tool_call("call-1", "add", r#"{"a":2,"b":3}"#),
            response_with_text("the sum is 5"),
        ]);

        struct AddArgs {
            a: i64,
            b: i64,
        }
        impl<'de> serde::Deserialize<'de> for AddArgs {
            fn deserialize<D>(d: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                #[derive(serde::Deserialize)]
                struct Raw {
                    a: i64,
                    b: i64,
                }
                let raw = Raw::deserialize(d)?;
                Ok(AddArgs { a: raw.a, b: raw.b })
            }
        }

        let add_tool = agentflow_tool::FnTool::new(
            "add",
            "adds two integers",
            serde_json::json!({"type": "object"}),
            |args: AddArgs| async move { Ok::<_, String>(args.a + args.b) },
        );

        let agent = Agent::new(AgentConfig::new("mathy", "test-model"), provider)
            .with_tool(Arc::new(add_tool));

        let result = agent.run(AgentInput::Text("what is 2+3?".into())).await;
        match result {
            AgentResult::Success { output, turns_used, tool_executions, .. } => {
                assert_eq!(output, "the sum is 5");
                assert_eq!(turns_used, 2);
                assert_eq!(tool_executions.len(), 1);
                assert!(matches!(tool_executions[0].outcome, ToolOutcome::Ok(_)));
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    struct BlocksEverything;
    impl InputGuardrail for BlocksEverything {
        fn check(&self, _input: &str, _ctx: &Context) -> impl Future<Output = GuardrailResult> + Send {
            async { GuardrailResult::failed("blocked by policy") }
        }
    }

    #[tokio::test]
    async fn input_guardrail_blocks_before_any_model_call() {
        let provider = ScriptedProvider::new(vec![response_with_text("should never be returned")]);
        let guardrail = named_input("test-blocks-everything", BlocksEverything);
        let agent = Agent::new(AgentConfig::new("guarded", "test-model"), provider)
            .with_input_guardrail(guardrail);

        let result = agent.run(AgentInput::Text("anything".into())).await;
        match result {
            AgentResult::Error { cause: AgentError::GuardrailError(reason), turns_used, .. } => {
                assert_eq!(reason, "blocked by policy");
                assert_eq!(turns_used, 0);
            }
            other => panic!("expected guardrail Error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn turn_budget_exceeded_when_continuation_required() {
        let provider = ScriptedProvider::new(vec![
            response_with_tool_call("call-1", "noop", "{}"),
            response_with_tool_call("call-2", "noop", "{}"),
        ]);
        let noop = agentflow_tool::FnTool::new(
            "noop",
            "does nothing",
            serde_json::json!({"type": "object"}),
            |_args: serde_json::Value| async move { Ok::<_, String>(serde_json::Value::Null) },
        );
        let config = AgentConfig::new("looper", "test-model").with_max_turns(1);
        let agent = Agent::new(config, provider).with_tool(Arc::new(noop));

        let result = agent.run(AgentInput::Text("go".into())).await;
        assert!(matches!(result, AgentResult::Error { cause: AgentError::TurnBudgetExceeded, turns_used: 1, .. }));
    }

    #[tokio::test]
    async fn interact_stream_forwards_text_deltas_from_the_provider_stream() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let provider = ScriptedProvider::new(vec![response_with_text("hello there friend")]);
        let agent = Arc::new(Agent::new(AgentConfig::new("streamer", "test-model"), provider));

        let delta_count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(String::new()));
        let dc = Arc::clone(&delta_count);
        let s = Arc::clone(&seen);

        let result = agent
            .interact_stream(AgentInput::Text("hi".into()))
            .on_text_delta(move |chunk| {
                dc.fetch_add(1, Ordering::SeqCst);
                s.lock().unwrap().push_str(chunk);
            })
            .subscribe()
            .await;

        assert!(delta_count.load(Ordering::SeqCst) > 1, "expected more than one delta from the scripted stream");
        assert_eq!(seen.lock().unwrap().as_str(), "hello there friend");
        match result {
            AgentResult::Success { output, .. } => assert_eq!(output, "hello there friend"),
            other => panic!("expected Success, got {other:?}"),
        }
    }
}
