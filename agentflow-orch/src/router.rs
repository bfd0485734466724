//! [`RouterAgent`] — an LLM classifier that dispatches to one of a fixed
//! set of named targets.

use agentflow_agent::{AgentInput, AgentResult, AgentStream, Interactable, InteractableStream, ToolExecution};
use agentflow_context::Context;
use agentflow_proto::{AgentError, InputItem};
use agentflow_provider::{ModelRequest, ModelResponse, OutputItem, Provider, TraceAttributes};
use async_trait::async_trait;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

struct Route {
    target: Arc<dyn Interactable>,
    description: String,
}

/// Classifies input against a fixed route list, then delegates.
pub struct RouterAgent<P: Provider> {
    model: String,
    responder: P,
    routes: Vec<Route>,
    fallback: Option<Arc<dyn Interactable>>,
}

/// Builder for [`RouterAgent`].
pub struct RouterAgentBuilder<P: Provider> {
    model: String,
    responder: P,
    routes: Vec<Route>,
    fallback: Option<Arc<dyn Interactable>>,
}

impl<P: Provider> RouterAgentBuilder<P> {
    /// Add a numbered route.
    #[must_use]
    pub fn add_route(mut self, target: Arc<dyn Interactable>, description: impl Into<String>) -> Self {
        self.routes.push(Route { target, description: description.into() });
        self
    }

    /// Set the fallback target used when classification yields nothing
    /// usable (chainable).
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn Interactable>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Finish building. Requires at least one route.
    ///
    /// # Panics
    ///
    /// Panics if no route was added.
    pub fn build(self) -> RouterAgent<P> {
        assert!(!self.routes.is_empty(), "RouterAgent requires at least one route");
        RouterAgent {
            model: self.model,
            responder: self.responder,
            routes: self.routes,
            fallback: self.fallback,
        }
    }
}

impl<P: Provider> RouterAgent<P> {
    /// Start a builder for `model`/`responder`.
    pub fn builder(model: impl Into<String>, responder: P) -> RouterAgentBuilder<P> {
        RouterAgentBuilder {
            model: model.into(),
            responder,
            routes: Vec::new(),
            fallback: None,
        }
    }

    fn classification_instructions(&self) -> String {
        let mut prompt = String::from(
            "Choose the single best-matching option for the user's request below. \
             Reply with only the option's number, nothing else.\n\n",
        );
        for (i, route) in self.routes.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, route.description));
        }
        prompt
    }

    fn last_user_text(ctx: &Context) -> Option<&str> {
        ctx.history().iter().rev().find_map(|item| match item {
            InputItem::UserMessage { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Classify `ctx`'s most recent user message against the route list,
    /// returning the chosen target or `None` if the model's reply didn't
    /// parse as an in-range 1-based route number and no fallback is set.
    pub async fn classify(&self, ctx: &Context) -> Option<Arc<dyn Interactable>> {
        let text = Self::last_user_text(ctx).unwrap_or_default().to_string();
        let request = ModelRequest {
            model: self.model.clone(),
            history: vec![InputItem::user(text)],
            instructions: Some(self.classification_instructions()),
            tools: Vec::new(),
            temperature: Some(0.0),
            max_output_tokens: None,
            metadata: serde_json::Value::Null,
            trace: TraceAttributes {
                parent_trace_id: ctx.trace_id().cloned(),
                parent_span_id: ctx.span_id().cloned(),
                request_id: ctx.request_id().cloned(),
            },
        };

        let response = match self.responder.complete(request).await {
            Ok(r) => r,
            Err(_) => return self.fallback.clone(),
        };

        let reply = response.output.iter().find_map(|item| match item {
            OutputItem::Message { text, .. } => Some(text.clone()),
            _ => None,
        });

        let Some(reply) = reply else {
            return self.fallback.clone();
        };

        match reply.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.routes.len() => Some(Arc::clone(&self.routes[n - 1].target)),
            _ => self.fallback.clone(),
        }
    }

    /// Read-only view of the registered routes' descriptions.
    pub fn route_descriptions(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.description.as_str()).collect()
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> Interactable for RouterAgent<P> {
    async fn interact(&self, input: AgentInput) -> AgentResult {
        let ctx = input.into_context();
        match self.classify(&ctx).await {
            Some(target) => target.interact(AgentInput::WithContext(ctx)).await,
            None => AgentResult::Error {
                cause: AgentError::RouteUnavailable,
                context: ctx,
                turns_used: 0,
            },
        }
    }

    fn name(&self) -> &str {
        "router"
    }
}

impl<P: Provider + Send + Sync + 'static> RouterAgent<P> {
    /// Build an observable routed run. Chain `on_*` setters on the returned
    /// [`RouterStream`] before calling `subscribe`: `onRouteChosen` fires
    /// once classification resolves (with the chosen target's name), then
    /// every other registered callback is forwarded to that target's own
    /// stream.
    pub fn interact_stream(self: &Arc<Self>, input: AgentInput) -> RouterStream {
        let router = Arc::clone(self);
        let ctx = input.into_context();
        let body = Box::pin(async move {
            match router.classify(&ctx).await {
                Some(target) => Ok((target, ctx)),
                None => Err(ctx),
            }
        });
        RouterStream::new(body)
    }
}

fn invoke_guarded(label: &str, f: impl FnOnce()) {
    if std::panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!(callback = label, "RouterStream callback panicked; suppressed");
    }
}

type StrHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Observer over one routed run: `onRouteChosen` exposes the classification
/// decision as an early event, then every other callback is forwarded to
/// whatever target the router resolved to — see [`RouterAgent::interact_stream`].
pub struct RouterStream {
    on_route_chosen: Option<StrHandler>,
    on_turn_start: Option<Box<dyn Fn(u32) + Send + Sync>>,
    on_text_delta: Option<StrHandler>,
    on_turn_complete: Option<Box<dyn Fn(&ModelResponse) + Send + Sync>>,
    on_tool_executed: Option<Box<dyn Fn(&ToolExecution) + Send + Sync>>,
    on_guardrail_failed: Option<StrHandler>,
    on_handoff: Option<StrHandler>,
    on_complete: Option<Box<dyn Fn(&AgentResult) + Send + Sync>>,
    on_error: Option<StrHandler>,
    body: Pin<Box<dyn Future<Output = Result<(Arc<dyn Interactable>, Context), Context>> + Send>>,
}

impl RouterStream {
    fn new(body: Pin<Box<dyn Future<Output = Result<(Arc<dyn Interactable>, Context), Context>> + Send>>) -> Self {
        Self {
            on_route_chosen: None,
            on_turn_start: None,
            on_text_delta: None,
            on_turn_complete: None,
            on_tool_executed: None,
            on_guardrail_failed: None,
            on_handoff: None,
            on_complete: None,
            on_error: None,
            body,
        }
    }

    /// Register the classification-decision callback, fired once with the
    /// resolved target's name before its stream is forwarded.
    #[must_use]
    pub fn on_route_chosen(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_route_chosen = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream.
    #[must_use]
    pub fn on_turn_start(mut self, f: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_turn_start = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream.
    #[must_use]
    pub fn on_text_delta(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_text_delta = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream.
    #[must_use]
    pub fn on_turn_complete(mut self, f: impl Fn(&ModelResponse) + Send + Sync + 'static) -> Self {
        self.on_turn_complete = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream.
    #[must_use]
    pub fn on_tool_executed(mut self, f: impl Fn(&ToolExecution) + Send + Sync + 'static) -> Self {
        self.on_tool_executed = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream.
    #[must_use]
    pub fn on_guardrail_failed(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_guardrail_failed = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream.
    #[must_use]
    pub fn on_handoff(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_handoff = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream. Also fired directly (with
    /// a `RouteUnavailable` error result) if classification itself yields no
    /// usable target.
    #[must_use]
    pub fn on_complete(mut self, f: impl Fn(&AgentResult) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Forwarded to the resolved target's stream. Also fired directly if
    /// classification itself yields no usable target.
    #[must_use]
    pub fn on_error(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Resolve the route, firing `onRouteChosen`, then drive the resolved
    /// target's own stream to completion. If no route resolves (no matching
    /// classification and no fallback), fires `onError`/`onComplete`
    /// directly with a `RouteUnavailable` error.
    pub async fn subscribe(self) -> AgentResult {
        match self.body.await {
            Ok((target, ctx)) => {
                if let Some(f) = &self.on_route_chosen {
                    let name = target.name().to_string();
                    invoke_guarded("onRouteChosen", || f(&name));
                }

                let mut stream: AgentStream = target.interact_stream(AgentInput::WithContext(ctx));
                if let Some(f) = self.on_turn_start {
                    stream = stream.on_turn_start(f);
                }
                if let Some(f) = self.on_text_delta {
                    stream = stream.on_text_delta(f);
                }
                if let Some(f) = self.on_turn_complete {
                    stream = stream.on_turn_complete(f);
                }
                if let Some(f) = self.on_tool_executed {
                    stream = stream.on_tool_executed(f);
                }
                if let Some(f) = self.on_guardrail_failed {
                    stream = stream.on_guardrail_failed(f);
                }
                if let Some(f) = self.on_handoff {
                    stream = stream.on_handoff(f);
                }
                if let Some(f) = self.on_complete {
                    stream = stream.on_complete(f);
                }
                if let Some(f) = self.on_error {
                    stream = stream.on_error(f);
                }
                stream.subscribe().await
            }
            Err(ctx) => {
                let result = AgentResult::Error { cause: AgentError::RouteUnavailable, context: ctx, turns_used: 0 };
                if let Some(f) = &self.on_error {
                    invoke_guarded("onError", || f("no route matched and no fallback configured"));
                }
                if let Some(f) = &self.on_complete {
                    invoke_guarded("onComplete", || f(&result));
                }
                result
            }
        }
    }
}
