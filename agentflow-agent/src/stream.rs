//! [`AgentStream`] — the observer façade that turns a run into callbacks.
//!
//! Handlers are stored behind a shared `Mutex` so the chainable setters
//! (`on_turn_start`, `on_text_delta`, ...) can be registered on the value
//! returned by `interact_stream` before the underlying run — already queued
//! as a boxed future — is driven by [`AgentStream::subscribe`]. Each setter
//! takes and returns `Self`: same handler map, same stream, just chained.
//!
//! A callback that panics is caught and logged rather than aborting the
//! run — this is the Rust analogue of "stream callback exceptions are
//! swallowed."

use crate::interactable::{AgentInput, Interactable};
use crate::result::{AgentResult, ToolExecution};
use agentflow_provider::ModelResponse;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

type Handler<Args> = Box<dyn Fn(Args) + Send + Sync>;
// Higher-ranked over the borrow (`for<'a> Fn(&'a str)`, the implicit shape
// of a bare `&str` in a `dyn Fn` bound) rather than `Handler<&'static str>`:
// callbacks only ever need the chunk for the duration of the call, so no
// `'static` string needs to be manufactured (and leaked) to satisfy them.
type StrHandler = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub(crate) struct StreamHandlers {
    on_turn_start: Option<Handler<u32>>,
    on_text_delta: Option<StrHandler>,
    on_turn_complete: Option<Box<dyn Fn(&ModelResponse) + Send + Sync>>,
    on_tool_executed: Option<Box<dyn Fn(&ToolExecution) + Send + Sync>>,
    on_guardrail_failed: Option<StrHandler>,
    on_handoff: Option<StrHandler>,
    on_complete: Option<Box<dyn Fn(&AgentResult) + Send + Sync>>,
    on_error: Option<StrHandler>,
}

fn invoke_guarded(label: &str, f: impl FnOnce()) {
    if std::panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!(callback = label, "AgentStream callback panicked; suppressed");
    }
}

pub(crate) fn fire_turn_start(handlers: &Mutex<StreamHandlers>, turn_index: u32) {
    if let Some(f) = handlers.lock().unwrap().on_turn_start.as_ref() {
        invoke_guarded("onTurnStart", || f(turn_index));
    }
}

pub(crate) fn fire_text_delta(handlers: &Mutex<StreamHandlers>, chunk: &str) {
    if let Some(f) = handlers.lock().unwrap().on_text_delta.as_ref() {
        invoke_guarded("onTextDelta", || f(chunk));
    }
}

pub(crate) fn fire_turn_complete(handlers: &Mutex<StreamHandlers>, response: &ModelResponse) {
    if let Some(f) = handlers.lock().unwrap().on_turn_complete.as_ref() {
        invoke_guarded("onTurnComplete", || f(response));
    }
}

pub(crate) fn fire_tool_executed(handlers: &Mutex<StreamHandlers>, execution: &ToolExecution) {
    if let Some(f) = handlers.lock().unwrap().on_tool_executed.as_ref() {
        invoke_guarded("onToolExecuted", || f(execution));
    }
}

pub(crate) fn fire_guardrail_failed(handlers: &Mutex<StreamHandlers>, reason: &str) {
    if let Some(f) = handlers.lock().unwrap().on_guardrail_failed.as_ref() {
        invoke_guarded("onGuardrailFailed", || f(reason));
    }
}

pub(crate) fn fire_handoff(handlers: &Mutex<StreamHandlers>, target: &str) {
    if let Some(f) = handlers.lock().unwrap().on_handoff.as_ref() {
        invoke_guarded("onHandoff", || f(target));
    }
}

pub(crate) fn fire_complete(handlers: &Mutex<StreamHandlers>, result: &AgentResult) {
    if let Some(f) = handlers.lock().unwrap().on_complete.as_ref() {
        invoke_guarded("onComplete", || f(result));
    }
}

pub(crate) fn fire_error(handlers: &Mutex<StreamHandlers>, message: &str) {
    if let Some(f) = handlers.lock().unwrap().on_error.as_ref() {
        invoke_guarded("onError", || f(message));
    }
}

enum StreamBody {
    PreFailed(AgentResult),
    Live(Pin<Box<dyn Future<Output = AgentResult> + Send>>),
}

/// Observer over one run. Chain `on_*` setters to register callbacks, then
/// call [`AgentStream::subscribe`] to drive the run to completion.
pub struct AgentStream {
    pub(crate) handlers: Arc<Mutex<StreamHandlers>>,
    body: StreamBody,
}

impl AgentStream {
    pub(crate) fn live(handlers: Arc<Mutex<StreamHandlers>>, fut: Pin<Box<dyn Future<Output = AgentResult> + Send>>) -> Self {
        Self { handlers, body: StreamBody::Live(fut) }
    }

    /// A pre-failed stream: once subscribed, immediately delivers `onError`
    /// then `onComplete` with `result` — used when a preconditional failure
    /// occurs before any model call would have been issued.
    pub fn failed(result: AgentResult) -> Self {
        Self {
            handlers: Arc::new(Mutex::new(StreamHandlers::default())),
            body: StreamBody::PreFailed(result),
        }
    }

    /// Register a turn-start callback. Returns `self` — same stream,
    /// chainable.
    #[must_use]
    pub fn on_turn_start(self, f: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_turn_start = Some(Box::new(f));
        self
    }

    /// Register a text-delta callback.
    #[must_use]
    pub fn on_text_delta(self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_text_delta = Some(Box::new(f));
        self
    }

    /// Register a turn-complete callback.
    #[must_use]
    pub fn on_turn_complete(self, f: impl Fn(&ModelResponse) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_turn_complete = Some(Box::new(f));
        self
    }

    /// Register a tool-executed callback.
    #[must_use]
    pub fn on_tool_executed(self, f: impl Fn(&ToolExecution) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_tool_executed = Some(Box::new(f));
        self
    }

    /// Register a guardrail-failed callback.
    #[must_use]
    pub fn on_guardrail_failed(self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_guardrail_failed = Some(Box::new(f));
        self
    }

    /// Register a handoff callback.
    #[must_use]
    pub fn on_handoff(self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_handoff = Some(Box::new(f));
        self
    }

    /// Register the terminal-result callback.
    #[must_use]
    pub fn on_complete(self, f: impl Fn(&AgentResult) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_complete = Some(Box::new(f));
        self
    }

    /// Register the error callback.
    #[must_use]
    pub fn on_error(self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.handlers.lock().unwrap().on_error = Some(Box::new(f));
        self
    }

    /// Drive the run, firing registered callbacks as events occur, and
    /// return the terminal result.
    pub async fn subscribe(self) -> AgentResult {
        match self.body {
            StreamBody::PreFailed(result) => {
                if let AgentResult::Error { cause, .. } = &result {
                    fire_error(&self.handlers, &cause.to_string());
                }
                fire_complete(&self.handlers, &result);
                result
            }
            StreamBody::Live(fut) => fut.await,
        }
    }
}

/// Gives any `Arc<dyn Interactable>` a default `AgentStream`: one that fires
/// no incremental events (no target-internal turn/text-delta granularity is
/// visible past the `Interactable` boundary) but delivers `onError`
/// (if the run errors) then `onComplete` once `interact` resolves. `Agent`
/// keeps its own inherent `interact_stream` for real per-token streaming;
/// this exists so generic orchestration code that only holds an `Arc<dyn
/// Interactable>` — e.g. `agentflow_orch::RouterStream` forwarding whatever a
/// route resolves to — can still produce a stream uniformly.
pub trait InteractableStream {
    /// Wrap one `interact` call as an [`AgentStream`].
    fn interact_stream(self: Arc<Self>, input: AgentInput) -> AgentStream;
}

impl InteractableStream for dyn Interactable {
    fn interact_stream(self: Arc<Self>, input: AgentInput) -> AgentStream {
        let handlers: Arc<Mutex<StreamHandlers>> = Arc::default();
        let handlers_for_run = Arc::clone(&handlers);
        let fut = Box::pin(async move {
            let result = self.interact(input).await;
            if let AgentResult::Error { cause, .. } = &result {
                fire_error(&handlers_for_run, &cause.to_string());
            }
            fire_complete(&handlers_for_run, &result);
            result
        });
        AgentStream::live(handlers, fut)
    }
}
