#![deny(missing_docs)]
//! [`Context`] — the per-run state holder an [`Agent`](agentflow_proto) carries
//! through its turn loop.
//!
//! A `Context` is not thread-safe and is never shared across concurrent
//! runs: orchestrators that fan out to multiple children always hand each
//! child a [`Context::copy`], never the original.

use agentflow_proto::{InputItem, RequestId, SpanId, TraceId};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Per-run state: conversation history, a property bag, a turn counter, and
/// trace-correlation identifiers.
///
/// All mutators take `&mut self` and return `&mut Self` so callers can chain
/// a sequence of edits, e.g. `ctx.add_message(..).set_state(..)`.
#[derive(Debug, Clone, Default)]
pub struct Context {
    history: Vec<InputItem>,
    state: HashMap<String, serde_json::Value>,
    turn_count: u32,
    trace_id: Option<TraceId>,
    span_id: Option<SpanId>,
    request_id: Option<RequestId>,
}

impl Context {
    /// Create a fresh, empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with existing history.
    pub fn with_history(history: Vec<InputItem>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    /// Append one item to the history.
    pub fn add_message(&mut self, item: InputItem) -> &mut Self {
        self.history.push(item);
        self
    }

    /// Read-only view of the history in insertion order.
    pub fn history(&self) -> &[InputItem] {
        &self.history
    }

    /// A snapshot copy of the history. Mutating the returned `Vec` has no
    /// effect on this context.
    pub fn history_snapshot(&self) -> Vec<InputItem> {
        self.history.clone()
    }

    /// Set (or, with `None`, remove) a property-bag entry.
    pub fn set_state(&mut self, key: impl Into<String>, value: Option<serde_json::Value>) -> &mut Self {
        let key = key.into();
        match value {
            Some(v) => {
                self.state.insert(key, v);
            }
            None => {
                self.state.remove(&key);
            }
        }
        self
    }

    /// Raw JSON value for a property-bag key.
    pub fn get_state(&self, key: &str) -> Option<&serde_json::Value> {
        self.state.get(key)
    }

    /// Typed narrowing read. Returns `None` if the key is absent or the
    /// stored value doesn't decode as `T` (never panics on mismatch).
    pub fn get_state_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.state.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Whether a key is present in the property bag.
    pub fn has_state(&self, key: &str) -> bool {
        self.state.contains_key(key)
    }

    /// Read-only view of the whole property bag.
    pub fn all_state(&self) -> &HashMap<String, serde_json::Value> {
        &self.state
    }

    /// Increment the turn counter and return the new value.
    pub fn increment_turn(&mut self) -> u32 {
        self.turn_count += 1;
        self.turn_count
    }

    /// Current turn counter.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Deep-copy this context: history, state, turn count, and trace ids.
    /// The result is fully independent — mutating one is invisible to the
    /// other.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Derive a child context for a sub-run: same trace id, a fresh parent
    /// span id, the preserved request id, a copy of the state bag, and the
    /// turn counter reset to zero. History starts empty — a fork begins a
    /// new sub-conversation, it does not inherit the parent's transcript.
    pub fn fork(&self, new_span_id: SpanId) -> Self {
        Self {
            history: Vec::new(),
            state: self.state.clone(),
            turn_count: 0,
            trace_id: self.trace_id.clone(),
            span_id: Some(new_span_id),
            request_id: self.request_id.clone(),
        }
    }

    /// Reset history, state, and turn count; clear trace ids.
    pub fn clear(&mut self) -> &mut Self {
        self.history.clear();
        self.state.clear();
        self.turn_count = 0;
        self.trace_id = None;
        self.span_id = None;
        self
    }

    /// Attach trace-correlation identifiers.
    pub fn with_trace_context(&mut self, trace_id: TraceId, span_id: SpanId) -> &mut Self {
        self.trace_id = Some(trace_id);
        self.span_id = Some(span_id);
        self
    }

    /// Replace the span id, leaving trace id, history, and state untouched.
    /// Used by fan-out orchestrators that want each child to carry its own
    /// span identity over a [`copy`](Self::copy) of the parent context,
    /// rather than a [`fork`](Self::fork) that would also drop history.
    pub fn reset_span(&mut self, new_span_id: SpanId) -> &mut Self {
        self.span_id = Some(new_span_id);
        self
    }

    /// Attach a request correlation id.
    pub fn with_request_id(&mut self, id: RequestId) -> &mut Self {
        self.request_id = Some(id);
        self
    }

    /// Whether a trace id has been assigned.
    pub fn has_trace_context(&self) -> bool {
        self.trace_id.is_some()
    }

    /// The current trace id, if assigned.
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// The current span id, if assigned.
    pub fn span_id(&self) -> Option<&SpanId> {
        self.span_id.as_ref()
    }

    /// The request id, if assigned.
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Generate a root trace id and span id if none is set yet. Idempotent
    /// on a context that already has trace context.
    pub fn ensure_trace_context(&mut self) -> (&TraceId, &SpanId) {
        if self.trace_id.is_none() {
            self.trace_id = Some(TraceId::generate());
            self.span_id = Some(SpanId::generate());
        }
        (self.trace_id.as_ref().unwrap(), self.span_id.as_ref().unwrap())
    }
}
