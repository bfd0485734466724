//! Raw provider-level streaming events.
//!
//! These are the partial events a [`Provider::complete_stream`](crate::Provider)
//! implementation yields as the model generates a response. They are lower
//! level than `agentflow_agent::AgentStream`'s callbacks — when a run is
//! driven via `Agent::interact_stream`, the agent loop drains this stream
//! turn by turn, firing `onTextDelta` per [`ProviderEvent::TextDelta`] and
//! taking the terminal [`ProviderEvent::Complete`] as that turn's
//! [`ModelResponse`].

use crate::types::ModelResponse;
use futures::Stream;
use std::fmt;
use std::pin::Pin;

/// One partial event from a streaming model call.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// Incremental text content.
    TextDelta(String),
    /// Incremental tool-call arguments.
    FunctionCallDelta {
        /// Correlates deltas belonging to the same call.
        call_id: String,
        /// Tool name, present on the first delta for a call.
        name: Option<String>,
        /// Incremental JSON-arguments text.
        arguments_delta: String,
    },
    /// The response is complete; carries the fully assembled response.
    Complete(ModelResponse),
    /// A transport or decode error occurred mid-stream.
    Error(String),
}

/// A boxed stream of [`ProviderEvent`]s.
pub struct ProviderEventStream(Pin<Box<dyn Stream<Item = ProviderEvent> + Send>>);

impl ProviderEventStream {
    /// Wrap any `Stream<Item = ProviderEvent>` into a `ProviderEventStream`.
    pub fn new(stream: impl Stream<Item = ProviderEvent> + Send + 'static) -> Self {
        Self(Box::pin(stream))
    }

    /// The inner pinned stream.
    pub fn into_inner(self) -> Pin<Box<dyn Stream<Item = ProviderEvent> + Send>> {
        self.0
    }
}

impl fmt::Debug for ProviderEventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderEventStream").finish_non_exhaustive()
    }
}

impl Stream for ProviderEventStream {
    type Item = ProviderEvent;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.0.as_mut().poll_next(cx)
    }
}
