//! A scripted [`Provider`] for tests, behind the `test-utils` feature.
//!
//! Returns one queued response per call, in order, so a test can script a
//! multi-turn exchange (e.g. a `function_call` followed by a `message`).

use crate::provider::{Provider, ProviderError};
use crate::stream::{ProviderEvent, ProviderEventStream};
use crate::types::{ModelRequest, ModelResponse};
use std::future::Future;
use std::sync::Mutex;

/// Replays a fixed sequence of responses, one per `complete` call.
pub struct ScriptedProvider {
    responses: Mutex<Vec<Result<ModelResponse, ProviderError>>>,
    calls: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    /// Build a provider that yields `responses` in order, one per call.
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).rev().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of `complete` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Provider for ScriptedProvider {
    fn complete(&self, request: ModelRequest) -> impl Future<Output = Result<ModelResponse, ProviderError>> + Send {
        self.calls.lock().unwrap().push(request);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ProviderError::Other("ScriptedProvider exhausted".into())));
        async move { next }
    }

    /// Synthesizes a stream from the same scripted response `complete` would
    /// have returned: one `TextDelta` per word of each `Message` output item,
    /// then a terminal `Complete` carrying the full response. Lets tests
    /// exercise `Agent::interact_stream` without a provider that streams for
    /// real.
    fn complete_stream(
        &self,
        request: ModelRequest,
    ) -> impl Future<Output = Result<ProviderEventStream, ProviderError>> + Send {
        self.calls.lock().unwrap().push(request);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(ProviderError::Other("ScriptedProvider exhausted".into())));
        async move {
            let response = next?;
            let mut events = Vec::new();
            for item in &response.output {
                if let crate::types::OutputItem::Message { text, .. } = item {
                    for word in text.split_inclusive(' ') {
                        events.push(ProviderEvent::TextDelta(word.to_string()));
                    }
                }
            }
            events.push(ProviderEvent::Complete(response));
            Ok(ProviderEventStream::new(futures::stream::iter(events)))
        }
    }
}
