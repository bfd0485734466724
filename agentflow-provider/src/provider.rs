//! The [`Provider`] trait — the boundary between the agent loop and a
//! remote model endpoint.

use crate::types::{ModelRequest, ModelResponse};
use std::future::Future;
use thiserror::Error;

/// Errors from a provider call. The HTTP transport, retries, and backoff
/// live outside this crate — a `Provider` implementation owns that and maps
/// failures down to this taxonomy.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-level failure (connection, TLS, DNS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider rejected the request as malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The provider is rate-limiting the caller.
    #[error("rate limited{}", retry_after_ms.map(|ms| format!(", retry after {ms}ms")).unwrap_or_default())]
    RateLimited {
        /// Suggested backoff, if the provider supplied one.
        retry_after_ms: Option<u64>,
    },

    /// The call did not complete within its deadline.
    #[error("timed out")]
    Timeout,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Whether retrying the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::RateLimited { .. } | Self::Timeout)
    }
}

/// The model client adapter contract.
///
/// Implementations own the HTTP transport, authentication, retry policy,
/// and provider selection — all explicitly out of scope for this crate.
/// `complete` is the synchronous-request form; `complete_stream` is the
/// event-stream form. When an agent is driven via `Agent::interact_stream`,
/// the agent loop prefers `complete_stream` for each turn, forwarding
/// `ProviderEvent::TextDelta`s to `AgentStream`'s `onTextDelta` as they
/// arrive and falling back to `complete` for providers that don't override
/// the default `complete_stream`.
pub trait Provider: Send + Sync {
    /// Submit a request and await the complete response.
    fn complete(&self, request: ModelRequest) -> impl Future<Output = Result<ModelResponse, ProviderError>> + Send;

    /// Submit a request and receive a stream of partial events. The default
    /// implementation reports the provider as stream-incapable; providers
    /// that support streaming override it.
    fn complete_stream(
        &self,
        request: ModelRequest,
    ) -> impl Future<Output = Result<crate::stream::ProviderEventStream, ProviderError>> + Send {
        async move {
            let _ = request;
            Err(ProviderError::Other("this provider does not support streaming".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ProviderError::Transport("x".into()).is_retryable());
        assert!(ProviderError::RateLimited { retry_after_ms: None }.is_retryable());
        assert!(ProviderError::Timeout.is_retryable());
        assert!(!ProviderError::InvalidRequest("x".into()).is_retryable());
        assert!(!ProviderError::Other("x".into()).is_retryable());
    }
}
