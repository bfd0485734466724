#![deny(missing_docs)]
//! Model client adapter contract for agentflow.
//!
//! The HTTP transport, retry policy, and provider selection are explicitly
//! out of scope here — this crate only defines the contract: request
//! assembly ([`types::ModelRequest`]), response parsing ([`types::parse_response`]),
//! the [`provider::Provider`] trait itself, and the streaming event
//! vocabulary ([`stream::ProviderEvent`]).

pub mod provider;
pub mod stream;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use provider::{Provider, ProviderError};
pub use stream::{ProviderEvent, ProviderEventStream};
pub use types::{ModelRequest, ModelResponse, OutputItem, ResponseStatus, TraceAttributes, Usage};
