#![deny(missing_docs)]
//! The agentic loop.
//!
//! [`Agent`] drives one request to a terminal [`AgentResult`]: ensure trace
//! context, run input guardrails once, then loop over model calls,
//! interpreting each response's output items (assistant text, tool calls,
//! handoffs) until the run terminates. [`Interactable`] is the shared
//! boundary this crate's `Agent` and every orchestrator in `agentflow-orch`
//! implement, so they can be composed interchangeably.

pub mod agent;
pub mod config;
pub mod interactable;
pub mod result;
pub mod stream;

pub use agent::{Agent, HandoffDescriptor};
pub use config::AgentConfig;
pub use interactable::{AgentInput, Interactable};
pub use result::{AgentResult, PendingToolCall, ToolExecution, ToolOutcome};
pub use stream::{AgentStream, InteractableStream};
