#![deny(missing_docs)]
//! Core wire types shared by every agentflow crate.
//!
//! This crate has no notion of "agent" or "orchestrator" — it only defines
//! the vocabulary they all speak: history items ([`content::InputItem`]),
//! trace correlation identifiers ([`trace`]), a stable duration wire format
//! ([`duration::DurationMs`]), and the fatal error taxonomy ([`error::AgentError`]).

pub mod content;
pub mod duration;
pub mod error;
pub mod trace;

pub use content::InputItem;
pub use duration::DurationMs;
pub use error::AgentError;
pub use trace::{InvalidSpanId, InvalidTraceId, RequestId, SpanId, TraceId};
