#![deny(missing_docs)]
//! Composite [`agentflow_agent::Interactable`] orchestrators.
//!
//! Every orchestrator here implements `Interactable` itself, so they
//! compose: a `SupervisorAgent` can be a `ParallelAgents` worker, a
//! `RouterAgent` target can be a `HierarchicalAgents` department manager,
//! and so on.

mod delegate;
pub mod hierarchical;
pub mod network;
pub mod parallel;
pub mod router;
pub mod supervisor;

pub use hierarchical::HierarchicalAgents;
pub use network::AgentNetwork;
pub use parallel::{ParallelAgents, RunInput};
pub use router::{RouterAgent, RouterAgentBuilder, RouterStream};
pub use supervisor::SupervisorAgent;
