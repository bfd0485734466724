#![deny(missing_docs)]
//! Input and output guardrails.
//!
//! A guardrail is a host-side predicate that vetoes input before it reaches
//! the model, or output before it reaches the caller. Unlike a hook, a
//! guardrail has exactly one opinion to offer: [`GuardrailResult::Passed`]
//! or [`GuardrailResult::Failed`] — there is no warn-and-continue tier.
//!
//! Guardrail traits use return-position `impl Future` so implementations
//! stay allocation-free; [`ErasedInputGuardrail`]/[`ErasedOutputGuardrail`]
//! provide the dyn-compatible wrapper an [`agentflow_context::Context`]-aware
//! agent needs to hold a heterogeneous `Vec` of them.

use agentflow_context::Context;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, OnceLock};

/// Result of a guardrail check. `Passed` is a zero-sized singleton; `Failed`
/// always carries a non-blank reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardrailResult {
    /// Input/output is acceptable.
    Passed,
    /// Reject with a human-readable reason. Never blank.
    Failed(String),
}

impl GuardrailResult {
    /// The `Passed` singleton.
    pub fn passed() -> Self {
        Self::Passed
    }

    /// Build a `Failed` result.
    ///
    /// # Panics
    ///
    /// Panics if `reason` is empty or all whitespace — a guardrail author
    /// error, not a runtime condition.
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        assert!(!reason.trim().is_empty(), "guardrail failure reason must not be blank");
        Self::Failed(reason)
    }

    /// `true` for `Passed`.
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// The failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed(r) => Some(r),
            Self::Passed => None,
        }
    }
}

/// Guardrail evaluated against the most recent user text before a model call.
pub trait InputGuardrail: Send + Sync {
    /// Check `input` in light of the run's `ctx`.
    fn check(&self, input: &str, ctx: &Context) -> impl Future<Output = GuardrailResult> + Send;
}

/// Guardrail evaluated against the final assistant text before it is
/// returned to the caller.
pub trait OutputGuardrail: Send + Sync {
    /// Check `output` in light of the run's `ctx`.
    fn check(&self, output: &str, ctx: &Context) -> impl Future<Output = GuardrailResult> + Send;
}

/// Dyn-compatible wrapper for [`InputGuardrail`] (RPITIT traits aren't
/// object-safe on their own).
pub trait ErasedInputGuardrail: Send + Sync {
    /// Check input, returning a boxed future.
    fn check_dyn<'a>(
        &'a self,
        input: &'a str,
        ctx: &'a Context,
    ) -> Pin<Box<dyn Future<Output = GuardrailResult> + Send + 'a>>;
}

impl<T: InputGuardrail> ErasedInputGuardrail for T {
    fn check_dyn<'a>(
        &'a self,
        input: &'a str,
        ctx: &'a Context,
    ) -> Pin<Box<dyn Future<Output = GuardrailResult> + Send + 'a>> {
        Box::pin(self.check(input, ctx))
    }
}

/// Dyn-compatible wrapper for [`OutputGuardrail`].
pub trait ErasedOutputGuardrail: Send + Sync {
    /// Check output, returning a boxed future.
    fn check_dyn<'a>(
        &'a self,
        output: &'a str,
        ctx: &'a Context,
    ) -> Pin<Box<dyn Future<Output = GuardrailResult> + Send + 'a>>;
}

impl<T: OutputGuardrail> ErasedOutputGuardrail for T {
    fn check_dyn<'a>(
        &'a self,
        output: &'a str,
        ctx: &'a Context,
    ) -> Pin<Box<dyn Future<Output = GuardrailResult> + Send + 'a>> {
        Box::pin(self.check(output, ctx))
    }
}

/// Run input guardrails in order, returning the first non-`Passed` result,
/// or `Passed` if all of them pass (including the empty list).
pub async fn run_input_guardrails(
    guardrails: &[Arc<dyn ErasedInputGuardrail>],
    input: &str,
    ctx: &Context,
) -> GuardrailResult {
    for g in guardrails {
        let result = g.check_dyn(input, ctx).await;
        if !result.is_passed() {
            return result;
        }
    }
    GuardrailResult::Passed
}

/// Run output guardrails in order, returning the first non-`Passed` result.
pub async fn run_output_guardrails(
    guardrails: &[Arc<dyn ErasedOutputGuardrail>],
    output: &str,
    ctx: &Context,
) -> GuardrailResult {
    for g in guardrails {
        let result = g.check_dyn(output, ctx).await;
        if !result.is_passed() {
            return result;
        }
    }
    GuardrailResult::Passed
}

/// Process-wide registry resolving a blueprint's symbolic guardrail
/// references back to live predicates.
///
/// Required only for blueprint round-trip (§4.7) — agents built directly in
/// code can use guardrails without ever touching the registry. Tests that
/// need isolation should call [`GuardrailRegistry::clear`] between cases.
#[derive(Default)]
pub struct GuardrailRegistry {
    inputs: Mutex<HashMap<String, Arc<dyn ErasedInputGuardrail>>>,
    outputs: Mutex<HashMap<String, Arc<dyn ErasedOutputGuardrail>>>,
}

static REGISTRY: OnceLock<GuardrailRegistry> = OnceLock::new();

impl GuardrailRegistry {
    /// The single process-wide instance.
    pub fn global() -> &'static GuardrailRegistry {
        REGISTRY.get_or_init(GuardrailRegistry::default)
    }

    /// Register an input guardrail under `id`, overwriting any prior entry.
    pub fn register_input(&self, id: impl Into<String>, guardrail: Arc<dyn ErasedInputGuardrail>) {
        self.inputs.lock().unwrap().insert(id.into(), guardrail);
    }

    /// Register an output guardrail under `id`, overwriting any prior entry.
    pub fn register_output(&self, id: impl Into<String>, guardrail: Arc<dyn ErasedOutputGuardrail>) {
        self.outputs.lock().unwrap().insert(id.into(), guardrail);
    }

    /// Look up a previously-registered input guardrail.
    pub fn resolve_input(&self, id: &str) -> Option<Arc<dyn ErasedInputGuardrail>> {
        self.inputs.lock().unwrap().get(id).cloned()
    }

    /// Look up a previously-registered output guardrail.
    pub fn resolve_output(&self, id: &str) -> Option<Arc<dyn ErasedOutputGuardrail>> {
        self.outputs.lock().unwrap().get(id).cloned()
    }

    /// Drop every registered guardrail. Intended for test reset.
    pub fn clear(&self) {
        self.inputs.lock().unwrap().clear();
        self.outputs.lock().unwrap().clear();
    }
}

/// Register an input guardrail under `id` in the global registry and return
/// a handle usable directly on an agent's guardrail list.
pub fn named_input<G: InputGuardrail + 'static>(
    id: impl Into<String>,
    guardrail: G,
) -> Arc<dyn ErasedInputGuardrail> {
    let arc: Arc<dyn ErasedInputGuardrail> = Arc::new(guardrail);
    GuardrailRegistry::global().register_input(id, Arc::clone(&arc));
    arc
}

/// Register an output guardrail under `id` in the global registry and
/// return a handle usable directly on an agent's guardrail list.
pub fn named_output<G: OutputGuardrail + 'static>(
    id: impl Into<String>,
    guardrail: G,
) -> Arc<dyn ErasedOutputGuardrail> {
    let arc: Arc<dyn ErasedOutputGuardrail> = Arc::new(guardrail);
    GuardrailRegistry::global().register_output(id, Arc::clone(&arc));
    arc
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BlocksSubstring(&'static str);

    impl InputGuardrail for BlocksSubstring {
        fn check(&self, input: &str, _ctx: &Context) -> impl Future<Output = GuardrailResult> + Send {
            let hit = input.contains(self.0);
            async move {
                if hit {
                    GuardrailResult::failed(format!("contains blocked substring {:?}", self.0))
                } else {
                    GuardrailResult::passed()
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "blank")]
    fn failed_rejects_blank_reason() {
        GuardrailResult::failed("   ");
    }

    #[test]
    fn passed_is_a_singleton_value() {
        assert_eq!(GuardrailResult::passed(), GuardrailResult::Passed);
    }

    #[tokio::test]
    async fn first_failure_short_circuits() {
        let ctx = Context::new();
        let guardrails: Vec<Arc<dyn ErasedInputGuardrail>> = vec![
            Arc::new(BlocksSubstring("blocked")),
            Arc::new(BlocksSubstring("never-reached")),
        ];
        let result = run_input_guardrails(&guardrails, "this text is blocked", &ctx).await;
        assert!(!result.is_passed());
        assert!(result.reason().unwrap().contains("blocked"));
    }

    #[tokio::test]
    async fn all_pass_returns_passed() {
        let ctx = Context::new();
        let guardrails: Vec<Arc<dyn ErasedInputGuardrail>> = vec![Arc::new(BlocksSubstring("blocked"))];
        let result = run_input_guardrails(&guardrails, "clean text", &ctx).await;
        assert_eq!(result, GuardrailResult::Passed);
    }

    #[tokio::test]
    async fn named_registers_and_resolves() {
        GuardrailRegistry::global().clear();
        named_input("no-blocked", BlocksSubstring("blocked"));
        assert!(GuardrailRegistry::global().resolve_input("no-blocked").is_some());
        assert!(GuardrailRegistry::global().resolve_input("missing").is_none());
    }
}
