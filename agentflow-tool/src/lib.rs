#![deny(missing_docs)]
//! Tool interface and registry for agentflow.
//!
//! Defines the object-safe [`ToolDyn`] trait, the [`FnTool`] adapter that
//! ships its own typed argument decoder (no runtime reflection), and
//! [`ToolStore`] for dispatching model-requested calls. Decode failures and
//! missing tools are never exceptions — [`ToolStore::dispatch`] always
//! returns an `InputItem::ToolOutput`, success or error, so the agent loop
//! can feed it straight back to the model.

use agentflow_proto::InputItem;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by tool invocation. These never propagate out of
/// [`ToolStore::dispatch`] as a `Result::Err` — they are converted to a
/// `ToolOutput` error payload instead.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool registered under the requested name.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// `argsJson` did not decode into the tool's parameter type.
    #[error("tool argument decode failed: {0}")]
    ToolDecodeError(String),

    /// The tool ran and reported failure.
    #[error("tool invocation failed: {0}")]
    ToolInvocationError(String),
}

/// JSON-schema description of a tool, shaped for inclusion in a model
/// request's tool list.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    /// The tool's unique name.
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// JSON Schema for the tool's parameters.
    pub parameters: serde_json::Value,
}

/// Object-safe tool trait. Implementations are stored as `Arc<dyn ToolDyn>`
/// in a [`ToolStore`].
pub trait ToolDyn: Send + Sync {
    /// Unique name, non-empty within a store.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Decode `args_json` and invoke the tool.
    fn call(
        &self,
        args_json: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>>;
}

/// Adapts a plain async function into a [`ToolDyn`], decoding its JSON
/// arguments into `Args` and its return value from `Out` — the decoder is
/// fixed at registration time, not resolved by reflection at call time.
pub struct FnTool<F, Args, Out> {
    name: String,
    description: String,
    schema: serde_json::Value,
    func: F,
    _marker: PhantomData<fn(Args) -> Out>,
}

impl<F, Fut, Args, Out> FnTool<F, Args, Out>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Out, String>> + Send + 'static,
    Args: DeserializeOwned,
    Out: Serialize,
{
    /// Build a new typed tool.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: serde_json::Value,
        func: F,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            func,
            _marker: PhantomData,
        }
    }
}

impl<F, Fut, Args, Out> ToolDyn for FnTool<F, Args, Out>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Out, String>> + Send + 'static,
    Args: DeserializeOwned,
    Out: Serialize,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> serde_json::Value {
        self.schema.clone()
    }

    fn call(
        &self,
        args_json: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let args: Args = serde_json::from_value(args_json)
                .map_err(|e| ToolError::ToolDecodeError(e.to_string()))?;
            let out = (self.func)(args)
                .await
                .map_err(ToolError::ToolInvocationError)?;
            serde_json::to_value(out).map_err(|e| ToolError::ToolInvocationError(e.to_string()))
        })
    }
}

/// Maps tool names to tools and performs dispatch-by-name.
#[derive(Default)]
pub struct ToolStore {
    tools: HashMap<String, Arc<dyn ToolDyn>>,
}

impl ToolStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Overwrites any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn ToolDyn>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolDyn>> {
        self.tools.get(name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the store has no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Schemas for every registered tool, in an unspecified but stable
    /// order — suitable for inclusion in a model request's tool list.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.input_schema(),
            })
            .collect()
    }

    /// Resolve `name`, decode `args_json`, invoke, and package the result as
    /// a `ToolOutput` history item. Never returns an error — a missing tool
    /// or a decode/invocation failure becomes an error payload instead.
    pub async fn dispatch(&self, call_id: &str, name: &str, args_json: serde_json::Value) -> InputItem {
        let Some(tool) = self.tools.get(name) else {
            return InputItem::tool_output_err(
                call_id,
                serde_json::json!({"error": ToolError::ToolNotFound(name.to_string()).to_string()}),
            );
        };
        match tool.call(args_json).await {
            Ok(value) => InputItem::tool_output_ok(call_id, value),
            Err(err) => InputItem::tool_output_err(call_id, serde_json::json!({"error": err.to_string()})),
        }
    }
}
