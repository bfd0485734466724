//! Per-agent configuration.

/// Generation parameters and identity for one [`crate::Agent`].
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Human-readable name, used in logs and orchestrator error summaries.
    pub name: String,
    /// Model identifier submitted with every request.
    pub model: String,
    /// System/developer instructions for this agent.
    pub instructions: String,
    /// Maximum ReAct loop iterations before `TurnBudgetExceeded`.
    pub max_turns: u32,
    /// Sampling temperature, if set.
    pub temperature: Option<f64>,
    /// Maximum tokens the model may generate per turn.
    pub max_output_tokens: Option<u32>,
    /// Opaque metadata threaded through to the model client.
    pub metadata: serde_json::Value,
}

impl AgentConfig {
    /// Build a config with the given name and model, defaults otherwise.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            instructions: String::new(),
            max_turns: Self::DEFAULT_MAX_TURNS,
            temperature: None,
            max_output_tokens: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Default turn budget, matching the upstream ReAct operator default.
    pub const DEFAULT_MAX_TURNS: u32 = 25;

    /// Set the instructions (chainable).
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Set the turn budget (chainable).
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set the sampling temperature (chainable).
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}
