//! A flat store of named blueprint nodes, so composite nodes can reference
//! children by id instead of owning them — the same worker can sit under
//! two supervisors, or be a router's fallback and a network peer at once.

use std::collections::HashMap;

use crate::types::Blueprint;
use crate::BlueprintError;

/// Named blueprint nodes plus the id of the tree's entry point.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BlueprintArena {
    /// All nodes in the tree, keyed by the id composite nodes reference.
    pub nodes: HashMap<String, Blueprint>,
    /// The id to resolve first.
    pub root: String,
}

impl BlueprintArena {
    /// An arena with a single node as its own root.
    pub fn single(id: impl Into<String>, node: Blueprint) -> Self {
        let id = id.into();
        let mut nodes = HashMap::new();
        nodes.insert(id.clone(), node);
        Self { nodes, root: id }
    }

    /// Insert a node under `id`, overwriting any prior entry.
    pub fn insert(&mut self, id: impl Into<String>, node: Blueprint) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// The root node, or [`BlueprintError::DanglingReference`] if `root`
    /// itself isn't populated.
    pub fn root_node(&self) -> Result<&Blueprint, BlueprintError> {
        self.get(&self.root)
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Result<&Blueprint, BlueprintError> {
        self.nodes
            .get(id)
            .ok_or_else(|| BlueprintError::DanglingReference(id.to_string()))
    }

    /// Every id reachable from `root` is present in `nodes`, and every
    /// `responder` invariant holds. Does not check guardrail/tool
    /// references — that happens in [`crate::resolve`], where a live
    /// registry and tool list are available.
    pub fn validate(&self) -> Result<(), BlueprintError> {
        let mut seen = std::collections::HashSet::new();
        self.walk(&self.root, &mut seen)
    }

    fn walk(
        &self,
        id: &str,
        seen: &mut std::collections::HashSet<String>,
    ) -> Result<(), BlueprintError> {
        if !seen.insert(id.to_string()) {
            return Ok(());
        }
        let node = self.get(id)?;
        match node {
            Blueprint::Agent(b) => {
                b.responder.validate()?;
                for h in &b.handoffs {
                    self.walk(h, seen)?;
                }
            }
            Blueprint::Network(b) => {
                for p in &b.peers {
                    self.walk(p, seen)?;
                }
                if let Some(s) = &b.synthesizer {
                    self.walk(s, seen)?;
                }
            }
            Blueprint::Supervisor(b) => {
                b.responder.validate()?;
                for w in &b.workers {
                    self.walk(&w.target, seen)?;
                }
            }
            Blueprint::Parallel(b) => {
                for c in &b.children {
                    self.walk(c, seen)?;
                }
                if let Some(s) = &b.synthesizer {
                    self.walk(s, seen)?;
                }
            }
            Blueprint::Router(b) => {
                b.responder.validate()?;
                for r in &b.routes {
                    self.walk(&r.target, seen)?;
                }
                if let Some(f) = &b.fallback {
                    self.walk(f, seen)?;
                }
            }
            Blueprint::Hierarchical(b) => {
                b.responder.validate()?;
                for d in &b.departments {
                    self.walk(&d.target, seen)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentBlueprint, ResponderBlueprint};

    fn leaf(name: &str) -> Blueprint {
        Blueprint::Agent(AgentBlueprint {
            name: name.to_string(),
            instructions: "be helpful".to_string(),
            max_turns: None,
            temperature: None,
            max_output_tokens: None,
            tools: vec![],
            input_guardrails: vec![],
            output_guardrails: vec![],
            handoffs: vec![],
            responder: ResponderBlueprint {
                provider: Some("mock".to_string()),
                ..Default::default()
            },
        })
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut arena = BlueprintArena::single("root", leaf("root"));
        if let Blueprint::Agent(b) = arena.nodes.get_mut("root").unwrap() {
            b.handoffs.push("missing".to_string());
        }
        assert!(matches!(
            arena.validate(),
            Err(BlueprintError::DanglingReference(_))
        ));
    }

    #[test]
    fn shared_subtree_validates_once() {
        let mut arena = BlueprintArena::single("root", leaf("root"));
        arena.insert("shared", leaf("shared"));
        if let Blueprint::Agent(b) = arena.nodes.get_mut("root").unwrap() {
            b.handoffs.push("shared".to_string());
        }
        assert!(arena.validate().is_ok());
    }

    #[test]
    fn missing_responder_is_rejected() {
        let mut arena = BlueprintArena::single("root", leaf("root"));
        if let Blueprint::Agent(b) = arena.nodes.get_mut("root").unwrap() {
            b.responder = ResponderBlueprint::default();
        }
        assert!(matches!(
            arena.validate(),
            Err(BlueprintError::MissingResponder)
        ));
    }
}
