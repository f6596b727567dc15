//! Ahead-of-time compiled predicates for a whole graph, serialized with
//! bincode so they can be cached on disk or shipped to another process.

use super::definition::{NodeConfig, WorkflowGraph};
use crate::error::ArtifactError;
use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// One predicate's compiled logic, addressed by its place in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledPredicate {
    pub node_id: String,
    pub outcome_id: String,
    pub predicate_id: String,
    pub target_field: Option<String>,
    pub logic: Logic,
}

/// Every predicate of a workflow graph compiled into portable logic form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledWorkflow {
    pub workflow_id: String,
    pub predicates: Vec<CompiledPredicate>,
}

impl CompiledWorkflow {
    /// Compiles every rule-bearing predicate in the graph. Predicates with
    /// an empty rule list compile to nothing ("always valid") and are
    /// omitted.
    pub fn compile(graph: &WorkflowGraph) -> Self {
        let mut predicates = Vec::new();
        for node in &graph.nodes {
            let outcomes: Vec<_> = match &node.config {
                NodeConfig::Decision(cfg) => cfg.outcomes.iter().collect(),
                NodeConfig::IfElse(cfg) => vec![&cfg.condition],
                _ => Vec::new(),
            };
            for outcome in outcomes {
                for predicate in &outcome.predicates {
                    if let Some(logic) = predicate.effective_logic() {
                        predicates.push(CompiledPredicate {
                            node_id: node.id.clone(),
                            outcome_id: outcome.id.clone(),
                            predicate_id: predicate.id.clone(),
                            target_field: predicate.target_field.clone(),
                            logic,
                        });
                    }
                }
            }
        }
        CompiledWorkflow {
            workflow_id: graph.id.clone(),
            predicates,
        }
    }

    /// Serializes the compiled set to bytes using the bincode format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| ArtifactError::Encode(e.to_string()))
    }

    /// Deserializes a compiled set from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map(|(artifact, _)| artifact)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }

    /// Saves the compiled set to a file.
    pub fn save(&self, path: &str) -> Result<(), ArtifactError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            source: e,
        })
    }

    /// Loads a compiled set from a file.
    pub fn from_file(path: &str) -> Result<Self, ArtifactError> {
        let mut file = fs::File::open(path).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            source: e,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| ArtifactError::Io {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_bytes(&bytes)
    }
}
