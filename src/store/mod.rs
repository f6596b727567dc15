//! The persistence collaborator: an opaque store of workflow graphs and
//! their summaries. No core logic depends on the backing implementation.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::workflow::WorkflowGraph;
use serde::{Deserialize, Serialize};

/// A stored graph with its bookkeeping timestamps (milliseconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkflow {
    #[serde(flatten)]
    pub graph: WorkflowGraph,
    pub created_at: u64,
    pub updated_at: u64,
}

/// A listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub id: String,
    pub name: String,
    pub updated_at: u64,
}

/// CRUD over persisted workflow graphs.
///
/// Saves are refused for invalid graphs with the enumerated error list, so
/// nothing unrunnable ever reaches the store.
pub trait WorkflowStore {
    /// Summaries of every stored workflow, most recently updated first.
    fn list(&self) -> Result<Vec<WorkflowSummary>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<StoredWorkflow>, StoreError>;

    /// Stores a new workflow under a fresh id with the given name.
    fn create(&self, name: &str, graph: WorkflowGraph) -> Result<StoredWorkflow, StoreError>;

    /// Upserts a workflow by its id, refreshing `updated_at`.
    fn update(&self, graph: WorkflowGraph) -> Result<StoredWorkflow, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;
}
