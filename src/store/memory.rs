use super::{StoredWorkflow, WorkflowStore, WorkflowSummary};
use crate::error::StoreError;
use crate::workflow::{WorkflowGraph, now_millis, validate_graph};
use ahash::AHashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// The in-memory reference store.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<AHashMap<String, StoredWorkflow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(graph: &WorkflowGraph) -> Result<(), StoreError> {
        let errors = validate_graph(graph);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(StoreError::InvalidWorkflow { errors })
        }
    }
}

impl WorkflowStore for MemoryStore {
    fn list(&self) -> Result<Vec<WorkflowSummary>, StoreError> {
        let items = self.items.lock().expect("store lock");
        let mut summaries: Vec<WorkflowSummary> = items
            .values()
            .map(|w| WorkflowSummary {
                id: w.graph.id.clone(),
                name: w.graph.name.clone(),
                updated_at: w.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    fn get(&self, id: &str) -> Result<Option<StoredWorkflow>, StoreError> {
        let items = self.items.lock().expect("store lock");
        Ok(items.get(id).cloned())
    }

    fn create(&self, name: &str, graph: WorkflowGraph) -> Result<StoredWorkflow, StoreError> {
        let mut graph = graph;
        graph.id = Uuid::new_v4().to_string();
        graph.name = name.to_string();
        Self::check(&graph)?;

        let now = now_millis();
        let stored = StoredWorkflow {
            graph,
            created_at: now,
            updated_at: now,
        };
        let mut items = self.items.lock().expect("store lock");
        items.insert(stored.graph.id.clone(), stored.clone());
        Ok(stored)
    }

    fn update(&self, graph: WorkflowGraph) -> Result<StoredWorkflow, StoreError> {
        Self::check(&graph)?;
        let mut items = self.items.lock().expect("store lock");
        let created_at = items
            .get(&graph.id)
            .map(|existing| existing.created_at)
            .unwrap_or_else(now_millis);
        let stored = StoredWorkflow {
            graph,
            created_at,
            updated_at: now_millis(),
        };
        items.insert(stored.graph.id.clone(), stored.clone());
        Ok(stored)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().expect("store lock");
        items.remove(id);
        Ok(())
    }
}
