//! The kind-agnostic execution engine.
//!
//! The engine walks a persisted graph from its entry node(s), calls each
//! node's `execute` and follows outgoing edges filtered by the handles the
//! node allowed. It is synchronous and single-threaded with no suspension
//! points, suitable for short-lived, side-effect-light simulation; real
//! network calls and real-time delays belong to the external runner.

use crate::error::WorkflowError;
use crate::workflow::validate::entry_nodes;
use crate::workflow::{Edge, ExecutionLog, WorkflowGraph, validate_graph};
use ahash::{AHashMap, AHashSet};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Executes a graph against the supplied initial payload.
///
/// Authoring errors refuse the run up front with the full enumerated list.
/// Traversal is depth-first with a visited set: a node is never executed
/// twice even with multiple inbound edges, and a cycle degrades to a
/// skipped revisit rather than a loop.
///
/// One shared payload threads through all branches; branches do not evolve
/// independent state. When a node returns a replacement payload, that
/// payload propagates to everything executed after it.
pub fn execute(
    graph: &WorkflowGraph,
    initial_payload: JsonValue,
) -> Result<Vec<ExecutionLog>, WorkflowError> {
    let errors = validate_graph(graph);
    if !errors.is_empty() {
        return Err(WorkflowError::InvalidGraph { errors });
    }

    let mut outgoing: AHashMap<&str, Vec<&Edge>> = AHashMap::new();
    for edge in &graph.edges {
        outgoing.entry(edge.source.as_str()).or_default().push(edge);
    }

    let entries = entry_nodes(graph);
    let mut logs = Vec::new();
    let mut payload = initial_payload;
    let mut visited: AHashSet<&str> = AHashSet::new();
    let mut stack: Vec<&str> = entries;

    while let Some(node_id) = stack.pop() {
        if !visited.insert(node_id) {
            continue;
        }
        let Some(node) = graph.node(node_id) else {
            continue;
        };

        debug!(node = %node.id, kind = ?node.kind(), "executing node");
        let outcome = node.execute(&payload);
        logs.extend(outcome.logs);
        if let Some(next_payload) = outcome.payload {
            payload = next_payload;
        }

        for edge in outgoing.get(node_id).into_iter().flatten() {
            let follow = match (&edge.source_handle, &outcome.allowed_out_handles) {
                // An unset handle or an unrestricted node follows every edge.
                (None, _) | (_, None) => true,
                (Some(handle), Some(allowed)) => allowed.contains(handle),
            };
            if follow {
                stack.push(edge.target.as_str());
            } else {
                debug!(edge = %edge.id, "edge not followed, handle not allowed");
            }
        }
    }

    Ok(logs)
}
