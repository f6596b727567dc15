//! Authoring-time validation. Runs before a save or a run; a non-empty
//! error list refuses both.

use super::definition::{NodeKind, WorkflowGraph};
use ahash::{AHashMap, AHashSet};

/// Checks a graph's structural invariants and returns every violation as a
/// user-facing message. An empty list means the graph may run.
pub fn validate_graph(graph: &WorkflowGraph) -> Vec<String> {
    let mut errors = Vec::new();

    let mut seen: AHashSet<&str> = AHashSet::with_capacity(graph.nodes.len());
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            errors.push(format!("Duplicate node id '{}'.", node.id));
        }
    }

    for edge in &graph.edges {
        if !seen.contains(edge.source.as_str()) {
            errors.push(format!(
                "Edge '{}' references missing source node '{}'.",
                edge.id, edge.source
            ));
        }
        if !seen.contains(edge.target.as_str()) {
            errors.push(format!(
                "Edge '{}' references missing target node '{}'.",
                edge.id, edge.target
            ));
        }
    }

    let entries = entry_nodes(graph);
    if entries.is_empty() {
        errors.push("Workflow must contain at least one input node.".to_string());
        return errors;
    }

    // Decision and notification steps that no entry can reach would never
    // execute; surface them instead of silently dropping them at run time.
    let reachable = reachable_from(graph, &entries);
    for node in &graph.nodes {
        let needs_reach = matches!(
            node.kind(),
            NodeKind::Decision | NodeKind::IfElse | NodeKind::Notification
        );
        if needs_reach && !reachable.contains(node.id.as_str()) {
            errors.push(format!(
                "Node {} is not connected to any input node.",
                node.name
            ));
        }
    }

    errors
}

/// Entry nodes: input-capture steps with no inbound edges.
pub(crate) fn entry_nodes(graph: &WorkflowGraph) -> Vec<&str> {
    let targets: AHashSet<&str> = graph.edges.iter().map(|e| e.target.as_str()).collect();
    graph
        .nodes
        .iter()
        .filter(|n| n.kind() == NodeKind::InputCapture && !targets.contains(n.id.as_str()))
        .map(|n| n.id.as_str())
        .collect()
}

fn reachable_from<'a>(graph: &'a WorkflowGraph, entries: &[&'a str]) -> AHashSet<&'a str> {
    let mut outgoing: AHashMap<&str, Vec<&str>> = AHashMap::new();
    for edge in &graph.edges {
        outgoing
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut reachable: AHashSet<&str> = entries.iter().copied().collect();
    let mut stack: Vec<&str> = entries.to_vec();
    while let Some(current) = stack.pop() {
        for next in outgoing.get(current).into_iter().flatten() {
            if reachable.insert(next) {
                stack.push(next);
            }
        }
    }
    reachable
}
