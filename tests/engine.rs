//! Tests for the node registry and the execution engine traversal.
mod common;
use seqflow::engine;
use seqflow::prelude::*;
use serde_json::json;

#[test]
fn decision_branching_is_non_exclusive() {
    let mut node = NodeInstance::create_default(NodeKind::Decision);
    let big = Outcome::new(
        "Big",
        Combiner::All,
        vec![Predicate::new(
            Some("population"),
            RuleConfig::Number {
                combiner: Combiner::All,
                rules: vec![NumberRule::Gt {
                    value: 1_000_000.0,
                    message: None,
                }],
            },
        )],
    );
    let coastal = Outcome::new(
        "Coastal",
        Combiner::All,
        vec![Predicate::new(Some("city"), common::text_in_rules(&["NYC", "LA"]))],
    );
    let (big_id, coastal_id) = (big.id.clone(), coastal.id.clone());
    if let NodeConfig::Decision(cfg) = &mut node.config {
        cfg.outcomes = vec![big, coastal];
    }

    let outcome = node.execute(&json!({ "city": "NYC", "population": 8_000_000 }));
    let allowed = outcome.allowed_out_handles.expect("decision restricts handles");
    assert_eq!(allowed.len(), 2);
    assert!(allowed.contains(&format!("out-{}", big_id)));
    assert!(allowed.contains(&format!("out-{}", coastal_id)));
    assert_eq!(outcome.logs.len(), 1);
    assert_eq!(outcome.logs[0].kind, LogKind::Decision);
    assert!(outcome.logs[0].message.contains("Matched 2 outcome(s)"));
}

#[test]
fn decision_with_no_match_opens_no_handles() {
    let (node, _) = common::nyc_decision_node("d", "Is NYC");
    let outcome = node.execute(&json!({ "city": "LA" }));
    let allowed = outcome.allowed_out_handles.expect("decision restricts handles");
    assert!(allowed.is_empty());
    assert!(outcome.logs[0].message.contains("none"));
}

#[test]
fn if_else_returns_exactly_one_handle() {
    let mut node = NodeInstance::create_default(NodeKind::IfElse);
    if let NodeConfig::IfElse(cfg) = &mut node.config {
        cfg.condition = Outcome::new(
            "Condition",
            Combiner::All,
            vec![Predicate::new(Some("city"), common::text_in_rules(&["NYC"]))],
        );
    }

    for (payload, expected) in [
        (json!({ "city": "NYC" }), "out-true"),
        (json!({ "city": "LA" }), "out-false"),
    ] {
        let outcome = node.execute(&payload);
        let allowed = outcome.allowed_out_handles.expect("if-else restricts handles");
        assert_eq!(allowed.len(), 1);
        assert!(allowed.contains(expected));
    }
}

#[test]
fn if_else_with_no_predicates_is_false() {
    let node = NodeInstance::create_default(NodeKind::IfElse);
    let outcome = node.execute(&json!({}));
    let allowed = outcome.allowed_out_handles.expect("if-else restricts handles");
    assert!(allowed.contains("out-false"));
    assert!(outcome.logs[0].message.contains("False"));
}

#[test]
fn predicate_without_target_field_binds_whole_payload() {
    let mut node = NodeInstance::create_default(NodeKind::IfElse);
    if let NodeConfig::IfElse(cfg) = &mut node.config {
        cfg.condition = Outcome::new(
            "Condition",
            Combiner::All,
            vec![Predicate::new(None, common::text_in_rules(&["NYC"]))],
        );
    }
    // The whole payload is the bound value here, a bare string.
    let outcome = node.execute(&json!("NYC"));
    let allowed = outcome.allowed_out_handles.expect("if-else restricts handles");
    assert!(allowed.contains("out-true"));
}

#[test]
fn notification_renders_its_template() {
    let node = common::notification_node("n", "Welcome {{ city }}, pop {{ stats.population }}");
    let outcome = node.execute(&json!({ "city": "NYC", "stats": { "population": 8 } }));
    assert_eq!(outcome.logs[0].kind, LogKind::Notification);
    assert_eq!(outcome.logs[0].message, "Welcome NYC, pop 8");
    assert!(outcome.allowed_out_handles.is_none());
    assert!(outcome.payload.is_none());
}

#[test]
fn api_call_emits_the_fixed_envelope_shape() {
    let mut node = NodeInstance::create_default(NodeKind::ApiCall);
    if let NodeConfig::ApiCall(cfg) = &mut node.config {
        cfg.url = "https://api.example.com/cities/{{ city }}".to_string();
    }
    let outcome = node.execute(&json!({ "city": "NYC" }));
    assert_eq!(outcome.logs[0].kind, LogKind::Api);
    assert!(
        outcome.logs[0]
            .message
            .contains("GET https://api.example.com/cities/NYC")
    );

    let payload = outcome.payload.expect("api call replaces the payload");
    assert_eq!(payload["status"], 200);
    assert_eq!(payload["statusText"], "OK");
    assert_eq!(payload["success"], true);
    assert_eq!(payload["data"]["simulated"], true);
    assert_eq!(payload["data"]["input"]["city"], "NYC");
    assert!(payload["headers"].is_object());
    assert!(payload.get("error").is_none());
}

#[test]
fn failed_envelope_carries_the_error_field() {
    let envelope = ResponseEnvelope::failed(503, "Service Unavailable", "upstream down");
    let payload = envelope.into_payload();
    assert_eq!(payload["status"], 503);
    assert_eq!(payload["success"], false);
    assert_eq!(payload["error"], "upstream down");
}

#[test]
fn delay_forwards_payload_and_formats_duration() {
    let singular = common::delay_node("d1", 1, DelayUnit::Hours);
    let outcome = singular.execute(&json!({ "keep": true }));
    assert_eq!(outcome.logs[0].kind, LogKind::Delay);
    assert_eq!(outcome.logs[0].message, "Delay scheduled: 1 hour");
    assert_eq!(outcome.payload, Some(json!({ "keep": true })));

    let plural = common::delay_node("d2", 5, DelayUnit::Seconds);
    assert_eq!(
        plural.execute(&json!({})).logs[0].message,
        "Delay scheduled: 5 seconds"
    );
}

#[test]
fn schema_propagates_from_input_fields_through_pass_through_nodes() {
    let input = common::city_input_node("input");
    let delay = common::delay_node("delay", 1, DelayUnit::Seconds);
    let notify = common::notification_node("notify", "hi");
    let mut graph = WorkflowGraph {
        id: "wf".to_string(),
        name: "schemas".to_string(),
        nodes: vec![input, delay, notify],
        edges: vec![
            common::edge("e1", "input", "delay", None),
            common::edge("e2", "delay", "notify", None),
        ],
    };

    propagate_schemas(&mut graph);

    let expected = derive_schema([("city", FieldKind::Text)]);
    let delay = graph.node("delay").expect("delay node");
    assert_eq!(delay.input_schema, expected);
    assert_eq!(delay.output_schema, expected);
    let notify = graph.node("notify").expect("notify node");
    assert_eq!(notify.input_schema, expected);
}

#[test]
fn traversal_visits_diamond_join_once() {
    let input = common::city_input_node("input");
    let d1 = common::delay_node("d1", 1, DelayUnit::Seconds);
    let d2 = common::delay_node("d2", 2, DelayUnit::Seconds);
    let notify = common::notification_node("notify", "Welcome {{ city }}");
    let graph = WorkflowGraph {
        id: "wf".to_string(),
        name: "diamond".to_string(),
        nodes: vec![input, d1, d2, notify],
        edges: vec![
            common::edge("e1", "input", "d1", None),
            common::edge("e2", "input", "d2", None),
            common::edge("e3", "d1", "notify", None),
            common::edge("e4", "d2", "notify", None),
        ],
    };

    let logs = engine::execute(&graph, json!({ "city": "NYC" })).expect("runs");
    let notifications: Vec<_> = logs
        .iter()
        .filter(|l| l.kind == LogKind::Notification)
        .collect();
    assert_eq!(notifications.len(), 1, "join node must execute exactly once");
}

#[test]
fn cycles_degrade_to_skipped_revisits() {
    let input = common::city_input_node("input");
    let d1 = common::delay_node("d1", 1, DelayUnit::Seconds);
    let d2 = common::delay_node("d2", 1, DelayUnit::Seconds);
    let graph = WorkflowGraph {
        id: "wf".to_string(),
        name: "cycle".to_string(),
        nodes: vec![input, d1, d2],
        edges: vec![
            common::edge("e1", "input", "d1", None),
            common::edge("e2", "d1", "d2", None),
            common::edge("e3", "d2", "d1", None),
        ],
    };

    let logs = engine::execute(&graph, json!({})).expect("terminates");
    let delays = logs.iter().filter(|l| l.kind == LogKind::Delay).count();
    assert_eq!(delays, 2);
}

#[test]
fn invalid_graphs_are_refused_before_any_execution() {
    let notify = common::notification_node("notify", "hi");
    let graph = WorkflowGraph {
        id: "wf".to_string(),
        name: "no entry".to_string(),
        nodes: vec![notify],
        edges: vec![],
    };

    let err = engine::execute(&graph, json!({})).expect_err("refused");
    let WorkflowError::InvalidGraph { errors } = err;
    assert!(
        errors
            .iter()
            .any(|e| e.contains("at least one input node"))
    );
}

#[test]
fn unreachable_decision_nodes_are_reported() {
    let input = common::city_input_node("input");
    let (decision, _) = common::nyc_decision_node("stray", "Is NYC");
    let graph = WorkflowGraph {
        id: "wf".to_string(),
        name: "stray".to_string(),
        nodes: vec![input, decision],
        edges: vec![],
    };

    let errors = validate_graph(&graph);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("not connected to any input node"));
}

#[test]
fn duplicate_ids_and_dangling_edges_are_reported() {
    let a = common::city_input_node("same");
    let b = common::city_input_node("same");
    let graph = WorkflowGraph {
        id: "wf".to_string(),
        name: "broken".to_string(),
        nodes: vec![a, b],
        edges: vec![common::edge("e1", "same", "missing", None)],
    };

    let errors = validate_graph(&graph);
    assert!(errors.iter().any(|e| e.contains("Duplicate node id")));
    assert!(errors.iter().any(|e| e.contains("missing target node")));
}

#[test]
fn api_payload_replaces_downstream_payload() {
    let input = common::city_input_node("input");
    let mut api = NodeInstance::create_default(NodeKind::ApiCall);
    api.id = "api".to_string();
    let notify = common::notification_node("notify", "status={{ status }}");
    let graph = WorkflowGraph {
        id: "wf".to_string(),
        name: "api chain".to_string(),
        nodes: vec![input, api, notify],
        edges: vec![
            common::edge("e1", "input", "api", None),
            common::edge("e2", "api", "notify", None),
        ],
    };

    let logs = engine::execute(&graph, json!({ "city": "NYC" })).expect("runs");
    let notification = logs
        .iter()
        .find(|l| l.kind == LogKind::Notification)
        .expect("notification ran");
    assert_eq!(notification.message, "status=200");
}
